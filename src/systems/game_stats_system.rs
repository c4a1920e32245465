use std::path::PathBuf;
use bevy::prelude::*;

#[derive(Resource)]
pub struct Settings {
    pub screen_width: f32,
    pub screen_height: f32,
    pub bg_color: Color,
    pub text_color: Color,
    pub high_score_color: Color,
    pub score_font_size: f32,
    pub level_font_size: f32,
    pub ship_limit: u32,
    pub ship_icon_size: Vec2,
    pub ship_icon_path: String,
    pub alien_points: u64,
    pub high_score_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            screen_width: 1200.,
            screen_height: 800.,
            bg_color: Color::srgb_u8(230, 230, 230),
            text_color: Color::srgb_u8(30, 30, 30),
            high_score_color: Color::srgb_u8(230, 30, 30),
            score_font_size: 36.,
            level_font_size: 24.,
            ship_limit: 3,
            ship_icon_size: Vec2::new(60., 48.),
            ship_icon_path: "images/ship.png".to_string(),
            alien_points: 50,
            high_score_file: PathBuf::from("high_score.txt"),
        }
    }
}

/// Statistics for the current game session.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameStats {
    pub score: u64,
    /// Never reset between games.
    pub high_score: u64,
    pub level: u32,
    pub ships_left: u32,
    pub game_active: bool,
}

impl GameStats {
    pub fn new(settings: &Settings) -> GameStats {
        GameStats {
            score: 0,
            high_score: 0,
            level: 1,
            ships_left: settings.ship_limit,
            game_active: false,
        }
    }

    pub fn reset(&mut self, settings: &Settings) {
        let high_score = self.high_score;
        *self = GameStats::new(settings);
        self.high_score = high_score;
    }

    pub fn add_points(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    /// Returns false once the last ship is gone, which also ends the game.
    pub fn lose_ship(&mut self) -> bool {
        if self.ships_left > 0 {
            self.ships_left -= 1;
        }
        if self.ships_left == 0 {
            self.game_active = false;
            return false;
        }
        true
    }
}
