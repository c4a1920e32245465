use bevy::{prelude::*, window::WindowResolution};
use std::path::PathBuf;
use structopt::StructOpt;

mod systems;
use crate::systems::*;

#[derive(Debug, StructOpt)]
#[structopt(name = "alien_invasion_scoreboard", about = "Alien Invasion scoreboard demo")]
pub struct Opt {
    /// File the high score is persisted to
    #[structopt(long, parse(from_os_str), default_value = "high_score.txt")]
    pub high_score_file: PathBuf,

    #[structopt(long, default_value = "1200")]
    pub width: f32,

    #[structopt(long, default_value = "800")]
    pub height: f32,

    /// Ships per game
    #[structopt(long, default_value = "3")]
    pub ship_limit: u32,
}

impl Opt {
    pub fn settings(&self) -> Settings {
        Settings {
            screen_width: self.width,
            screen_height: self.height,
            ship_limit: self.ship_limit,
            high_score_file: self.high_score_file.clone(),
            ..Default::default()
        }
    }
}

fn main() {
    let opt = Opt::from_args();
    let settings = opt.settings();
    let stats = GameStats::new(&settings);

    App::new()
        .insert_resource(ClearColor(settings.bg_color))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Alien Invasion".to_string(),
                resolution: WindowResolution::new(settings.screen_width, settings.screen_height),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(settings)
        .insert_resource(stats)
        .add_plugins(ScoreboardPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, input.before(handle_scoreboard_events))
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

/// Enter starts a game; while playing Space scores, L levels up and X loses a ship.
fn input(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut stats: ResMut<GameStats>,
    mut events: EventWriter<ScoreboardEvent>,
) {
    if !stats.game_active {
        if keyboard.just_pressed(KeyCode::Enter) {
            stats.reset(&settings);
            stats.game_active = true;
            events.send(ScoreboardEvent::Reset);
            info!("new game, high score to beat is {}", stats.high_score);
        }
        return;
    }

    if keyboard.just_pressed(KeyCode::Space) {
        stats.add_points(settings.alien_points);
        events.send(ScoreboardEvent::ScoreChanged);
    }

    if keyboard.just_pressed(KeyCode::KeyL) {
        stats.level_up();
        events.send(ScoreboardEvent::LevelChanged);
    }

    if keyboard.just_pressed(KeyCode::KeyX) {
        if !stats.lose_ship() {
            info!("game over with score {}", stats.score);
        }
        events.send(ScoreboardEvent::ShipsChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn input_world(stats: GameStats, key: KeyCode) -> World {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(key);

        let mut world = World::new();
        world.init_resource::<Events<ScoreboardEvent>>();
        world.insert_resource(keyboard);
        world.insert_resource(Settings::default());
        world.insert_resource(stats);
        world
    }

    fn sent_events(world: &World) -> Vec<ScoreboardEvent> {
        world
            .resource::<Events<ScoreboardEvent>>()
            .iter_current_update_events()
            .copied()
            .collect()
    }

    #[test]
    fn options_default_to_stock_settings() {
        let opt = Opt::from_iter(vec!["alien_invasion_scoreboard"]);
        let settings = opt.settings();
        assert_eq!(settings.high_score_file, PathBuf::from("high_score.txt"));
        assert_eq!(settings.ship_limit, 3);
        assert_eq!(settings.screen_width, 1200.);
    }

    #[test]
    fn options_override_settings() {
        let opt = Opt::from_iter(vec![
            "alien_invasion_scoreboard",
            "--high-score-file",
            "/tmp/scores.txt",
            "--ship-limit",
            "5",
        ]);
        let settings = opt.settings();
        assert_eq!(settings.high_score_file, PathBuf::from("/tmp/scores.txt"));
        assert_eq!(settings.ship_limit, 5);
    }

    #[test]
    fn enter_starts_new_game_and_keeps_high_score() {
        let mut stats = GameStats::new(&Settings::default());
        stats.score = 300;
        stats.high_score = 900;
        stats.ships_left = 0;
        let mut world = input_world(stats, KeyCode::Enter);

        world.run_system_once(input);

        let stats = world.resource::<GameStats>();
        assert!(stats.game_active);
        assert_eq!(stats.score, 0);
        assert_eq!(stats.high_score, 900);
        assert_eq!(stats.ships_left, 3);
        assert_eq!(sent_events(&world), vec![ScoreboardEvent::Reset]);
    }

    #[test]
    fn keys_are_ignored_until_game_starts() {
        let stats = GameStats::new(&Settings::default());
        let mut world = input_world(stats, KeyCode::Space);

        world.run_system_once(input);

        assert_eq!(world.resource::<GameStats>().score, 0);
        assert!(sent_events(&world).is_empty());
    }

    #[test]
    fn space_awards_alien_points() {
        let mut stats = GameStats::new(&Settings::default());
        stats.game_active = true;
        let mut world = input_world(stats, KeyCode::Space);

        world.run_system_once(input);

        assert_eq!(world.resource::<GameStats>().score, 50);
        assert_eq!(sent_events(&world), vec![ScoreboardEvent::ScoreChanged]);
    }

    #[test]
    fn losing_last_ship_ends_game() {
        let mut stats = GameStats::new(&Settings::default());
        stats.game_active = true;
        stats.ships_left = 1;
        let mut world = input_world(stats, KeyCode::KeyX);

        world.run_system_once(input);

        let stats = world.resource::<GameStats>();
        assert_eq!(stats.ships_left, 0);
        assert!(!stats.game_active);
        assert_eq!(sent_events(&world), vec![ScoreboardEvent::ShipsChanged]);
    }
}
