use bevy::{
    math::Rect,
    prelude::*,
};

use crate::systems::{GameStats, HighScoreStore, Settings};

const SCORE_MARGIN: f32 = 20.;
const LEVEL_GAP: f32 = 10.;
const SHIP_MARGIN: f32 = 5.;

/// Rounds to the nearest multiple of ten, ties going to the even multiple.
pub fn round_to_nearest_ten(value: u64) -> u64 {
    let tens = value / 10;
    let rest = value % 10;
    let tens = if rest > 5 || (rest == 5 && tens % 2 == 1) {
        tens + 1
    } else {
        tens
    };
    tens.checked_mul(10).unwrap_or(value - rest)
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextDisplay {
    pub value: String,
    pub color: Color,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreboardText {
    Score,
    HighScore,
    Level,
}

#[derive(Component)]
pub struct LivesRow;

#[derive(Component)]
pub struct ShipIcon;

#[derive(Resource)]
pub struct ShipIconImage(pub Handle<Image>);

/// Text styles created once and reused for every refresh.
#[derive(Resource)]
pub struct ScoreboardFonts {
    pub score: TextStyle,
    pub level: TextStyle,
}

impl ScoreboardFonts {
    pub fn new(settings: &Settings) -> ScoreboardFonts {
        ScoreboardFonts {
            score: TextStyle {
                font: Handle::default(),
                font_size: settings.score_font_size,
                color: settings.text_color,
            },
            level: TextStyle {
                font: Handle::default(),
                font_size: settings.level_font_size,
                color: settings.text_color,
            },
        }
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreboardEvent {
    ScoreChanged,
    LevelChanged,
    ShipsChanged,
    Reset,
}

/// Render-ready score, high score, level and lives, rebuilt by the `prep_*`
/// methods whenever the matching stat changes.
#[derive(Resource)]
pub struct Scoreboard {
    store: HighScoreStore,
    text_color: Color,
    high_score_color: Color,
    ship_icon_size: Vec2,
    pub score: TextDisplay,
    pub high_score: TextDisplay,
    pub level: TextDisplay,
    pub ships: Vec<Rect>,
}

impl Scoreboard {
    /// Loads the persisted high score into `stats` and prepares every display.
    pub fn new(store: HighScoreStore, settings: &Settings, stats: &mut GameStats) -> Scoreboard {
        stats.high_score = store.load_or_default();

        let mut scoreboard = Scoreboard {
            store,
            text_color: settings.text_color,
            high_score_color: settings.high_score_color,
            ship_icon_size: settings.ship_icon_size,
            score: TextDisplay::default(),
            high_score: TextDisplay::default(),
            level: TextDisplay::default(),
            ships: vec![],
        };
        scoreboard.prep_images(stats);
        scoreboard
    }

    pub fn store(&self) -> &HighScoreStore {
        &self.store
    }

    pub fn text(&self, kind: ScoreboardText) -> &TextDisplay {
        match kind {
            ScoreboardText::Score => &self.score,
            ScoreboardText::HighScore => &self.high_score,
            ScoreboardText::Level => &self.level,
        }
    }

    pub fn prep_images(&mut self, stats: &GameStats) {
        self.prep_score(stats);
        self.prep_high_score(stats);
        self.prep_level(stats);
        self.prep_ships(stats);
    }

    pub fn prep_score(&mut self, stats: &GameStats) {
        self.score = TextDisplay {
            value: format!("Score: {}", round_to_nearest_ten(stats.score)),
            color: self.text_color,
        };
    }

    /// Also writes the unrounded high score to disk.
    pub fn prep_high_score(&mut self, stats: &GameStats) {
        let high_score = round_to_nearest_ten(stats.high_score);
        self.high_score = TextDisplay {
            value: format!("High Score: {}", format_thousands(high_score)),
            color: self.high_score_color,
        };

        if let Err(e) = self.store.save(stats.high_score) {
            error!("{}", e);
        }
    }

    pub fn prep_level(&mut self, stats: &GameStats) {
        self.level = TextDisplay {
            value: format!("Level: {}", stats.level),
            color: self.text_color,
        };
    }

    pub fn prep_ships(&mut self, stats: &GameStats) {
        let size = self.ship_icon_size;
        self.ships = (0..stats.ships_left)
            .map(|ship_number| {
                let min = Vec2::new(SHIP_MARGIN + ship_number as f32 * size.x, SHIP_MARGIN);
                Rect::from_corners(min, min + size)
            })
            .collect();
    }

    /// Returns true when `stats.score` became the new high score.
    pub fn check_high_score(&mut self, stats: &mut GameStats) -> bool {
        if stats.score <= stats.high_score {
            return false;
        }
        stats.high_score = stats.score;
        self.prep_high_score(stats);
        true
    }
}

pub struct ScoreboardPlugin;

impl Plugin for ScoreboardPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ScoreboardEvent>()
            .add_systems(Startup, (setup_scoreboard, spawn_scoreboard).chain())
            .add_systems(
                Update,
                (
                    handle_scoreboard_events,
                    show_score.run_if(resource_changed::<Scoreboard>),
                )
                    .chain(),
            );
    }
}

pub fn setup_scoreboard(
    mut commands: Commands,
    settings: Res<Settings>,
    mut stats: ResMut<GameStats>,
    asset_server: Res<AssetServer>,
) {
    let store = HighScoreStore::new(settings.high_score_file.clone());
    let scoreboard = Scoreboard::new(store, &settings, &mut stats);
    info!(
        "loaded high score {} from {}",
        stats.high_score,
        scoreboard.store().path().display()
    );

    commands.insert_resource(scoreboard);
    commands.insert_resource(ScoreboardFonts::new(&settings));
    commands.insert_resource(ShipIconImage(asset_server.load(settings.ship_icon_path.clone())));
}

fn text_bundle(display: &TextDisplay, style: &TextStyle, background: Color) -> TextBundle {
    TextBundle::from_section(
        display.value.clone(),
        TextStyle {
            color: display.color,
            ..style.clone()
        },
    )
    .with_background_color(background)
}

/// Score and level stack in the top right corner, the high score is centered
/// on the same line, and lives are placed absolutely inside a full screen row.
pub fn spawn_scoreboard(
    mut commands: Commands,
    settings: Res<Settings>,
    fonts: Res<ScoreboardFonts>,
    scoreboard: Res<Scoreboard>,
) {
    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                top: Val::Px(SCORE_MARGIN),
                right: Val::Px(SCORE_MARGIN),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexEnd,
                row_gap: Val::Px(LEVEL_GAP),
                ..default()
            },
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                text_bundle(&scoreboard.score, &fonts.score, settings.bg_color),
                ScoreboardText::Score,
            ));
            parent.spawn((
                text_bundle(&scoreboard.level, &fonts.level, settings.bg_color),
                ScoreboardText::Level,
            ));
        });

    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                top: Val::Px(SCORE_MARGIN),
                left: Val::Px(0.),
                width: Val::Percent(100.),
                justify_content: JustifyContent::Center,
                ..default()
            },
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                text_bundle(&scoreboard.high_score, &fonts.score, settings.bg_color),
                ScoreboardText::HighScore,
            ));
        });

    commands.spawn((
        NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                top: Val::Px(0.),
                left: Val::Px(0.),
                width: Val::Percent(100.),
                height: Val::Percent(100.),
                ..default()
            },
            ..default()
        },
        LivesRow,
    ));
}

pub fn handle_scoreboard_events(
    mut events: EventReader<ScoreboardEvent>,
    mut scoreboard: ResMut<Scoreboard>,
    mut stats: ResMut<GameStats>,
) {
    for event in events.read() {
        match event {
            ScoreboardEvent::ScoreChanged => {
                scoreboard.prep_score(&stats);
                if scoreboard.check_high_score(&mut stats) {
                    debug!("new high score {}", stats.high_score);
                }
            }
            ScoreboardEvent::LevelChanged => scoreboard.prep_level(&stats),
            ScoreboardEvent::ShipsChanged => scoreboard.prep_ships(&stats),
            ScoreboardEvent::Reset => scoreboard.prep_images(&stats),
        }
    }
}

/// Pushes the prepared displays onto the UI nodes.
pub fn show_score(
    mut commands: Commands,
    scoreboard: Res<Scoreboard>,
    ship_icon: Res<ShipIconImage>,
    mut texts: Query<(&mut Text, &ScoreboardText)>,
    lives_row: Query<Entity, With<LivesRow>>,
    ships: Query<Entity, With<ShipIcon>>,
) {
    for (mut text, kind) in texts.iter_mut() {
        let display = scoreboard.text(*kind);
        text.sections[0].value = display.value.clone();
        text.sections[0].style.color = display.color;
    }

    // Icon positions only depend on their index, so matching counts means nothing moved.
    if ships.iter().count() == scoreboard.ships.len() {
        return;
    }
    let Ok(row) = lives_row.get_single() else {
        return;
    };
    for ship in ships.iter() {
        commands.entity(ship).despawn_recursive();
    }
    commands.entity(row).with_children(|parent| {
        for rect in scoreboard.ships.iter() {
            parent.spawn((
                ImageBundle {
                    style: Style {
                        position_type: PositionType::Absolute,
                        left: Val::Px(rect.min.x),
                        top: Val::Px(rect.min.y),
                        width: Val::Px(rect.width()),
                        height: Val::Px(rect.height()),
                        ..default()
                    },
                    image: UiImage::new(ship_icon.0.clone()),
                    ..default()
                },
                ShipIcon,
            ));
        }
    });
}
