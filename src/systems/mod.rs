mod game_stats_system;
mod high_score_store;
mod scoreboard_system;

pub use game_stats_system::*;
pub use high_score_store::*;
pub use scoreboard_system::*;
