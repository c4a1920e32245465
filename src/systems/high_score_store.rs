use std::{
    fs, io,
    num::{IntErrorKind, ParseIntError},
    path::{Path, PathBuf},
};
use bevy::log::{info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("failed to access high score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("high score file {path} does not hold an integer: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseIntError,
    },
}

/// Accepts surrounding whitespace, a leading `+` and single underscores
/// between digits. Values past `u64::MAX` clamp to it.
fn parse_high_score(contents: &str) -> Result<u64, ParseIntError> {
    let trimmed = contents.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let grouped = !digits.starts_with('_') && !digits.ends_with('_') && !digits.contains("__");
    let cleaned = if grouped {
        digits.replace('_', "")
    } else {
        trimmed.to_string()
    };

    match cleaned.parse::<u64>() {
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(u64::MAX),
        result => result,
    }
}

/// Plain text file holding a single decimal high score.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> HighScoreStore {
        HighScoreStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no file has been written yet.
    pub fn load(&self) -> Result<Option<u64>, HighScoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(HighScoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        parse_high_score(&contents)
            .map(Some)
            .map_err(|source| HighScoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Unreadable or corrupt files count as no high score at all.
    pub fn load_or_default(&self) -> u64 {
        match self.load() {
            Ok(Some(high_score)) => high_score,
            Ok(None) => {
                info!("no high score file at {}, starting from 0", self.path.display());
                0
            }
            Err(e) => {
                warn!("{}, starting from 0", e);
                0
            }
        }
    }

    /// Overwrites the whole file.
    pub fn save(&self, high_score: u64) -> Result<(), HighScoreError> {
        fs::write(&self.path, high_score.to_string()).map_err(|source| HighScoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
