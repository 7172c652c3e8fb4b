//! Saving and restoring games as JSON.
//!
//! States travel as two flat arrays of 20 integers, with -1 marking an
//! unassigned slot:
//!
//! ```json
//! { "permutation": [0, 1, -1, ...], "orientation": [0, 1, -1, ...] }
//! ```
//!
//! The target is never written out. A saved session keeps only the seed and
//! regenerates the target on load, then replays the submitted guesses.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{PuzzleSession, SessionConfig, SessionError};
use crate::state::{CubeState, ShapeError};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupted state: {0}")]
    Shape(#[from] ShapeError),
    #[error("cannot restore session: {0}")]
    Session(#[from] SessionError),
}

/// Wire form of a [`CubeState`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SavedState {
    pub permutation: Vec<i32>,
    pub orientation: Vec<i32>,
}

impl From<&CubeState> for SavedState {
    fn from(state: &CubeState) -> Self {
        let (permutation, orientation) = state.to_raw();
        Self {
            permutation,
            orientation,
        }
    }
}

impl TryFrom<&SavedState> for CubeState {
    type Error = ShapeError;

    fn try_from(saved: &SavedState) -> Result<Self, Self::Error> {
        CubeState::from_raw(&saved.permutation, &saved.orientation)
    }
}

/// Wire form of a [`PuzzleSession`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub seed: String,
    pub max_attempts: usize,
    pub guess: SavedState,
    /// Submitted guesses, oldest first.
    #[serde(default)]
    pub history: Vec<SavedState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<usize>,
}

impl From<&PuzzleSession> for SavedSession {
    fn from(session: &PuzzleSession) -> Self {
        Self {
            seed: session.seed().to_owned(),
            max_attempts: session.config().max_attempts,
            guess: session.guess().into(),
            history: session
                .history()
                .iter()
                .map(|record| (&record.state).into())
                .collect(),
            selection: session.selection(),
        }
    }
}

impl SavedSession {
    /// Rebuilds the session, replaying every recorded guess.
    pub fn restore(&self) -> Result<PuzzleSession, PersistenceError> {
        let config = SessionConfig {
            max_attempts: self.max_attempts,
        };
        let mut session = PuzzleSession::new(&self.seed, config)?;

        for saved in &self.history {
            session.set_guess(CubeState::try_from(saved)?)?;
            session.submit()?;
        }

        let guess = CubeState::try_from(&self.guess).inspect_err(|e| {
            log::warn!("saved guess for seed {:?} is corrupted: {e}", self.seed);
        })?;
        // a finished game keeps its last submitted guess
        match session.set_guess(guess) {
            Err(SessionError::GameOver) => {
                log::debug!("restored a finished game, ignoring the pending guess");
            }
            other => other?,
        }
        session.select(self.selection)?;

        Ok(session)
    }
}

/// Writes a session to `path` as JSON.
pub fn save(path: &Path, session: &PuzzleSession) -> Result<(), PersistenceError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &SavedSession::from(session))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads and restores a session from `path`.
pub fn load(path: &Path) -> Result<PuzzleSession, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    let saved: SavedSession = serde_json::from_reader(reader)?;
    saved.restore()
}

/// Reads a bare state (permutation + orientation) from `path`.
pub fn load_state(path: &Path) -> Result<CubeState, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    let saved: SavedState = serde_json::from_reader(reader)?;
    Ok(CubeState::try_from(&saved)?)
}
