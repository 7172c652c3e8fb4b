//! One puzzle instance: a hidden target, the player's guess, and the
//! attempts made so far.
//!
//! The session owns its states outright. Callers edit the guess through
//! methods and read results back as values; nothing is shared.

use thiserror::Error;

use crate::facelets::{self, Comparison, Facelets};
use crate::navigation::{self, CameraBasis, Direction};
use crate::pieces::NUM_PIECES;
use crate::state::{self, CubeState, GenerateError, ParityReport, ShapeError};

/// Tunable rules of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Number of guesses the player may submit.
    pub max_attempts: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_attempts: 6 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won,
    Lost,
}

/// Score of one submitted guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuessFeedback {
    pub comparison: Comparison,
    /// Slots with the right piece in the right orientation.
    pub pieces_correct: usize,
    /// Matching facelets, the 6 centers included.
    pub stickers_correct: usize,
}

/// A submitted guess together with its score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuessRecord {
    pub state: CubeState,
    pub feedback: GuessFeedback,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("guess cannot occur on a real cube ({report:?})")]
    Unreachable { report: ParityReport },
    #[error("the game is already over")]
    GameOver,
}

/// A single game from seed to win or loss.
#[derive(Clone, Debug)]
pub struct PuzzleSession {
    seed: String,
    config: SessionConfig,
    target: CubeState,
    target_facelets: Facelets,
    guess: CubeState,
    selection: Option<usize>,
    history: Vec<GuessRecord>,
    status: Status,
}

impl PuzzleSession {
    /// Starts a new game whose target is generated from `seed`.
    pub fn new(seed: &str, config: SessionConfig) -> Result<Self, SessionError> {
        let target = state::generate(seed)?;
        // with no attempts to spend the game is lost before it starts
        let status = if config.max_attempts == 0 {
            Status::Lost
        } else {
            Status::Playing
        };
        log::info!(
            "new puzzle from seed {seed:?} with {} attempts",
            config.max_attempts
        );
        Ok(Self {
            seed: seed.to_owned(),
            config,
            target,
            target_facelets: facelets::project(&target),
            guess: CubeState::empty(),
            selection: None,
            history: Vec::new(),
            status,
        })
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The player's current guess.
    pub fn guess(&self) -> &CubeState {
        &self.guess
    }

    pub fn guess_facelets(&self) -> Facelets {
        facelets::project(&self.guess)
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    pub fn attempts_left(&self) -> usize {
        self.config.max_attempts.saturating_sub(self.history.len())
    }

    /// The target, once the game is over.
    pub fn answer(&self) -> Option<&CubeState> {
        (self.status != Status::Playing).then_some(&self.target)
    }

    /// Parity diagnostics for the current guess.
    pub fn guess_parity(&self) -> ParityReport {
        self.guess.parity_report()
    }

    fn ensure_playing(&self) -> Result<(), SessionError> {
        match self.status {
            Status::Playing => Ok(()),
            Status::Won | Status::Lost => Err(SessionError::GameOver),
        }
    }

    /// Puts `piece` into `slot`, moving it from wherever it was.
    pub fn assign(&mut self, slot: usize, piece: usize) -> Result<(), SessionError> {
        self.ensure_playing()?;
        Ok(self.guess.assign(slot, piece)?)
    }

    pub fn erase(&mut self, slot: usize) -> Result<(), SessionError> {
        self.ensure_playing()?;
        Ok(self.guess.erase(slot)?)
    }

    pub fn rotate(&mut self, slot: usize) -> Result<(), SessionError> {
        self.ensure_playing()?;
        Ok(self.guess.rotate(slot)?)
    }

    /// Replaces the whole guess, e.g. when restoring a saved game.
    pub fn set_guess(&mut self, guess: CubeState) -> Result<(), SessionError> {
        self.ensure_playing()?;
        self.guess = guess;
        Ok(())
    }

    pub fn select(&mut self, slot: Option<usize>) -> Result<(), SessionError> {
        if let Some(slot) = slot.filter(|&slot| slot >= NUM_PIECES) {
            return Err(ShapeError::SlotOutOfRange { slot }.into());
        }
        self.selection = slot;
        Ok(())
    }

    /// Moves the selection one step in a screen direction.
    ///
    /// Returns the newly selected slot, or `None` (leaving the selection
    /// untouched) when nothing is selected or no neighbour qualifies.
    pub fn navigate(&mut self, direction: Direction, camera: &CameraBasis) -> Option<usize> {
        let target = navigation::resolve_direction(self.selection?, direction, camera)?;
        self.selection = Some(target);
        Some(target)
    }

    /// Scores the current guess and uses up an attempt.
    ///
    /// Incomplete and unreachable guesses are refused without costing an
    /// attempt.
    pub fn submit(&mut self) -> Result<GuessFeedback, SessionError> {
        self.ensure_playing()?;
        if !self.guess.verify()? {
            let report = self.guess.parity_report();
            log::warn!("rejected unreachable guess: {report:?}");
            return Err(SessionError::Unreachable { report });
        }

        let comparison = facelets::compare_guess(&self.guess_facelets(), &self.target_facelets);
        let feedback = GuessFeedback {
            comparison,
            pieces_correct: facelets::pieces_correct(&self.guess, &self.target),
            stickers_correct: comparison.correct_facelets,
        };
        self.history.push(GuessRecord {
            state: self.guess,
            feedback,
        });

        if comparison.is_win() {
            self.status = Status::Won;
            log::info!("puzzle {:?} solved in {} attempt(s)", self.seed, self.history.len());
        } else if self.attempts_left() == 0 {
            self.status = Status::Lost;
            log::info!("puzzle {:?} lost", self.seed);
        }

        Ok(feedback)
    }
}
