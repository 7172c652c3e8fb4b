//! Cube Guessing Game Library
//!
//! Core of a Wordle-style puzzle: a hidden 3x3x3 cube state is generated
//! from a seed, and the player guesses the position and orientation of all
//! 20 movable pieces, receiving per-facelet feedback after each attempt.
//!
//! - [`pieces`]: piece names, slot order, coordinates, adjacency
//! - [`state`]: permutation + orientation states, parity checks, generation
//! - [`facelets`]: projection to the 54 visible colors and guess scoring
//! - [`navigation`]: moving the piece selection relative to the camera
//! - [`session`]: a single game from seed to win or loss
//! - [`persistence`]: JSON save and restore

pub mod facelets;
pub mod navigation;
pub mod persistence;
pub mod pieces;
pub mod session;
pub mod state;

pub use facelets::{compare_guess, project, Comparison, Facelets};
pub use navigation::{resolve_direction, CameraBasis, Direction};
pub use pieces::Face;
pub use session::{PuzzleSession, SessionConfig, SessionError, Status};
pub use state::{generate, CubeState, GenerateError, ParityReport, ShapeError};
