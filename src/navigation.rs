//! Camera-relative movement of the piece selection.
//!
//! A screen direction is turned into a 3D axis using the camera's basis, and
//! the selection jumps to whichever adjacent piece lies most clearly along
//! that axis. Moves that are ambiguous (closer to the perpendicular screen
//! axis) or weak are dropped instead of guessed.

use cgmath::{InnerSpace, Vector3};

use crate::pieces::{self, Coord};

/// Minimum alignment between the move and the requested axis.
pub const MIN_ALIGNMENT: f32 = 0.5;

/// Vectors shorter than this are treated as degenerate.
const EPSILON: f32 = 1e-6;

/// A direction on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Orientation of the camera in world space (same axes as [`Coord`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    /// Direction the camera looks in.
    pub forward: Vector3<f32>,
    /// The camera's up vector; need not be orthogonal to `forward`.
    pub up: Vector3<f32>,
}

impl CameraBasis {
    pub fn new(forward: Vector3<f32>, up: Vector3<f32>) -> Self {
        Self { forward, up }
    }

    /// Camera in front of the F face looking at it, with U up.
    pub fn front() -> Self {
        Self::new(Vector3::new(0.0, 0.0, -1.0), Vector3::unit_y())
    }

    /// Returns the orthonormal screen axes `(right, screen_up)`, or `None`
    /// when the camera vectors do not span a plane.
    fn screen_axes(&self) -> Option<(Vector3<f32>, Vector3<f32>)> {
        if self.forward.magnitude2() < EPSILON {
            return None;
        }
        let right = self.forward.cross(self.up);
        if right.magnitude2() < EPSILON {
            return None;
        }
        let screen_up = right.cross(self.forward);
        Some((right.normalize(), screen_up.normalize()))
    }
}

fn to_vector((x, y, z): Coord) -> Vector3<f32> {
    Vector3::new(x as f32, y as f32, z as f32)
}

/// Picks the piece adjacent to `current` that lies in `direction` on screen.
///
/// Returns `None` when no neighbour is confidently in that direction.
pub fn resolve_direction(
    current: usize,
    direction: Direction,
    camera: &CameraBasis,
) -> Option<usize> {
    let (right, screen_up) = camera.screen_axes()?;

    // primary axis carries the move, orthogonal axis disqualifies diagonals
    let (primary, orthogonal) = match direction {
        Direction::Up => (screen_up, right),
        Direction::Down => (-screen_up, right),
        Direction::Right => (right, screen_up),
        Direction::Left => (-right, screen_up),
    };

    let origin = to_vector(pieces::coord(current));
    let mut best: Option<(usize, f32)> = None;

    for &candidate in pieces::adjacent(current) {
        let offset = to_vector(pieces::coord(candidate)) - origin;
        if offset.magnitude2() < EPSILON {
            continue;
        }
        let move_vector = offset.normalize();

        let score = move_vector.dot(primary);
        if move_vector.dot(orthogonal).abs() >= score {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    best.filter(|&(_, score)| score >= MIN_ALIGNMENT)
        .map(|(candidate, _)| candidate)
}
