//! Piece catalog and coordinate types.
//!
//! The 20 movable pieces of a 3x3x3 cube (12 edges, 8 corners) are named by
//! the faces they touch. Their position in [`PIECE_NAMES`] is the slot index
//! used by every permutation and orientation array in the crate. Centers
//! never move and are not pieces.

use std::ops::Range;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// A 3D grid coordinate of a cubie, each axis in `0..=2`.
///
/// x runs from L (0) to R (2), y from D (0) to U (2), z from B (0) to F (2).
pub type Coord = (i32, i32, i32);

/// Number of edge pieces.
pub const NUM_EDGES: usize = 12;
/// Number of corner pieces.
pub const NUM_CORNERS: usize = 8;
/// Number of movable pieces, and therefore slots.
pub const NUM_PIECES: usize = NUM_EDGES + NUM_CORNERS;

/// The canonical piece order: edges first, then corners.
///
/// Each corner lists its faces counter-clockwise as seen from outside the
/// cube, so the first letter of every piece is its reference sticker (U/D
/// for anything touching U or D, F/B for the middle-layer edges).
pub const PIECE_NAMES: [&str; NUM_PIECES] = [
    // edges
    "UF", "UR", "UB", "UL", "DF", "DR", "DB", "DL", "FR", "FL", "BR", "BL",
    // corners
    "UFR", "URB", "UBL", "ULF", "DRF", "DFL", "DLB", "DBR",
];

/// A face of the cube, which is also the color of its center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    U,
    L,
    F,
    R,
    B,
    D,
}

impl Face {
    /// All faces, in facelet order.
    pub const ALL: [Face; 6] = [Face::U, Face::L, Face::F, Face::R, Face::B, Face::D];

    /// Position of this face in [`Face::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::L => 'L',
            Face::F => 'F',
            Face::R => 'R',
            Face::B => 'B',
            Face::D => 'D',
        }
    }

    pub const fn from_letter(letter: u8) -> Option<Face> {
        match letter {
            b'U' => Some(Face::U),
            b'L' => Some(Face::L),
            b'F' => Some(Face::F),
            b'R' => Some(Face::R),
            b'B' => Some(Face::B),
            b'D' => Some(Face::D),
            _ => None,
        }
    }

    /// Which grid axis this face bounds and the coordinate of its layer.
    const fn layer(self) -> (usize, i32) {
        match self {
            Face::L => (0, 0),
            Face::R => (0, 2),
            Face::D => (1, 0),
            Face::U => (1, 2),
            Face::B => (2, 0),
            Face::F => (2, 2),
        }
    }
}

/// Whether a slot holds edges or corners. Pieces never cross roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Edge,
    Corner,
}

impl Role {
    /// Number of distinct orientations a piece of this role can take.
    pub const fn orientation_count(self) -> u8 {
        match self {
            Role::Edge => 2,
            Role::Corner => 3,
        }
    }

    /// Slot indices belonging to this role.
    pub const fn slots(self) -> Range<usize> {
        match self {
            Role::Edge => 0..NUM_EDGES,
            Role::Corner => NUM_EDGES..NUM_PIECES,
        }
    }
}

/// Returns the role of a slot (or of the piece with that index).
#[inline]
pub const fn role(slot: usize) -> Role {
    if slot < NUM_EDGES {
        Role::Edge
    } else {
        Role::Corner
    }
}

/// Returns the name of a piece, e.g. `"UFR"`.
#[inline]
pub fn name(piece: usize) -> &'static str {
    PIECE_NAMES[piece]
}

/// Returns the faces a piece touches, in name order.
pub fn faces(piece: usize) -> impl Iterator<Item = Face> {
    PIECE_NAMES[piece].bytes().filter_map(Face::from_letter)
}

static INDEX_BY_NAME: LazyLock<FxHashMap<&'static str, usize>> = LazyLock::new(|| {
    PIECE_NAMES
        .iter()
        .enumerate()
        .map(|(index, &name)| (name, index))
        .collect()
});

/// Looks up a piece by its exact name.
///
/// Returns `None` for anything that is not one of the 20 pieces, including
/// center (1 letter) and empty (0 letter) names.
pub fn index_of(name: &str) -> Option<usize> {
    INDEX_BY_NAME.get(name).copied()
}

/// Grid coordinate of the cubie touching exactly `faces`.
fn coord_of_faces(faces: impl IntoIterator<Item = Face>) -> Coord {
    let mut coord = [1; 3];
    for face in faces {
        let (axis, layer) = face.layer();
        coord[axis] = layer;
    }
    (coord[0], coord[1], coord[2])
}

static COORDS: LazyLock<[Coord; NUM_PIECES]> =
    LazyLock::new(|| std::array::from_fn(|piece| coord_of_faces(faces(piece))));

static PIECE_BY_COORD: LazyLock<FxHashMap<Coord, usize>> = LazyLock::new(|| {
    COORDS
        .iter()
        .enumerate()
        .map(|(piece, &coord)| (coord, piece))
        .collect()
});

/// Returns the home grid coordinate of a slot.
#[inline]
pub fn coord(slot: usize) -> Coord {
    COORDS[slot]
}

/// Returns the slot whose cubie sits at `coord`, or `None` for centers,
/// the core, and anything outside the grid.
pub fn slot_at(coord: Coord) -> Option<usize> {
    PIECE_BY_COORD.get(&coord).copied()
}

/// Edge-corner adjacency: an edge neighbours a corner when every face of
/// the edge is also a face of the corner.
static ADJACENCY: LazyLock<Vec<Vec<usize>>> = LazyLock::new(|| {
    let touches =
        |edge: usize, corner: usize| faces(edge).all(|face| faces(corner).any(|f| f == face));
    (0..NUM_PIECES)
        .map(|piece| match role(piece) {
            Role::Edge => Role::Corner
                .slots()
                .filter(|&corner| touches(piece, corner))
                .collect(),
            Role::Corner => Role::Edge
                .slots()
                .filter(|&edge| touches(edge, piece))
                .collect(),
        })
        .collect()
});

/// Returns the pieces adjacent to `piece`: corners for an edge, edges for a
/// corner.
pub fn adjacent(piece: usize) -> &'static [usize] {
    &ADJACENCY[piece]
}
