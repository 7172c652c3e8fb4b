//! Compact cube state and its validity rules.
//!
//! A [`CubeState`] records which piece occupies each of the 20 slots and how
//! far that piece is turned away from its solved orientation. Face turns are
//! never modelled: pieces are placed and twisted directly, so reachability is
//! decided purely by the three parity invariants of the cube group:
//! - the combined edge + corner permutation is even
//! - the edge flips sum to 0 mod 2
//! - the corner twists sum to 0 mod 3
//!
//! Every `CubeState` is shape-valid by construction (no role crossing, no
//! duplicated piece, orientations in range). It may still be incomplete
//! while a guess is being built.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::pieces::{self, role, Role, NUM_CORNERS, NUM_EDGES, NUM_PIECES};

/// Upper bound on rejection-sampling rounds in [`generate`].
///
/// About one random draw in twelve is solvable, so reaching this bound is
/// effectively impossible.
pub const MAX_GENERATE_ATTEMPTS: usize = 1000;

/// Wire value for an unassigned slot.
pub const UNASSIGNED: i32 = -1;

fn piece_name(index: &usize) -> &'static str {
    pieces::PIECE_NAMES.get(*index).copied().unwrap_or("?")
}

/// A state that is malformed, as opposed to merely unsolvable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("{field} has {len} entries, expected {}", NUM_PIECES)]
    WrongLength { field: &'static str, len: usize },
    #[error("slot index {slot} is out of range")]
    SlotOutOfRange { slot: usize },
    #[error("slot {slot} holds {value}, which is not a piece")]
    PieceOutOfRange { slot: usize, value: i64 },
    #[error("slot {} cannot hold piece {}", piece_name(.slot), piece_name(.piece))]
    RoleMismatch { slot: usize, piece: usize },
    #[error("piece {} appears in slots {first} and {second}", piece_name(.piece))]
    DuplicatePiece {
        piece: usize,
        first: usize,
        second: usize,
    },
    #[error("slot {} has orientation {value}, which is out of range", piece_name(.slot))]
    OrientationOutOfRange { slot: usize, value: i64 },
    #[error("slot {} is unassigned but has orientation {value}", piece_name(.slot))]
    UnassignedOrientation { slot: usize, value: i64 },
    #[error("slot {} is unassigned", piece_name(.slot))]
    Incomplete { slot: usize },
}

/// Failure to produce a puzzle from a seed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("no solvable state found for seed {seed:?} after {attempts} attempts")]
    RetryCapExceeded { seed: String, attempts: usize },
}

/// Individual parity bits of a state, for telling the player which
/// constraint a guess breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParityReport {
    /// Permutation parity (0 even, 1 odd), or `None` while incomplete.
    pub permutation: Option<u8>,
    /// Edge flip sum mod 2 over assigned edges.
    pub edge: u8,
    /// Corner twist sum mod 3 over assigned corners.
    pub corner_twist: u8,
}

impl ParityReport {
    /// Returns true if no constraint is currently known to be violated.
    pub fn is_clean(&self) -> bool {
        self.permutation.unwrap_or(0) == 0 && self.edge == 0 && self.corner_twist == 0
    }
}

/// Permutation and orientation of the 20 movable pieces, indexed by slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubeState {
    /// `permutation[slot]` is the piece in `slot`, `None` when unassigned.
    permutation: [Option<u8>; NUM_PIECES],
    /// Rotational offset of the piece in each slot; 0 for unassigned slots.
    orientation: [u8; NUM_PIECES],
}

impl Default for CubeState {
    fn default() -> Self {
        Self::empty()
    }
}

impl CubeState {
    /// The solved cube: every piece home, every orientation 0.
    pub fn solved() -> Self {
        Self {
            permutation: std::array::from_fn(|slot| Some(slot as u8)),
            orientation: [0; NUM_PIECES],
        }
    }

    /// A state with every slot unassigned.
    pub const fn empty() -> Self {
        Self {
            permutation: [None; NUM_PIECES],
            orientation: [0; NUM_PIECES],
        }
    }

    /// Builds a state after checking its shape.
    pub fn new(
        permutation: [Option<u8>; NUM_PIECES],
        orientation: [u8; NUM_PIECES],
    ) -> Result<Self, ShapeError> {
        let mut seen_in: [Option<usize>; NUM_PIECES] = [None; NUM_PIECES];

        for slot in 0..NUM_PIECES {
            let value = orientation[slot];
            let Some(piece) = permutation[slot] else {
                if value != 0 {
                    return Err(ShapeError::UnassignedOrientation {
                        slot,
                        value: value.into(),
                    });
                }
                continue;
            };
            let piece = piece as usize;

            if piece >= NUM_PIECES {
                return Err(ShapeError::PieceOutOfRange {
                    slot,
                    value: piece as i64,
                });
            }
            if role(piece) != role(slot) {
                return Err(ShapeError::RoleMismatch { slot, piece });
            }
            if let Some(first) = seen_in[piece] {
                return Err(ShapeError::DuplicatePiece {
                    piece,
                    first,
                    second: slot,
                });
            }
            seen_in[piece] = Some(slot);

            if value >= role(slot).orientation_count() {
                return Err(ShapeError::OrientationOutOfRange {
                    slot,
                    value: value.into(),
                });
            }
        }

        Ok(Self {
            permutation,
            orientation,
        })
    }

    /// Builds a state from the flat integer arrays used on the wire, where
    /// [`UNASSIGNED`] marks an empty slot in both arrays.
    pub fn from_raw(permutation: &[i32], orientation: &[i32]) -> Result<Self, ShapeError> {
        if permutation.len() != NUM_PIECES {
            return Err(ShapeError::WrongLength {
                field: "permutation",
                len: permutation.len(),
            });
        }
        if orientation.len() != NUM_PIECES {
            return Err(ShapeError::WrongLength {
                field: "orientation",
                len: orientation.len(),
            });
        }

        let mut typed_permutation = [None; NUM_PIECES];
        let mut typed_orientation = [0; NUM_PIECES];
        for slot in 0..NUM_PIECES {
            let (piece, value) = (permutation[slot], orientation[slot]);
            if piece == UNASSIGNED {
                if value != UNASSIGNED && value != 0 {
                    return Err(ShapeError::UnassignedOrientation {
                        slot,
                        value: value.into(),
                    });
                }
                continue;
            }
            typed_permutation[slot] = Some(u8::try_from(piece).map_err(|_| {
                ShapeError::PieceOutOfRange {
                    slot,
                    value: piece.into(),
                }
            })?);
            typed_orientation[slot] = u8::try_from(value).map_err(|_| {
                ShapeError::OrientationOutOfRange {
                    slot,
                    value: value.into(),
                }
            })?;
        }

        Self::new(typed_permutation, typed_orientation)
    }

    /// Flattens the state into wire arrays, with [`UNASSIGNED`] for empty
    /// slots.
    pub fn to_raw(&self) -> (Vec<i32>, Vec<i32>) {
        (0..NUM_PIECES)
            .map(|slot| match self.permutation[slot] {
                Some(piece) => (i32::from(piece), i32::from(self.orientation[slot])),
                None => (UNASSIGNED, UNASSIGNED),
            })
            .unzip()
    }

    /// Returns the piece in `slot`.
    #[inline]
    pub fn piece_at(&self, slot: usize) -> Option<usize> {
        self.permutation[slot].map(usize::from)
    }

    /// Returns the orientation of the piece in `slot` (0 when unassigned).
    #[inline]
    pub fn orientation_at(&self, slot: usize) -> u8 {
        self.orientation[slot]
    }

    /// Returns the slot currently holding `piece`.
    pub fn slot_of(&self, piece: usize) -> Option<usize> {
        self.permutation
            .iter()
            .position(|&p| p.map(usize::from) == Some(piece))
    }

    /// Returns the first unassigned slot, if any.
    pub fn first_unassigned(&self) -> Option<usize> {
        self.permutation.iter().position(Option::is_none)
    }

    /// Returns true if every slot holds a piece.
    pub fn is_complete(&self) -> bool {
        self.first_unassigned().is_none()
    }

    /// Places `piece` into `slot` with orientation 0.
    ///
    /// If the piece already sits in another slot it is moved, leaving that
    /// slot unassigned; whatever was in `slot` before is dropped.
    pub fn assign(&mut self, slot: usize, piece: usize) -> Result<(), ShapeError> {
        if slot >= NUM_PIECES {
            return Err(ShapeError::SlotOutOfRange { slot });
        }
        if piece >= NUM_PIECES {
            return Err(ShapeError::PieceOutOfRange {
                slot,
                value: piece as i64,
            });
        }
        if role(piece) != role(slot) {
            return Err(ShapeError::RoleMismatch { slot, piece });
        }
        if let Some(previous) = self.slot_of(piece) {
            self.erase(previous)?;
        }
        self.permutation[slot] = Some(piece as u8);
        self.orientation[slot] = 0;
        Ok(())
    }

    /// Clears `slot`.
    pub fn erase(&mut self, slot: usize) -> Result<(), ShapeError> {
        if slot >= NUM_PIECES {
            return Err(ShapeError::SlotOutOfRange { slot });
        }
        self.permutation[slot] = None;
        self.orientation[slot] = 0;
        Ok(())
    }

    /// Turns the piece in `slot` one step. Unassigned slots are left alone.
    pub fn rotate(&mut self, slot: usize) -> Result<(), ShapeError> {
        if slot >= NUM_PIECES {
            return Err(ShapeError::SlotOutOfRange { slot });
        }
        if self.permutation[slot].is_some() {
            let count = role(slot).orientation_count();
            self.orientation[slot] = (self.orientation[slot] + 1) % count;
        }
        Ok(())
    }

    /// Returns whether a complete state is reachable on a physical cube.
    ///
    /// Fails with [`ShapeError::Incomplete`] when any slot is unassigned;
    /// an unsolvable but complete state is `Ok(false)`.
    pub fn verify(&self) -> Result<bool, ShapeError> {
        if let Some(slot) = self.first_unassigned() {
            return Err(ShapeError::Incomplete { slot });
        }
        Ok(self.parities_hold())
    }

    /// Parity test for a state already known to be complete.
    fn parities_hold(&self) -> bool {
        self.complete_permutation_parity() == 0
            && self.edge_parity() == 0
            && self.corner_twist() == 0
    }

    /// Permutation parity of all 20 slots (0 even, 1 odd), or `None` while
    /// any slot is unassigned.
    pub fn permutation_parity(&self) -> Option<u8> {
        self.is_complete()
            .then(|| self.complete_permutation_parity())
    }

    /// Parity from the cycle decomposition: a k-cycle is k-1 transpositions.
    fn complete_permutation_parity(&self) -> u8 {
        let mut visited = [false; NUM_PIECES];
        let mut transpositions = 0;

        for start in 0..NUM_PIECES {
            if visited[start] {
                continue;
            }
            let mut slot = start;
            let mut cycle_len = 0;
            while !visited[slot] {
                visited[slot] = true;
                cycle_len += 1;
                match self.permutation[slot] {
                    Some(piece) => slot = piece as usize,
                    None => break,
                }
            }
            transpositions += cycle_len - 1;
        }

        (transpositions % 2) as u8
    }

    /// Edge flip sum mod 2 over assigned edge slots.
    pub fn edge_parity(&self) -> u8 {
        (self.orientation_sum(Role::Edge) % 2) as u8
    }

    /// Corner twist sum mod 3 over assigned corner slots.
    pub fn corner_twist(&self) -> u8 {
        (self.orientation_sum(Role::Corner) % 3) as u8
    }

    /// 0 when the corner twists sum to a multiple of 3, otherwise 1.
    pub fn corner_parity(&self) -> u8 {
        u8::from(self.corner_twist() != 0)
    }

    fn orientation_sum(&self, role: Role) -> u32 {
        // unassigned slots always carry orientation 0
        self.orientation[role.slots()].iter().map(|&o| u32::from(o)).sum()
    }

    /// Collects all three parities of this state.
    pub fn parity_report(&self) -> ParityReport {
        ParityReport {
            permutation: self.permutation_parity(),
            edge: self.edge_parity(),
            corner_twist: self.corner_twist(),
        }
    }
}

/// Deterministically generates a uniformly random solvable state from a
/// seed string.
///
/// The same seed yields the same state on every platform and every run.
pub fn generate(seed: &str) -> Result<CubeState, GenerateError> {
    generate_with_cap(seed, MAX_GENERATE_ATTEMPTS)
}

pub(crate) fn generate_with_cap(
    seed: &str,
    max_attempts: usize,
) -> Result<CubeState, GenerateError> {
    let digest: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
    let mut rng = ChaCha12Rng::from_seed(digest);

    let mut edges: [u8; NUM_EDGES] = std::array::from_fn(|i| i as u8);
    let mut corners: [u8; NUM_CORNERS] = std::array::from_fn(|i| (NUM_EDGES + i) as u8);

    for attempt in 1..=max_attempts {
        edges.shuffle(&mut rng);
        corners.shuffle(&mut rng);

        let mut state = CubeState::empty();
        for (slot, &piece) in edges.iter().chain(&corners).enumerate() {
            state.permutation[slot] = Some(piece);
            state.orientation[slot] = rng.random_range(0..role(slot).orientation_count());
        }

        // roughly 1 in 12 draws survives (1/2 * 1/2 * 1/3)
        if state.parities_hold() {
            log::debug!("generated puzzle for seed {seed:?} after {attempt} attempt(s)");
            return Ok(state);
        }
    }

    log::error!("gave up generating puzzle for seed {seed:?} after {max_attempts} attempts");
    Err(GenerateError::RetryCapExceeded {
        seed: seed.to_owned(),
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds() -> impl Iterator<Item = String> {
        (0..200).map(|i| format!("seed-{i}"))
    }

    fn slot(name: &str) -> usize {
        pieces::index_of(name).unwrap()
    }

    #[test]
    fn test_solved_state_verifies() {
        let solved = CubeState::solved();
        assert_eq!(solved.verify(), Ok(true));
        assert!(solved.parity_report().is_clean());
    }

    #[test]
    fn test_generate_is_deterministic() {
        for seed in seeds() {
            let first = generate(&seed).unwrap();
            let second = generate(&seed).unwrap();
            assert_eq!(first, second, "Seed {seed} produced two different states");
        }
    }

    #[test]
    fn test_generated_states_verify() {
        for seed in seeds() {
            let state = generate(&seed).unwrap();
            assert!(state.is_complete(), "Seed {seed} left a slot unassigned");
            assert_eq!(state.verify(), Ok(true), "Seed {seed} produced an unsolvable state");
            let (permutation, orientation) = state.to_raw();
            assert_eq!(
                CubeState::from_raw(&permutation, &orientation),
                Ok(state),
                "Seed {seed} produced a malformed state"
            );
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate("2026-10-17").unwrap();
        let b = generate("2026-10-18").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_single_edge_flip_breaks_verify() {
        for seed in seeds().take(50) {
            let mut state = generate(&seed).unwrap();
            state.rotate(slot("UF")).unwrap();
            assert_eq!(state.edge_parity(), 1);
            assert_eq!(state.verify(), Ok(false), "Flip on seed {seed} went unnoticed");
        }
    }

    #[test]
    fn test_single_corner_twist_breaks_verify() {
        let mut state = CubeState::solved();
        state.rotate(slot("DBR")).unwrap();
        assert_eq!(state.corner_twist(), 1);
        assert_eq!(state.corner_parity(), 1);
        assert_eq!(state.verify(), Ok(false));

        state.rotate(slot("UFR")).unwrap();
        state.rotate(slot("UFR")).unwrap();
        assert_eq!(state.corner_twist(), 0, "Twists 1 + 2 cancel mod 3");
        assert_eq!(state.verify(), Ok(true));
    }

    #[test]
    fn test_edge_transposition_breaks_verify() {
        for seed in seeds().take(50) {
            let state = generate(&seed).unwrap();
            let (mut permutation, orientation) = state.to_raw();
            permutation.swap(slot("UF"), slot("DB"));
            let swapped = CubeState::from_raw(&permutation, &orientation).unwrap();
            assert_eq!(swapped.permutation_parity(), Some(1));
            assert_eq!(swapped.verify(), Ok(false), "Swap on seed {seed} went unnoticed");
        }
    }

    #[test]
    fn test_edge_and_corner_swaps_cancel() {
        let (mut permutation, orientation) = CubeState::solved().to_raw();
        permutation.swap(slot("UF"), slot("UR"));
        permutation.swap(slot("UFR"), slot("URB"));
        let state = CubeState::from_raw(&permutation, &orientation).unwrap();
        assert_eq!(state.permutation_parity(), Some(0));
        assert_eq!(state.verify(), Ok(true));
    }

    #[test]
    fn test_three_cycle_is_even() {
        let (mut permutation, orientation) = CubeState::solved().to_raw();
        permutation[0..3].rotate_left(1);
        let state = CubeState::from_raw(&permutation, &orientation).unwrap();
        assert_eq!(state.permutation_parity(), Some(0));
    }

    #[test]
    fn test_incomplete_state_is_a_shape_error() {
        let mut state = CubeState::solved();
        state.erase(slot("FL")).unwrap();
        assert_eq!(state.verify(), Err(ShapeError::Incomplete { slot: slot("FL") }));
        assert_eq!(state.permutation_parity(), None);
        assert!(state.parity_report().is_clean(), "Partial diagnostics still apply");
    }

    #[test]
    fn test_shape_check_rejects_malformed_input() {
        let (permutation, orientation) = CubeState::solved().to_raw();

        assert!(matches!(
            CubeState::from_raw(&permutation[..19], &orientation),
            Err(ShapeError::WrongLength { field: "permutation", len: 19 })
        ));

        let mut bad = permutation.clone();
        bad[3] = 20;
        assert!(matches!(
            CubeState::from_raw(&bad, &orientation),
            Err(ShapeError::PieceOutOfRange { slot: 3, value: 20 })
        ));

        let mut bad = permutation.clone();
        bad[3] = -7;
        assert!(matches!(
            CubeState::from_raw(&bad, &orientation),
            Err(ShapeError::PieceOutOfRange { slot: 3, .. })
        ));

        let mut bad = permutation.clone();
        bad[0] = slot("UFR") as i32;
        assert!(matches!(
            CubeState::from_raw(&bad, &orientation),
            Err(ShapeError::RoleMismatch { slot: 0, .. })
        ));

        let mut bad = permutation.clone();
        bad[1] = 0;
        assert!(matches!(
            CubeState::from_raw(&bad, &orientation),
            Err(ShapeError::DuplicatePiece { piece: 0, first: 0, second: 1 })
        ));

        let mut bad = orientation.clone();
        bad[0] = 2;
        assert!(matches!(
            CubeState::from_raw(&permutation, &bad),
            Err(ShapeError::OrientationOutOfRange { slot: 0, value: 2 })
        ));

        let mut bad = permutation.clone();
        bad[5] = UNASSIGNED;
        let mut bad_orientation = orientation.clone();
        bad_orientation[5] = 1;
        assert!(matches!(
            CubeState::from_raw(&bad, &bad_orientation),
            Err(ShapeError::UnassignedOrientation { slot: 5, value: 1 })
        ));
    }

    #[test]
    fn test_unassigned_slots_roundtrip_as_sentinel() {
        let mut state = CubeState::solved();
        state.erase(slot("UBL")).unwrap();
        let (permutation, orientation) = state.to_raw();
        assert_eq!(permutation[slot("UBL")], UNASSIGNED);
        assert_eq!(orientation[slot("UBL")], UNASSIGNED);
        assert_eq!(CubeState::from_raw(&permutation, &orientation), Ok(state));
    }

    #[test]
    fn test_assign_moves_existing_piece() {
        let mut state = CubeState::empty();
        state.assign(slot("UF"), slot("DB")).unwrap();
        state.rotate(slot("UF")).unwrap();
        state.assign(slot("UR"), slot("DB")).unwrap();
        assert_eq!(state.piece_at(slot("UF")), None, "Old slot must be cleared");
        assert_eq!(state.piece_at(slot("UR")), Some(slot("DB")));
        assert_eq!(state.orientation_at(slot("UR")), 0, "Orientation resets on assign");
    }

    #[test]
    fn test_assign_rejects_role_crossing() {
        let mut state = CubeState::empty();
        assert_eq!(
            state.assign(slot("UF"), slot("UFR")),
            Err(ShapeError::RoleMismatch { slot: slot("UF"), piece: slot("UFR") })
        );
        assert_eq!(state, CubeState::empty(), "Failed assign must not mutate");
    }

    #[test]
    fn test_rotate_wraps_per_role() {
        let mut state = CubeState::solved();
        for expected in [1, 0] {
            state.rotate(slot("BL")).unwrap();
            assert_eq!(state.orientation_at(slot("BL")), expected);
        }
        for expected in [1, 2, 0] {
            state.rotate(slot("ULF")).unwrap();
            assert_eq!(state.orientation_at(slot("ULF")), expected);
        }

        let mut empty = CubeState::empty();
        empty.rotate(0).unwrap();
        assert_eq!(empty.orientation_at(0), 0, "Unassigned slots do not rotate");
    }

    #[test]
    fn test_retry_cap_is_an_error() {
        let error = generate_with_cap("any", 0).unwrap_err();
        assert_eq!(
            error,
            GenerateError::RetryCapExceeded {
                seed: "any".to_owned(),
                attempts: 0
            }
        );
    }
}
