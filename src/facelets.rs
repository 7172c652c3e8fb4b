//! Projection of a cube state onto its 54 visible facelets, and scoring of
//! guesses against the answer.
//!
//! Facelets are stored face by face in [`Face::ALL`] order (U, L, F, R, B, D),
//! nine per face in row-major order as the face appears in the unfolded net:
//! U seen from above with B at the top, the four side faces seen from outside
//! with U at the top, and D seen from below with F at the top.

use std::sync::LazyLock;

use crate::pieces::{self, role, Coord, Face, Role};
use crate::state::CubeState;

/// Number of facelets per face.
pub const FACELETS_PER_FACE: usize = 9;
/// Number of facelets on the cube.
pub const NUM_FACELETS: usize = 6 * FACELETS_PER_FACE;
/// Facelets that never move.
pub const NUM_CENTERS: usize = 6;

/// Visible colors of a cube. `None` marks a facelet of an unassigned slot.
pub type Facelets = [Option<Face>; NUM_FACELETS];

/// What a facelet position shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FaceletSource {
    /// A fixed center.
    Center(Face),
    /// Sticker number `sticker` (an index into the slot's name) of whatever
    /// piece occupies `slot`.
    Piece { slot: usize, sticker: usize },
}

/// Returns the cubie behind `(row, col)` of `face` in net order.
const fn net_coord(face: Face, row: i32, col: i32) -> Coord {
    match face {
        Face::U => (col, 2, row),
        Face::L => (0, 2 - row, col),
        Face::F => (col, 2 - row, 2),
        Face::R => (2, 2 - row, 2 - col),
        Face::B => (2 - col, 2 - row, 0),
        Face::D => (col, 0, 2 - row),
    }
}

static FACELET_SOURCES: LazyLock<[FaceletSource; NUM_FACELETS]> = LazyLock::new(|| {
    std::array::from_fn(|facelet| {
        let face = Face::ALL[facelet / FACELETS_PER_FACE];
        let position = (facelet % FACELETS_PER_FACE) as i32;
        let coord = net_coord(face, position / 3, position % 3);

        match pieces::slot_at(coord) {
            Some(slot) => FaceletSource::Piece {
                slot,
                sticker: pieces::faces(slot)
                    .position(|f| f == face)
                    .unwrap_or_default(),
            },
            None => FaceletSource::Center(face),
        }
    })
});

/// Offset added to a sticker index to find the color shown for a piece.
///
/// Corner twists are read in the opposite rotational sense to the state's
/// counter, so a corner with orientation 1 shows offset 2 and vice versa.
#[inline]
fn display_offset(slot: usize, orientation: u8) -> usize {
    match role(slot) {
        Role::Edge => orientation as usize,
        Role::Corner => (3 - orientation as usize) % 3,
    }
}

/// Computes the color of every facelet of `state`.
pub fn project(state: &CubeState) -> Facelets {
    std::array::from_fn(|facelet| match FACELET_SOURCES[facelet] {
        FaceletSource::Center(face) => Some(face),
        FaceletSource::Piece { slot, sticker } => {
            let piece = state.piece_at(slot)?;
            let colors = pieces::name(piece).as_bytes();
            let offset = display_offset(slot, state.orientation_at(slot));
            Face::from_letter(colors[(sticker + offset) % colors.len()])
        }
    })
}

/// Per-facelet comparison of a guess against the answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub matches: [bool; NUM_FACELETS],
    /// Matching facelets, centers included.
    pub correct_facelets: usize,
}

impl Comparison {
    /// Returns true if every facelet matches.
    pub fn is_win(&self) -> bool {
        self.correct_facelets == NUM_FACELETS
    }
}

/// Compares two projections facelet by facelet.
///
/// Matching is exact: there is no partial credit for a color that appears
/// elsewhere. Unknown facelets never match.
pub fn compare_guess(guess: &Facelets, answer: &Facelets) -> Comparison {
    let matches: [bool; NUM_FACELETS] =
        std::array::from_fn(|i| guess[i].is_some() && guess[i] == answer[i]);
    Comparison {
        matches,
        correct_facelets: matches.iter().filter(|&&m| m).count(),
    }
}

/// Counts slots whose piece and orientation both match the answer.
pub fn pieces_correct(guess: &CubeState, answer: &CubeState) -> usize {
    (0..pieces::NUM_PIECES)
        .filter(|&slot| {
            guess.piece_at(slot).is_some()
                && guess.piece_at(slot) == answer.piece_at(slot)
                && guess.orientation_at(slot) == answer.orientation_at(slot)
        })
        .count()
}

/// Formats facelets as an unfolded cross-shaped net.
///
/// Unknown facelets show as '.'.
pub fn format_net(facelets: &Facelets) -> String {
    format_grid(|facelet| facelets[facelet].map_or('.', Face::letter))
}

/// Lays out one character per facelet index in the shape of the net.
pub fn format_grid(cell: impl Fn(usize) -> char) -> String {
    let row_of = |face: Face, row: usize| -> String {
        let start = face.index() * FACELETS_PER_FACE + row * 3;
        (start..start + 3).map(&cell).collect()
    };

    let mut output = String::new();
    for row in 0..3 {
        output.push_str(&format!("    {}\n", row_of(Face::U, row)));
    }
    for row in 0..3 {
        let band: Vec<String> = [Face::L, Face::F, Face::R, Face::B]
            .into_iter()
            .map(|face| row_of(face, row))
            .collect();
        output.push_str(&band.join(" "));
        output.push('\n');
    }
    for row in 0..3 {
        output.push_str(&format!("    {}\n", row_of(Face::D, row)));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::generate;

    fn slot(name: &str) -> usize {
        pieces::index_of(name).unwrap()
    }

    fn facelet(face: Face, row: usize, col: usize) -> usize {
        face.index() * FACELETS_PER_FACE + row * 3 + col
    }

    #[test]
    fn test_solved_faces_are_uniform() {
        let facelets = project(&CubeState::solved());
        for face in Face::ALL {
            for i in 0..FACELETS_PER_FACE {
                assert_eq!(
                    facelets[face.index() * FACELETS_PER_FACE + i],
                    Some(face),
                    "Facelet {i} of face {face:?} has the wrong color"
                );
            }
        }
    }

    #[test]
    fn test_every_piece_sticker_is_shown_once() {
        let mut seen = [[false; 3]; pieces::NUM_PIECES];
        let mut centers = 0;
        for source in FACELET_SOURCES.iter() {
            match *source {
                FaceletSource::Center(_) => centers += 1,
                FaceletSource::Piece { slot, sticker } => {
                    assert!(!seen[slot][sticker], "Sticker {sticker} of {slot} shown twice");
                    seen[slot][sticker] = true;
                }
            }
        }
        assert_eq!(centers, NUM_CENTERS);
        for (slot, stickers) in seen.iter().enumerate() {
            let expected = pieces::name(slot).len();
            assert!(stickers[..expected].iter().all(|&s| s), "Slot {slot} is missing a sticker");
        }
    }

    #[test]
    fn test_net_positions_of_known_stickers() {
        let sources = &*FACELET_SOURCES;
        assert_eq!(
            sources[facelet(Face::U, 2, 1)],
            FaceletSource::Piece { slot: slot("UF"), sticker: 0 }
        );
        assert_eq!(
            sources[facelet(Face::F, 0, 1)],
            FaceletSource::Piece { slot: slot("UF"), sticker: 1 }
        );
        assert_eq!(
            sources[facelet(Face::F, 0, 2)],
            FaceletSource::Piece { slot: slot("UFR"), sticker: 1 }
        );
        assert_eq!(
            sources[facelet(Face::R, 0, 0)],
            FaceletSource::Piece { slot: slot("UFR"), sticker: 2 }
        );
        assert_eq!(
            sources[facelet(Face::D, 0, 0)],
            FaceletSource::Piece { slot: slot("DFL"), sticker: 0 }
        );
        assert_eq!(sources[facelet(Face::B, 1, 1)], FaceletSource::Center(Face::B));
    }

    #[test]
    fn test_edge_flip_swaps_its_two_colors() {
        let mut state = CubeState::solved();
        state.rotate(slot("UF")).unwrap();
        let facelets = project(&state);
        assert_eq!(facelets[facelet(Face::U, 2, 1)], Some(Face::F));
        assert_eq!(facelets[facelet(Face::F, 0, 1)], Some(Face::U));
    }

    #[test]
    fn test_corner_twist_uses_reversed_offset() {
        let mut state = CubeState::solved();
        state.rotate(slot("UFR")).unwrap();
        let facelets = project(&state);
        // orientation 1 displays with offset 2: U slot shows R, F slot shows U
        assert_eq!(facelets[facelet(Face::U, 2, 2)], Some(Face::R));
        assert_eq!(facelets[facelet(Face::F, 0, 2)], Some(Face::U));
        assert_eq!(facelets[facelet(Face::R, 0, 0)], Some(Face::F));
    }

    #[test]
    fn test_moved_piece_shows_its_own_colors() {
        let mut state = CubeState::solved();
        state.assign(slot("UF"), slot("DB")).unwrap();
        state.assign(slot("DB"), slot("UF")).unwrap();
        let facelets = project(&state);
        assert_eq!(facelets[facelet(Face::U, 2, 1)], Some(Face::D));
        assert_eq!(facelets[facelet(Face::F, 0, 1)], Some(Face::B));
    }

    #[test]
    fn test_unassigned_slots_have_no_color() {
        let facelets = project(&CubeState::empty());
        assert_eq!(facelets.iter().filter(|f| f.is_some()).count(), NUM_CENTERS);
    }

    #[test]
    fn test_project_is_deterministic() {
        let state = generate("projection").unwrap();
        assert_eq!(project(&state), project(&state));
    }

    #[test]
    fn test_compare_with_itself_matches_everything() {
        for i in 0..50 {
            let state = generate(&format!("compare-{i}")).unwrap();
            let facelets = project(&state);
            let comparison = compare_guess(&facelets, &facelets);
            assert!(comparison.matches.iter().all(|&m| m));
            assert_eq!(comparison.correct_facelets, NUM_FACELETS);
            assert!(comparison.is_win());
            assert_eq!(pieces_correct(&state, &state), pieces::NUM_PIECES);
        }
    }

    #[test]
    fn test_empty_guess_scores_only_centers() {
        let answer = project(&generate("centers").unwrap());
        let comparison = compare_guess(&project(&CubeState::empty()), &answer);
        assert_eq!(comparison.correct_facelets, NUM_CENTERS);
        assert!(!comparison.is_win());
    }

    #[test]
    fn test_pieces_correct_requires_orientation() {
        let answer = CubeState::solved();
        let mut guess = CubeState::solved();
        guess.rotate(slot("UFR")).unwrap();
        guess.erase(slot("BL")).unwrap();
        assert_eq!(pieces_correct(&guess, &answer), pieces::NUM_PIECES - 2);

        // a twisted corner keeps none of its stickers, but the others still match
        let comparison = compare_guess(&project(&guess), &project(&answer));
        assert_eq!(comparison.correct_facelets, NUM_FACELETS - 3 - 2);
    }

    #[test]
    fn test_format_solved_net() {
        insta::assert_snapshot!(format_net(&project(&CubeState::solved())), @r"
            UUU
            UUU
            UUU
        LLL FFF RRR BBB
        LLL FFF RRR BBB
        LLL FFF RRR BBB
            DDD
            DDD
            DDD
        ");
    }

    #[test]
    fn test_format_partial_net() {
        let mut state = CubeState::solved();
        state.erase(slot("UF")).unwrap();
        insta::assert_snapshot!(format_net(&project(&state)), @r"
            UUU
            UUU
            U.U
        LLL F.F RRR BBB
        LLL FFF RRR BBB
        LLL FFF RRR BBB
            DDD
            DDD
            DDD
        ");
    }
}
