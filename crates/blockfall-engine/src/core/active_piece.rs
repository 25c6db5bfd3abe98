use serde::{Deserialize, Serialize};

use super::{
    board::Board,
    collision::collides,
    piece::{Cell, PieceKind, PieceShape, RotationDirection},
};

/// Position of a piece's matrix on the board.
///
/// `(x, y)` is the board coordinate of the matrix's top-left corner. X grows
/// rightward and Y grows downward. Coordinates are signed because the empty
/// columns of a matrix may hang outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The piece currently under the player's control.
///
/// Pieces are values: moves and rotations return a new `ActivePiece` and the
/// session only keeps it if it does not collide.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Board, PieceKind, RotationDirection};
///
/// let board = Board::new(10, 20);
/// let piece = ActivePiece::spawn(PieceKind::T, board.cols());
/// assert_eq!((piece.position().x(), piece.position().y()), (4, 0));
///
/// let rotated = piece
///     .rotated_with_kick(&board, RotationDirection::Clockwise)
///     .unwrap();
/// assert_eq!(rotated.shape().to_string(), ".T.\n.TT\n.T.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivePiece {
    kind: PieceKind,
    shape: PieceShape,
    position: PiecePosition,
}

impl ActivePiece {
    /// Creates a piece in its catalog orientation at `(x, y)`.
    #[must_use]
    pub fn new(kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            position: PiecePosition::new(x, y),
        }
    }

    /// Creates a piece at the spawn position of a board `cols` wide.
    ///
    /// The matrix is centered horizontally (`cols / 2 - size / 2`) on the top row.
    #[must_use]
    pub fn spawn(kind: PieceKind, cols: usize) -> Self {
        let size = kind.shape().size();
        Self::new(kind, to_coord(cols / 2) - to_coord(size / 2), 0)
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &PieceShape {
        &self.shape
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    /// Returns board coordinates and cells of all the piece's blocks.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.shape.occupied_cells().map(move |(dx, dy, cell)| {
            (
                self.position.x + to_coord(dx),
                self.position.y + to_coord(dy),
                cell,
            )
        })
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.shifted(dx, dy),
            ..*self
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    /// Rotates the matrix without moving it or checking the board.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        Self {
            shape: self.shape.rotated(direction),
            ..*self
        }
    }

    /// Rotates the piece, shifting it sideways if the rotated matrix collides.
    ///
    /// Returns `None` when neither the unshifted position nor any kick
    /// candidate is free. The original piece is left untouched either way.
    #[must_use]
    pub fn rotated_with_kick(&self, board: &Board, direction: RotationDirection) -> Option<Self> {
        let piece = self.rotated(direction);
        if !collides(board, &piece) {
            return Some(piece);
        }
        kick_offsets(piece.shape.size())
            .map(|dx| piece.shifted(dx, 0))
            .find(|candidate| !collides(board, candidate))
    }

    /// Returns the lowest position reachable by moving straight down.
    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while !collides(board, &dropped.down()) {
            dropped = dropped.down();
        }
        dropped
    }
}

/// Returns the horizontal displacements tried after a blocked rotation.
///
/// The piece is pushed by steps of +1, -2, +3, -4, ... so the tried
/// displacements are +1, -1, +2, -2, .... The search ends as soon as the next
/// step would exceed `width`.
///
/// # Example
///
/// ```
/// use blockfall_engine::kick_offsets;
///
/// assert_eq!(kick_offsets(2).collect::<Vec<_>>(), [1]);
/// assert_eq!(kick_offsets(3).collect::<Vec<_>>(), [1, -1, 2]);
/// assert_eq!(kick_offsets(5).collect::<Vec<_>>(), [1, -1, 2, -2, 3]);
/// ```
pub fn kick_offsets(width: usize) -> impl Iterator<Item = i32> {
    KickOffsets {
        displacement: 0,
        step: 1,
        bound: to_coord(width),
        done: false,
    }
}

#[derive(Debug, Clone)]
struct KickOffsets {
    displacement: i32,
    step: i32,
    bound: i32,
    done: bool,
}

impl Iterator for KickOffsets {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.done {
            return None;
        }
        self.displacement += self.step;
        self.step = -(self.step + self.step.signum());
        if self.step > self.bound {
            self.done = true;
            return None;
        }
        Some(self.displacement)
    }
}

fn to_coord(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(piece: &ActivePiece) -> (i32, i32) {
        (piece.position().x(), piece.position().y())
    }

    #[test]
    fn test_spawn_is_centered() {
        assert_eq!(pos(&ActivePiece::spawn(PieceKind::O, 10)), (4, 0));
        assert_eq!(pos(&ActivePiece::spawn(PieceKind::T, 10)), (4, 0));
        assert_eq!(pos(&ActivePiece::spawn(PieceKind::I, 10)), (3, 0));
        assert_eq!(pos(&ActivePiece::spawn(PieceKind::I, 7)), (1, 0));
    }

    #[test]
    fn test_occupied_positions() {
        let piece = ActivePiece::new(PieceKind::S, 2, 5);
        let cells: Vec<_> = piece.occupied_positions().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(cells, [(3, 5), (4, 5), (2, 6), (3, 6)]);
    }

    #[test]
    fn test_kick_offsets() {
        assert_eq!(kick_offsets(2).collect::<Vec<_>>(), [1]);
        assert_eq!(kick_offsets(3).collect::<Vec<_>>(), [1, -1, 2]);
        assert_eq!(kick_offsets(4).collect::<Vec<_>>(), [1, -1, 2]);
        assert_eq!(kick_offsets(5).collect::<Vec<_>>(), [1, -1, 2, -2, 3]);
        assert_eq!(kick_offsets(6).collect::<Vec<_>>(), [1, -1, 2, -2, 3]);
        assert_eq!(
            kick_offsets(7).collect::<Vec<_>>(),
            [1, -1, 2, -2, 3, -3, 4]
        );
    }

    #[test]
    fn test_rotation_without_kick_keeps_position() {
        let board = Board::new(10, 20);
        let piece = ActivePiece::new(PieceKind::J, 4, 5);
        let rotated = piece
            .rotated_with_kick(&board, RotationDirection::Clockwise)
            .unwrap();
        assert_eq!(rotated.position(), piece.position());
        assert_eq!(rotated.shape().to_string(), "J..\nJJJ\n...");
    }

    #[test]
    fn test_four_rotations_on_empty_board() {
        let board = Board::new(10, 20);
        for kind in PieceKind::ALL {
            let piece = ActivePiece::spawn(kind, 10).shifted(0, 5);
            let mut rotated = piece;
            for _ in 0..4 {
                rotated = rotated
                    .rotated_with_kick(&board, RotationDirection::Clockwise)
                    .unwrap();
            }
            assert_eq!(rotated, piece, "{kind:?}");
        }
    }

    #[test]
    fn test_kick_off_left_wall() {
        let board = Board::new(10, 20);
        let piece = ActivePiece::new(PieceKind::I, -1, 5);
        let rotated = piece
            .rotated_with_kick(&board, RotationDirection::Clockwise)
            .unwrap();
        assert_eq!(pos(&rotated), (0, 5));
        assert!(!collides(&board, &rotated));
    }

    #[test]
    fn test_kick_off_right_wall() {
        let board = Board::new(10, 20);
        let piece = ActivePiece::new(PieceKind::I, 7, 5);
        let rotated = piece
            .rotated_with_kick(&board, RotationDirection::Clockwise)
            .unwrap();
        // +1 collides; -1 is the first free displacement.
        assert_eq!(pos(&rotated), (6, 5));
    }

    #[test]
    fn test_kick_off_right_wall_needs_two_columns() {
        // Against the right wall the I-piece would need a -2 shift, which a
        // 4-wide matrix never tries.
        let board = Board::new(10, 20);
        let piece = ActivePiece::new(PieceKind::I, 8, 5);
        assert!(!collides(&board, &piece));
        assert_eq!(
            piece.rotated_with_kick(&board, RotationDirection::Clockwise),
            None
        );
    }

    #[test]
    fn test_kick_counter_clockwise() {
        let board = Board::new(10, 20);
        // L at x = -1 has its blocks in columns 0 and 1.
        let piece = ActivePiece::new(PieceKind::L, -1, 5);
        assert!(!collides(&board, &piece));
        let rotated = piece
            .rotated_with_kick(&board, RotationDirection::CounterClockwise)
            .unwrap();
        assert_eq!(rotated.shape().to_string(), "..L\nLLL\n...");
        assert_eq!(pos(&rotated), (0, 5));
    }

    #[test]
    fn test_rotation_rejected_in_narrow_well() {
        let board = Board::parse(&[
            "..........",
            ".IIIIIIIII",
            ".IIIIIIIII",
            ".IIIIIIIII",
            ".IIIIIIIII",
            ".IIIIIIIII",
        ])
        .unwrap();
        let piece = ActivePiece::new(PieceKind::I, -1, 1);
        assert!(!collides(&board, &piece));
        assert_eq!(
            piece.rotated_with_kick(&board, RotationDirection::Clockwise),
            None
        );
        assert_eq!(
            piece.rotated_with_kick(&board, RotationDirection::CounterClockwise),
            None
        );
    }

    #[test]
    fn test_kick_search_stops_at_bound() {
        // The only free spot for the rotated T is 2 columns to the left, which
        // a 3-wide matrix never tries.
        let board = Board::parse(&["II.III", "II..II", "II.III"]).unwrap();
        let piece = ActivePiece::new(PieceKind::T, 3, 0);
        let free = piece.rotated(RotationDirection::Clockwise).shifted(-2, 0);
        assert!(!collides(&board, &free));
        assert_eq!(
            piece.rotated_with_kick(&board, RotationDirection::Clockwise),
            None
        );
    }

    #[test]
    fn test_dropped() {
        let board = Board::parse(&["....", "....", "....", "..L."]).unwrap();
        let piece = ActivePiece::new(PieceKind::O, 1, 0);
        assert_eq!(pos(&piece.dropped(&board)), (1, 1));
        let piece = ActivePiece::new(PieceKind::O, 0, 0);
        assert_eq!(pos(&piece.dropped(&board)), (0, 2));
    }
}
