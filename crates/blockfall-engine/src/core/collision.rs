use super::{active_piece::ActivePiece, board::Board};

/// Returns `true` if the piece cannot be placed where it is.
///
/// A placement is illegal when any block of the piece lies outside the board
/// or overlaps an occupied cell. Every move, rotation, drop and spawn goes
/// through this check.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Board, PieceKind, collides};
///
/// let board = Board::new(10, 20);
/// assert!(!collides(&board, &ActivePiece::new(PieceKind::O, 0, 0)));
/// assert!(collides(&board, &ActivePiece::new(PieceKind::O, 9, 0)));
/// assert!(collides(&board, &ActivePiece::new(PieceKind::O, 0, 19)));
/// ```
#[must_use]
pub fn collides(board: &Board, piece: &ActivePiece) -> bool {
    piece
        .occupied_positions()
        .any(|(x, y, _)| board.cell(x, y).is_none_or(|cell| !cell.is_empty()))
}
