use serde::Serialize;

use crate::{ActivePiece, Board, PieceKind, PieceShape};

use super::{GameStats, SessionState};

/// Read-only view of a [`GameSession`](super::GameSession).
///
/// Presentation layers render from snapshots and never touch the session's
/// board directly. The JSON form lists board rows as strings of piece letters
/// with `.` for empty cells.
///
/// ```
/// use blockfall_engine::{GameSession, SessionConfig, SessionState};
///
/// let mut session = GameSession::new(SessionConfig::default()).unwrap();
/// assert_eq!(session.snapshot().state, SessionState::Initial);
/// assert!(session.snapshot().active.is_none());
///
/// session.start();
/// let snapshot = session.snapshot();
/// assert_eq!(snapshot.state, SessionState::Playing);
/// assert!(snapshot.active.is_some());
/// assert_eq!(snapshot.score, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub state: SessionState,
    pub score: usize,
    pub board: Board,
    /// The falling piece, or `None` before the first start and after game over.
    pub active: Option<ActivePiece>,
    pub next: PieceKind,
    /// Spawn orientation of `next`, for preview panels.
    pub next_shape: PieceShape,
    pub stats: GameStats,
}
