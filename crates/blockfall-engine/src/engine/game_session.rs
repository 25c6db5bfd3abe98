use std::time::Duration;

use arrayvec::ArrayVec;
use log::{debug, info, trace};
use serde::Serialize;

use crate::{ActivePiece, Board, ConfigError, PieceKind, RotationDirection, collides};

use super::{
    Command, DropTimer, GameSnapshot, GameStats, NextPieceBuffer, PieceGenerator, PieceSeed,
    SessionConfig, UniformPieces,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    /// Created but never started.
    Initial,
    Playing,
    /// A fresh piece collided at its spawn position. Only `start` leaves this state.
    GameOver,
}

/// Observable outcome of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionEvent {
    Started,
    PieceMoved,
    PieceRotated,
    /// The active piece was merged into the board.
    ///
    /// A non-zero `cleared_rows` is the cue for line-clear effects.
    PieceLocked { cleared_rows: usize, points: usize },
    GameOver,
}

/// Events caused by a single command, in order. Empty when the command was rejected.
pub type SessionEvents = ArrayVec<SessionEvent, 3>;

/// A single game from start to game over, and any number of restarts.
///
/// The session owns the board, the falling piece, and the next-piece buffer.
/// Gameplay commands never fail: illegal moves are dropped and reported as an
/// empty event list, and every command other than `start` is ignored unless
/// the session is [`Playing`](SessionState::Playing).
///
/// # Example
///
/// ```
/// use blockfall_engine::{
///     GameSession, PieceKind, ScriptedPieces, SessionConfig, SessionEvent,
/// };
///
/// let pieces = ScriptedPieces::new([PieceKind::O, PieceKind::O, PieceKind::T]);
/// let mut session = GameSession::with_generator(SessionConfig::default(), pieces).unwrap();
///
/// session.start();
/// assert_eq!(session.active().unwrap().kind(), PieceKind::O);
/// assert_eq!(session.next_piece(), PieceKind::T);
///
/// let events = session.hard_drop();
/// assert!(events.contains(&SessionEvent::PieceLocked { cleared_rows: 0, points: 0 }));
/// assert_eq!(session.active().unwrap().kind(), PieceKind::T);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession<G = UniformPieces> {
    config: SessionConfig,
    board: Board,
    active: Option<ActivePiece>,
    next: NextPieceBuffer<G>,
    stats: GameStats,
    state: SessionState,
    drop_timer: DropTimer,
}

impl GameSession {
    /// Creates a session with randomly seeded piece generation.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_generator(config, UniformPieces::new())
    }

    /// Creates a session whose piece sequence is fixed by `seed`.
    pub fn with_seed(config: SessionConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Self::with_generator(config, UniformPieces::with_seed(seed))
    }
}

impl<G> GameSession<G>
where
    G: PieceGenerator,
{
    /// Creates a session in the [`Initial`](SessionState::Initial) state.
    pub fn with_generator(config: SessionConfig, generator: G) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            board: Board::new(config.cols, config.rows),
            active: None,
            next: NextPieceBuffer::new(generator),
            stats: GameStats::new(),
            state: SessionState::Initial,
            drop_timer: DropTimer::new(config.drop_interval()),
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.next.peek()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn drop_timer(&self) -> &DropTimer {
        &self.drop_timer
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let next = self.next.peek();
        GameSnapshot {
            state: self.state,
            score: self.stats.score(),
            board: self.board.clone(),
            active: self.active,
            next,
            next_shape: next.shape(),
            stats: self.stats.clone(),
        }
    }

    pub fn apply(&mut self, command: Command) -> SessionEvents {
        match command {
            Command::Start => self.start(),
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::RotateCw => self.rotate_cw(),
            Command::RotateCcw => self.rotate_ccw(),
            Command::Tick(delta) => self.tick(delta),
        }
    }

    /// Begins a new game from any state.
    ///
    /// The board, score, and drop timer are cleared and the pending next piece
    /// is replaced before the first spawn.
    pub fn start(&mut self) -> SessionEvents {
        self.board = Board::new(self.config.cols, self.config.rows);
        self.stats = GameStats::new();
        self.drop_timer.reset();
        self.next.redraw();
        self.state = SessionState::Playing;
        info!(
            "game started on a {}x{} board",
            self.config.cols, self.config.rows
        );

        let mut events = SessionEvents::new();
        events.push(SessionEvent::Started);
        self.spawn(&mut events);
        events
    }

    pub fn move_left(&mut self) -> SessionEvents {
        self.shift(ActivePiece::left)
    }

    pub fn move_right(&mut self) -> SessionEvents {
        self.shift(ActivePiece::right)
    }

    /// Moves the piece down one row, locking it if it cannot move.
    pub fn soft_drop(&mut self) -> SessionEvents {
        let mut events = SessionEvents::new();
        let Some(piece) = self.playing_piece() else {
            return events;
        };
        self.drop_timer.reset();
        self.step_down(piece, &mut events);
        events
    }

    /// Drops the piece as far as it goes and locks it.
    pub fn hard_drop(&mut self) -> SessionEvents {
        let mut events = SessionEvents::new();
        let Some(piece) = self.playing_piece() else {
            return events;
        };
        self.drop_timer.reset();
        let dropped = piece.dropped(&self.board);
        if dropped != piece {
            events.push(SessionEvent::PieceMoved);
        }
        self.lock(dropped, &mut events);
        events
    }

    pub fn rotate(&mut self, direction: RotationDirection) -> SessionEvents {
        let mut events = SessionEvents::new();
        let Some(piece) = self.playing_piece() else {
            return events;
        };
        match piece.rotated_with_kick(&self.board, direction) {
            Some(rotated) => {
                self.active = Some(rotated);
                events.push(SessionEvent::PieceRotated);
            }
            None => trace!("rotation {direction:?} rejected at {:?}", piece.position()),
        }
        events
    }

    pub fn rotate_cw(&mut self) -> SessionEvents {
        self.rotate(RotationDirection::Clockwise)
    }

    pub fn rotate_ccw(&mut self) -> SessionEvents {
        self.rotate(RotationDirection::CounterClockwise)
    }

    /// Advances gravity by `delta`.
    ///
    /// At most one row is dropped per call.
    pub fn tick(&mut self, delta: Duration) -> SessionEvents {
        let mut events = SessionEvents::new();
        let Some(piece) = self.playing_piece() else {
            return events;
        };
        if self.drop_timer.advance(delta) {
            self.step_down(piece, &mut events);
        }
        events
    }

    fn playing_piece(&self) -> Option<ActivePiece> {
        if self.state.is_playing() {
            self.active
        } else {
            None
        }
    }

    fn shift(&mut self, f: fn(&ActivePiece) -> ActivePiece) -> SessionEvents {
        let mut events = SessionEvents::new();
        let Some(piece) = self.playing_piece() else {
            return events;
        };
        let moved = f(&piece);
        if collides(&self.board, &moved) {
            trace!("move rejected at {:?}", piece.position());
            return events;
        }
        self.active = Some(moved);
        events.push(SessionEvent::PieceMoved);
        events
    }

    fn step_down(&mut self, piece: ActivePiece, events: &mut SessionEvents) {
        let moved = piece.down();
        if collides(&self.board, &moved) {
            self.lock(piece, events);
        } else {
            self.active = Some(moved);
            events.push(SessionEvent::PieceMoved);
        }
    }

    fn lock(&mut self, piece: ActivePiece, events: &mut SessionEvents) {
        self.board.merge(&piece);
        let report = self.board.sweep();
        self.stats.complete_piece_drop(&report);
        debug!(
            "locked {:?} at {:?}, cleared {} rows for {} points",
            piece.kind(),
            piece.position(),
            report.cleared_rows,
            report.points
        );
        events.push(SessionEvent::PieceLocked {
            cleared_rows: report.cleared_rows,
            points: report.points,
        });
        self.spawn(events);
    }

    fn spawn(&mut self, events: &mut SessionEvents) {
        let piece = ActivePiece::spawn(self.next.pop(), self.config.cols);
        if collides(&self.board, &piece) {
            self.active = None;
            self.state = SessionState::GameOver;
            info!(
                "game over: {:?} blocked at spawn, final score {}",
                piece.kind(),
                self.stats.score()
            );
            events.push(SessionEvent::GameOver);
            return;
        }
        self.active = Some(piece);
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{Cell, PiecePosition, ScriptedPieces};

    /// Returns a started session whose first active piece is `pieces[0]`.
    fn started(pieces: &[PieceKind]) -> GameSession<ScriptedPieces> {
        // `new` draws one piece and `start` redraws it, so the first kind is doubled.
        let script = std::iter::once(pieces[0]).chain(pieces.iter().copied());
        let mut session =
            GameSession::with_generator(SessionConfig::default(), ScriptedPieces::new(script))
                .unwrap();
        session.start();
        session
    }

    fn position(session: &GameSession<ScriptedPieces>) -> PiecePosition {
        session.active().unwrap().position()
    }

    fn board_with_rows(rows: &[(usize, &str)]) -> Board {
        let mut lines = vec![".........."; Board::DEFAULT_ROWS];
        for &(y, row) in rows {
            lines[y] = row;
        }
        Board::parse(&lines).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SessionConfig {
            cols: 2,
            ..SessionConfig::default()
        };
        assert!(matches!(
            GameSession::new(config),
            Err(ConfigError::ColsOutOfRange { cols: 2 })
        ));
    }

    #[test]
    fn test_commands_ignored_before_start() {
        let mut session = GameSession::with_generator(
            SessionConfig::default(),
            ScriptedPieces::new([PieceKind::T]),
        )
        .unwrap();
        assert!(session.state().is_initial());
        for command in [
            Command::MoveLeft,
            Command::SoftDrop,
            Command::HardDrop,
            Command::RotateCw,
            Command::Tick(Duration::from_secs(5)),
        ] {
            assert!(session.apply(command).is_empty());
        }
        assert!(session.active().is_none());
        assert!(session.board().is_empty());
    }

    #[test]
    fn test_start_spawns_centered() {
        let mut session = started(&[PieceKind::O, PieceKind::T]);
        assert!(session.state().is_playing());
        assert_eq!(position(&session), PiecePosition::new(4, 0));
        assert_eq!(session.next_piece(), PieceKind::T);

        let events = session.start();
        assert_eq!(events.as_slice(), &[SessionEvent::Started]);
    }

    #[test]
    fn test_move_against_wall_keeps_position() {
        let mut session = started(&[PieceKind::O]);
        for _ in 0..4 {
            assert_eq!(session.move_left().as_slice(), &[SessionEvent::PieceMoved]);
        }
        assert_eq!(position(&session), PiecePosition::new(0, 0));
        assert!(session.move_left().is_empty());
        assert_eq!(position(&session), PiecePosition::new(0, 0));

        for _ in 0..8 {
            session.move_right();
        }
        assert_eq!(position(&session), PiecePosition::new(8, 0));
        assert!(session.move_right().is_empty());
    }

    #[test]
    fn test_hard_drop_locks_and_spawns_next() {
        let mut session = started(&[PieceKind::O, PieceKind::T]);
        let events = session.hard_drop();
        assert_eq!(
            events.as_slice(),
            &[
                SessionEvent::PieceMoved,
                SessionEvent::PieceLocked {
                    cleared_rows: 0,
                    points: 0
                },
            ]
        );

        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(session.board().cell(x, y), Some(Cell::Piece(PieceKind::O)));
        }
        assert_eq!(session.board().cell(3, 19), Some(Cell::Empty));
        assert_eq!(session.active().unwrap().kind(), PieceKind::T);
        assert_eq!(position(&session), PiecePosition::new(4, 0));
        assert_eq!(session.next_piece(), PieceKind::O);
        assert_eq!(session.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_soft_drop_locks_on_floor() {
        let mut session = started(&[PieceKind::O, PieceKind::T]);
        for _ in 0..18 {
            assert_eq!(session.soft_drop().as_slice(), &[SessionEvent::PieceMoved]);
        }
        assert_eq!(position(&session), PiecePosition::new(4, 18));
        let events = session.soft_drop();
        assert!(events[0].is_piece_locked());
        assert_eq!(session.active().unwrap().kind(), PieceKind::T);
    }

    #[test]
    fn test_triple_clear_scores_seventy() {
        let mut session = started(&[PieceKind::I, PieceKind::O]);
        session.board = board_with_rows(&[
            (17, ".OOOOOOOOO"),
            (18, ".TTTTTTTTT"),
            (19, ".LLLLLLLLL"),
        ]);

        for _ in 0..4 {
            session.move_left();
        }
        assert_eq!(position(&session), PiecePosition::new(-1, 0));

        let events = session.hard_drop();
        assert!(events.contains(&SessionEvent::PieceLocked {
            cleared_rows: 3,
            points: 70
        }));
        assert_eq!(session.score(), 70);
        assert_eq!(session.snapshot().score, 70);
        assert_eq!(session.board().cell(0, 19), Some(Cell::Piece(PieceKind::I)));
        assert_eq!(session.board().cell(1, 19), Some(Cell::Empty));
        assert_eq!(session.board().cell(0, 18), Some(Cell::Empty));
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let mut session = started(&[PieceKind::O, PieceKind::T]);
        let filled: Vec<_> = (2..Board::DEFAULT_ROWS).map(|y| (y, ".ZZZZZZZZZ")).collect();
        session.board = board_with_rows(&filled);

        let events = session.hard_drop();
        assert_eq!(
            events.as_slice(),
            &[
                SessionEvent::PieceLocked {
                    cleared_rows: 0,
                    points: 0
                },
                SessionEvent::GameOver,
            ]
        );
        assert!(session.state().is_game_over());
        assert!(session.active().is_none());

        // Only the locked O is on the top rows; the blocked T left no cells.
        let top: Vec<String> = session
            .board()
            .iter_rows()
            .take(2)
            .map(|row| row.iter().map(|cell| cell.as_char()).collect())
            .collect();
        assert_eq!(top, ["....OO....", "....OO...."]);

        for command in [Command::MoveLeft, Command::HardDrop, Command::RotateCw] {
            assert!(session.apply(command).is_empty());
        }

        let events = session.start();
        assert_eq!(events.as_slice(), &[SessionEvent::Started]);
        assert!(session.state().is_playing());
        assert!(session.board().is_empty());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_rotation_kicks_off_wall() {
        let mut session = started(&[PieceKind::I]);
        for _ in 0..4 {
            session.move_right();
        }
        assert_eq!(position(&session), PiecePosition::new(7, 0));
        assert_eq!(session.rotate_cw().as_slice(), &[SessionEvent::PieceRotated]);
        assert_eq!(position(&session), PiecePosition::new(6, 0));
        assert_eq!(
            session.active().unwrap().shape().to_string(),
            "....\nIIII\n....\n...."
        );
    }

    #[test]
    fn test_tick_drops_once_past_interval() {
        let mut session = started(&[PieceKind::T]);
        assert!(session.tick(Duration::from_millis(999)).is_empty());
        assert!(session.tick(Duration::from_millis(1)).is_empty());
        assert_eq!(
            session.tick(Duration::from_millis(1)).as_slice(),
            &[SessionEvent::PieceMoved]
        );
        assert_eq!(position(&session), PiecePosition::new(4, 1));

        session.tick(Duration::from_secs(5));
        assert_eq!(position(&session), PiecePosition::new(4, 2));
    }

    #[test]
    fn test_soft_drop_resets_timer() {
        let mut session = started(&[PieceKind::T]);
        session.tick(Duration::from_millis(900));
        session.soft_drop();
        assert_eq!(session.drop_timer().elapsed(), Duration::ZERO);
        assert!(session.tick(Duration::from_millis(900)).is_empty());
        assert!(!session.tick(Duration::from_millis(101)).is_empty());
        assert_eq!(position(&session), PiecePosition::new(4, 2));
    }

    #[test]
    fn test_active_piece_never_collides() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut session =
            GameSession::with_seed(SessionConfig::default(), PieceSeed::from_bytes([7; 16]))
                .unwrap();
        session.start();

        let mut game_overs = 0;
        for _ in 0..5000 {
            let command = match rng.random_range(0..8) {
                0 => Command::MoveLeft,
                1 => Command::MoveRight,
                2 => Command::SoftDrop,
                3 => Command::HardDrop,
                4 => Command::RotateCw,
                5 => Command::RotateCcw,
                6 => Command::Tick(Duration::from_millis(rng.random_range(0..1500))),
                _ => Command::Tick(Duration::from_millis(16)),
            };
            let events = session.apply(command);
            if events.contains(&SessionEvent::GameOver) {
                game_overs += 1;
                assert!(session.active().is_none());
                session.start();
            }
            assert!(session.state().is_playing());
            let active = session.active().unwrap();
            assert!(!collides(session.board(), active), "{command}\n{}", session.board());
        }
        assert!(game_overs > 0);
    }
}
