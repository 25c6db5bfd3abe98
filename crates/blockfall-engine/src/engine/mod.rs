//! Game rules on top of the core data structures.
//!
//! - [`GameSession`] - State machine that owns the board, the falling piece, and the next piece
//! - [`Command`] - Inputs accepted by a session, with a text form for scripts
//! - [`GameSnapshot`] - Serializable read-only view for renderers
//! - [`GameStats`] - Score and line-clear counters
//! - [`NextPieceBuffer`] - One-piece lookahead over a [`PieceGenerator`]
//! - [`DropTimer`] - Gravity clock
//! - [`SessionConfig`] - Board size and drop interval
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] and issue [`Command::Start`]
//! 2. Move, rotate, and drop the falling piece
//! 3. Feed elapsed time with [`Command::Tick`] so the piece falls on its own
//! 4. A piece that cannot fall further locks, full rows are swept, and the next piece spawns
//! 5. The game ends when a fresh piece collides at its spawn position
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Command, GameSession, PieceSeed, SessionConfig};
//!
//! let seed = PieceSeed::from_bytes([1; 16]);
//! let mut session = GameSession::with_seed(SessionConfig::default(), seed).unwrap();
//!
//! for command in [Command::Start, Command::MoveLeft, Command::RotateCw] {
//!     session.apply(command);
//! }
//! session.apply(Command::Tick(Duration::from_millis(1001)));
//! assert_eq!(session.active().unwrap().position().y(), 1);
//!
//! let events = session.apply(Command::HardDrop);
//! assert!(events.iter().any(|event| event.is_piece_locked()));
//! assert_eq!(session.stats().completed_pieces(), 1);
//! ```

pub use self::{
    command::*, config::*, drop_timer::*, game_session::*, game_stats::*, piece_buffer::*,
    snapshot::*,
};

mod command;
mod config;
mod drop_timer;
mod game_session;
mod game_stats;
mod piece_buffer;
mod snapshot;
