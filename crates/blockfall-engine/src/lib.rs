//! Falling-block puzzle engine.
//!
//! The crate is split into two layers:
//!
//! - [`core`] - Board, piece catalog, collision test, and rotation with wall kicks
//! - [`engine`] - Game session state machine, commands, timing, and statistics
//!
//! Everything is re-exported at the crate root.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display(
        "board width {cols} is out of range ({}..={})",
        SessionConfig::MIN_SIZE,
        SessionConfig::MAX_SIZE
    )]
    ColsOutOfRange { cols: usize },
    #[display(
        "board height {rows} is out of range ({}..={})",
        SessionConfig::MIN_SIZE,
        SessionConfig::MAX_SIZE
    )]
    RowsOutOfRange { rows: usize },
    #[display("drop interval must be greater than zero")]
    ZeroDropInterval,
}
