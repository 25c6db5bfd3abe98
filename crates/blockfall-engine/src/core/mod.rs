pub use self::{active_piece::*, board::*, collision::*, palette::*, piece::*};

pub(crate) mod active_piece;
pub(crate) mod board;
pub(crate) mod collision;
pub(crate) mod palette;
pub(crate) mod piece;
