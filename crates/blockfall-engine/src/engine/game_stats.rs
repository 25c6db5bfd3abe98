use serde::Serialize;

use crate::SweepReport;

/// Game statistics tracking score, lines cleared, and piece count.
///
/// Tracks various metrics during a game session:
///
/// - **Score**: Points earned from line clears
/// - **Completed pieces**: Total number of pieces locked
/// - **Line clear distribution**: Count of single, double, triple, quad line clears
///
/// # Scoring
///
/// Points come straight from [`Board::sweep`](crate::Board::sweep): 10 for
/// the first row of a clear, doubling for each further row. There are no
/// levels, combos, or drop bonuses.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameStats, SweepReport};
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(&SweepReport { cleared_rows: 3, points: 70 });
///
/// assert_eq!(stats.score(), 70);
/// assert_eq!(stats.total_cleared_lines(), 3);
/// assert_eq!(stats.line_cleared_counter()[3], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of line clears by count.
    ///
    /// Array indices represent:
    /// - `[0]`: Number of drops with 0 lines cleared
    /// - `[1]`: Number of singles (1 line)
    /// - `[2]`: Number of doubles (2 lines)
    /// - `[3]`: Number of triples (3 lines)
    /// - `[4]`: Number of quads (4 lines)
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece lock.
    pub fn complete_piece_drop(&mut self, report: &SweepReport) {
        self.completed_pieces += 1;
        self.total_cleared_lines += report.cleared_rows;
        if let Some(count) = self.line_cleared_counter.get_mut(report.cleared_rows) {
            *count += 1;
        }
        self.score = self.score.saturating_add(report.points);
    }
}
