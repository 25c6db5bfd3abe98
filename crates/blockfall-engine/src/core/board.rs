use std::fmt;

use serde::{Deserialize, Serialize, ser::SerializeSeq as _};

use super::{active_piece::ActivePiece, piece::Cell};

/// Points for the first row cleared in a sweep pass.
///
/// Every further row in the same pass is worth twice the previous one.
pub const LINE_CLEAR_BASE_POINTS: usize = 10;

/// Result of a single [`Board::sweep`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Number of full rows removed.
    pub cleared_rows: usize,
    /// Points earned by this pass.
    pub points: usize,
}

impl SweepReport {
    /// Returns `true` if at least one row was cleared.
    #[must_use]
    pub fn any_cleared(&self) -> bool {
        self.cleared_rows > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardParseError {
    #[display("board must have at least one row")]
    Empty,
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("invalid cell {found:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, found: char },
}

/// Grid of locked cells.
///
/// The board is `cols` cells wide and `rows` cells tall, with `(0, 0)` at the
/// top-left. Dimensions are fixed at creation.
///
/// # Example
///
/// ```
/// use blockfall_engine::Board;
///
/// let mut board = Board::parse(&[
///     "....",
///     "IIII",
///     "OO..",
/// ])
/// .unwrap();
///
/// let report = board.sweep();
/// assert_eq!(report.cleared_rows, 1);
/// assert_eq!(report.points, 10);
/// assert_eq!(board.to_string(), "....\n....\nOO..");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub const DEFAULT_COLS: usize = 10;
    pub const DEFAULT_ROWS: usize = 20;

    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        assert!(cols > 0 && rows > 0, "board dimensions must be non-zero");
        Self {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
        }
    }

    /// Parses a board from rows of characters.
    ///
    /// `.` is an empty cell and a piece letter (`I`, `O`, `T`, `S`, `Z`, `J`,
    /// `L`) is a block of that piece.
    pub fn parse<S>(rows: &[S]) -> Result<Self, BoardParseError>
    where
        S: AsRef<str>,
    {
        let first = rows.first().ok_or(BoardParseError::Empty)?;
        let cols = first.as_ref().chars().count();
        if cols == 0 {
            return Err(BoardParseError::Empty);
        }
        let mut board = Self::new(cols, rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != cols {
                return Err(BoardParseError::RaggedRow {
                    row: y,
                    expected: cols,
                    found,
                });
            }
            for (x, c) in row.chars().enumerate() {
                let cell = Cell::from_char(c).ok_or(BoardParseError::InvalidCell {
                    row: y,
                    col: x,
                    found: c,
                })?;
                board.cells[y * cols + x] = cell;
            }
        }
        Ok(board)
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the cell at `(x, y)`, or `None` when outside the board.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let (x, y) = self.index(x, y)?;
        Some(self.cells[y * self.cols + x])
    }

    /// Iterates over the rows from top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.cols)
    }

    /// Returns `true` if no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    /// Writes the piece's blocks into the board.
    ///
    /// Cells that fall outside the board are skipped. Callers are expected to
    /// have checked the placement with [`collides`](super::collision::collides).
    pub fn merge(&mut self, piece: &ActivePiece) {
        for (x, y, cell) in piece.occupied_positions() {
            if let Some((x, y)) = self.index(x, y) {
                self.cells[y * self.cols + x] = cell;
            }
        }
    }

    /// Removes full rows and shifts the rows above them down.
    ///
    /// Rows are scanned from bottom to top in a single pass. The first row
    /// cleared is worth [`LINE_CLEAR_BASE_POINTS`], and the value doubles for
    /// each further row in the same pass (10, 20, 40, ...).
    pub fn sweep(&mut self) -> SweepReport {
        let cols = self.cols;
        let mut report = SweepReport::default();
        let mut multiplier: usize = 1;
        for y in (0..self.rows).rev() {
            let row = y * cols..(y + 1) * cols;
            if self.cells[row.clone()].iter().all(|cell| !cell.is_empty()) {
                report.cleared_rows += 1;
                report.points = report
                    .points
                    .saturating_add(LINE_CLEAR_BASE_POINTS.saturating_mul(multiplier));
                multiplier = multiplier.saturating_mul(2);
                continue;
            }
            if report.cleared_rows > 0 {
                self.cells
                    .copy_within(row, (y + report.cleared_rows) * cols);
            }
        }
        self.cells[..report.cleared_rows * cols].fill(Cell::Empty);
        report
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.cols)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.rows)?;
        Some((x, y))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COLS, Self::DEFAULT_ROWS)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.iter_rows().enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: one string per row, top to bottom (e.g. ["..........", "....OO....", ...])
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for row in self.iter_rows() {
            let row: String = row.iter().map(|cell| cell.as_char()).collect();
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Board::parse(&rows).map_err(serde::de::Error::custom)
    }
}
