use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize, ser::SerializeSeq as _};

/// Enum representing the type of piece.
///
/// The discriminant is the piece's color identifier. Renderers index
/// [`PALETTE`](super::palette::PALETTE) with it, so the numbering is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 1,
    /// O-piece.
    O = 2,
    /// T-piece.
    T = 3,
    /// S-piece.
    S = 4,
    /// Z-piece.
    Z = 5,
    /// J-piece.
    J = 6,
    /// L-piece.
    L = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in color-id order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the color identifier (1-7) of this piece kind.
    #[must_use]
    pub const fn color_id(self) -> u8 {
        self as u8
    }

    /// Looks up a piece kind by its color identifier.
    ///
    /// Returns `None` for `0` (empty) and anything above `7`.
    #[must_use]
    pub const fn from_color_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Returns the canonical spawn-orientation shape of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// let shape = PieceKind::T.shape();
    /// assert_eq!(shape.size(), 3);
    /// assert_eq!(shape.to_string(), ".T.\nTTT\n...");
    /// ```
    #[must_use]
    pub const fn shape(self) -> PieceShape {
        PIECE_SHAPES[self as usize - 1]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// A single cell of a board or piece shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Block of a specific piece type.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Returns the color identifier, `0` for an empty cell.
    #[must_use]
    pub fn color_id(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(kind) => kind.color_id(),
        }
    }

    /// Returns `'.'` for an empty cell and the piece letter otherwise.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Piece(kind) => kind.as_char(),
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Cell::Empty);
        }
        PieceKind::from_char(c).map(Cell::Piece)
    }
}

/// Direction of a 90° rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
        }
    }
}

/// Maximum side length of any piece shape.
pub const MAX_SHAPE_SIZE: usize = 4;

/// Square matrix of cells describing a piece in one orientation.
///
/// Only the top-left `size × size` region is meaningful; the rest of the 4×4
/// storage is always empty. Shapes are plain values, so every active piece
/// rotates its own copy and the catalog stays untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    size: usize,
    cells: [[Cell; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl PieceShape {
    /// Side length of the shape matrix (2, 3, or 4).
    ///
    /// This is also the shape's column count used by spawn centering and the
    /// kick search bound.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns the cell at shape-local `(x, y)`, or `None` outside the matrix.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(self.cells[y][x])
    }

    /// Iterates over the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells[..self.size].iter().map(|row| &row[..self.size])
    }

    /// Returns shape-local coordinates of all non-empty cells.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_empty())
                .map(move |(x, &cell)| (x, y, cell))
        })
    }

    /// Returns this shape rotated by 90° in the given direction.
    ///
    /// The matrix is transposed, then each row is reversed (clockwise) or the
    /// row order is reversed (counter-clockwise).
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let n = self.size;
        let mut cells = [[Cell::Empty; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in cells[..n].iter_mut().enumerate() {
            for (x, cell) in row[..n].iter_mut().enumerate() {
                *cell = match direction {
                    RotationDirection::Clockwise => self.cells[n - 1 - x][y],
                    RotationDirection::CounterClockwise => self.cells[x][n - 1 - y],
                };
            }
        }
        Self { size: n, cells }
    }
}

impl fmt::Display for PieceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
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

impl Serialize for PieceShape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: one string per row (e.g. [".T.", "TTT", "..."])
        let mut seq = serializer.serialize_seq(Some(self.size))?;
        for row in self.rows() {
            let row: String = row.iter().map(|cell| cell.as_char()).collect();
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

const PIECE_SHAPES: [PieceShape; PieceKind::LEN] = {
    use Cell::Empty as E;
    const I: Cell = Cell::Piece(PieceKind::I);
    const O: Cell = Cell::Piece(PieceKind::O);
    const T: Cell = Cell::Piece(PieceKind::T);
    const S: Cell = Cell::Piece(PieceKind::S);
    const Z: Cell = Cell::Piece(PieceKind::Z);
    const J: Cell = Cell::Piece(PieceKind::J);
    const L: Cell = Cell::Piece(PieceKind::L);
    const EEEE: [Cell; 4] = [E; 4];

    const fn shape(size: usize, cells: [[Cell; 4]; 4]) -> PieceShape {
        PieceShape { size, cells }
    }

    [
        // I-piece
        shape(4, [[E, I, E, E], [E, I, E, E], [E, I, E, E], [E, I, E, E]]),
        // O-piece
        shape(2, [[O, O, E, E], [O, O, E, E], EEEE, EEEE]),
        // T-piece
        shape(3, [[E, T, E, E], [T, T, T, E], EEEE, EEEE]),
        // S-piece
        shape(3, [[E, S, S, E], [S, S, E, E], EEEE, EEEE]),
        // Z-piece
        shape(3, [[Z, Z, E, E], [E, Z, Z, E], EEEE, EEEE]),
        // J-piece
        shape(3, [[E, J, E, E], [E, J, E, E], [J, J, E, E], EEEE]),
        // L-piece
        shape(3, [[E, L, E, E], [E, L, E, E], [E, L, L, E], EEEE]),
    ]
};
