use super::piece::{Cell, PieceKind};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color table indexed by color identifier.
///
/// Index 0 is the empty cell and has no color. Indices 1-7 follow
/// [`PieceKind::color_id`]; renderers rely on this numbering.
pub const PALETTE: [Option<Rgb>; PieceKind::LEN + 1] = [
    None,
    Some(Rgb::new(0xFF, 0x0D, 0x72)), // I
    Some(Rgb::new(0x0D, 0xC2, 0xFF)), // O
    Some(Rgb::new(0x0D, 0xFF, 0x72)), // T
    Some(Rgb::new(0xF5, 0x38, 0xFF)), // S
    Some(Rgb::new(0xFF, 0x8E, 0x0D)), // Z
    Some(Rgb::new(0xFF, 0xE1, 0x38)), // J
    Some(Rgb::new(0x38, 0x77, 0xFF)), // L
];

impl PieceKind {
    #[must_use]
    pub const fn color(self) -> Rgb {
        match PALETTE[self as usize] {
            Some(rgb) => rgb,
            None => unreachable!(),
        }
    }
}

impl Cell {
    #[must_use]
    pub fn color(self) -> Option<Rgb> {
        PALETTE[usize::from(self.color_id())]
    }
}
