use blockfall_engine::{PieceKind, PieceShape};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{BlockDisplay, cells_to_u16};

/// Preview of a single piece in its spawn orientation.
///
/// Blank rows and columns of the shape matrix are trimmed so the piece sits
/// centered in the panel.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        4 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Returns the occupied column and row ranges of a shape as `(x0, x1, y0, y1)`.
fn bounding_box(shape: &PieceShape) -> Option<(usize, usize, usize, usize)> {
    shape
        .occupied_cells()
        .fold(None, |acc, (x, y, _)| match acc {
            None => Some((x, x + 1, y, y + 1)),
            Some((x0, x1, y0, y1)) => Some((x0.min(x), x1.max(x + 1), y0.min(y), y1.max(y + 1))),
        })
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let shape = piece.shape();
        let Some((x0, x1, y0, y1)) = bounding_box(&shape) else {
            return;
        };

        let piece_area = area.centered(
            Constraint::Length(cells_to_u16(x1 - x0) * BlockDisplay::width()),
            Constraint::Length(cells_to_u16(y1 - y0) * BlockDisplay::height()),
        );
        let col_constraints = (x0..x1).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (y0..y1).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (y, grid_row) in (y0..y1).zip(grid_rows) {
            for (x, grid_cell) in (x0..x1).zip(grid_row) {
                if let Some(cell) = shape.cell(x, y) {
                    BlockDisplay::from_cell(cell, false).render(grid_cell, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_trims_blank_lines() {
        assert_eq!(bounding_box(&PieceKind::I.shape()), Some((1, 2, 0, 4)));
        assert_eq!(bounding_box(&PieceKind::O.shape()), Some((0, 2, 0, 2)));
        assert_eq!(bounding_box(&PieceKind::T.shape()), Some((0, 3, 0, 2)));
    }
}
