use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use wristris_engine::{BoardSize, Sprite, SpriteKind};

use super::BlockDisplay;

/// The playing grid, drawn from the sprites of one frame.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    size: BoardSize,
    sprites: &'a [Sprite],
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(size: BoardSize, sprites: &'a [Sprite]) -> Self {
        Self {
            size,
            sprites,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        u16::from(self.size.cols) * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::from(self.size.rows) * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Row-major grid of cell contents.
    fn cells(&self) -> Vec<Option<SpriteKind>> {
        let cols = usize::from(self.size.cols);
        let mut cells = vec![None; self.size.cell_count()];
        for sprite in self.sprites {
            let index = usize::from(sprite.row) * cols + usize::from(sprite.col);
            if let Some(cell) = cells.get_mut(index) {
                *cell = Some(sprite.kind);
            }
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.size.cols).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..self.size.rows).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints).flex(Flex::Start);

        let cells = self.cells();
        let rows = cells.chunks(usize::from(self.size.cols));
        for (row_area, row) in iter::zip(vertical.split(area).iter(), rows) {
            for (cell_area, cell) in iter::zip(horizontal.split(*row_area).iter(), row) {
                BlockDisplay::from_sprite(*cell).render(*cell_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use wristris_engine::PieceKind;

    use super::{super::style, *};

    fn sprite(col: u8, row: u8, kind: SpriteKind) -> Sprite {
        Sprite {
            col,
            row,
            x: u32::from(col) * 18,
            y: u32::from(row) * 18,
            kind,
        }
    }

    #[test]
    fn test_renders_sprites_at_their_cells() {
        let sprites = [
            sprite(0, 3, SpriteKind::Locked),
            sprite(2, 0, SpriteKind::Falling(PieceKind::T)),
        ];
        let board = BoardDisplay::new(BoardSize::new(4, 4), &sprites);
        assert_eq!((board.width(), board.height()), (8, 4));

        let area = Rect::new(0, 0, board.width(), board.height());
        let mut buf = Buffer::empty(area);
        board.render(area, &mut buf);

        let bg = |x: u16, y: u16| buf[(x, y)].bg;
        assert_eq!(Some(bg(0, 3)), style::LOCKED.bg);
        assert_eq!(Some(bg(1, 3)), style::LOCKED.bg);
        assert_eq!(Some(bg(4, 0)), style::T_BLOCK.bg);
        assert_eq!(Some(bg(2, 2)), style::EMPTY_DOT.bg);
    }

    #[test]
    fn test_border_adds_margin() {
        let board = BoardDisplay::new(BoardSize::DEFAULT, &[]).block(BlockWidget::bordered());
        assert_eq!((board.width(), board.height()), (22, 14));
    }
}
