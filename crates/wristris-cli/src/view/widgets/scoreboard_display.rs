use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use wristris_engine::Scoreboard;

use super::style;

/// Score, best score and the wall clock.
pub struct ScoreboardDisplay<'a> {
    scoreboard: &'a Scoreboard,
    clock: &'a str,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ScoreboardDisplay<'a> {
    pub fn new(scoreboard: &'a Scoreboard, clock: &'a str) -> Self {
        Self {
            scoreboard,
            clock,
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
        14 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        ROW_COUNT + super::block_vertical_margin(self.block.as_ref())
    }

    fn rows(&self) -> [Row<'_>; ROW_COUNT as usize] {
        let scoreboard = self.scoreboard;
        let best = scoreboard
            .high_score
            .as_ref()
            .map_or_else(|| "-".to_owned(), |record| record.score.to_string());
        let best_date = scoreboard
            .high_score
            .as_ref()
            .map_or_else(String::new, |record| record.date.clone());
        [
            Row::LabelValue("TIME:", self.clock.to_owned()),
            Row::Empty,
            Row::FullLabel("SCORE:"),
            Row::FullValue(scoreboard.score.to_string()),
            Row::LabelValue("LINES:", scoreboard.cleared_lines.to_string()),
            Row::Empty,
            Row::FullLabel(if scoreboard.is_new_high_score {
                "BEST: NEW!"
            } else {
                "BEST:"
            }),
            Row::FullValue(best),
            Row::FullValue(best_date),
        ]
    }
}

const ROW_COUNT: u16 = 9;

enum Row<'a> {
    Empty,
    FullLabel(&'a str),
    FullValue(String),
    LabelValue(&'a str, String),
}

impl Widget for ScoreboardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let rows_areas =
            Layout::vertical((0..ROW_COUNT).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(self.rows(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value, style).right_aligned().render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value, style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
