use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use wristris_engine::SessionState;

use super::{BoardDisplay, ScoreboardDisplay, color, style};
use crate::view::SessionView;

/// Board and scoreboard side by side, with a banner over the board when the
/// game is not running.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    view: &'a SessionView,
    clock: &'a str,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(view: &'a SessionView, clock: &'a str) -> Self {
        Self { view, clock }
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.view.scoreboard().state {
            SessionState::Idle | SessionState::Running => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        }
    }

    fn board(&self) -> BoardDisplay<'a> {
        BoardDisplay::new(self.view.size(), self.view.sprites()).block(
            Block::bordered()
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    fn scoreboard(&self) -> ScoreboardDisplay<'a> {
        ScoreboardDisplay::new(self.view.scoreboard(), self.clock).block(
            Block::bordered()
                .padding(Padding::horizontal(1))
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    pub fn height(&self) -> u16 {
        u16::max(self.board().height(), self.scoreboard().height())
    }

    fn banner(&self) -> Option<(&'static str, Style)> {
        let scoreboard = self.view.scoreboard();
        match scoreboard.state {
            SessionState::Running => None,
            SessionState::Idle => Some(("PRESS ENTER", Style::new().fg(color::BLACK).bg(color::WHITE))),
            SessionState::Paused => Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW))),
            SessionState::GameOver if scoreboard.is_new_high_score => {
                Some(("NEW BEST!", Style::new().fg(color::BLACK).bg(color::GREEN)))
            }
            SessionState::GameOver => {
                Some(("GAME OVER", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let board = self.board();
        let scoreboard = self.scoreboard();

        let [board_column, score_column] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(scoreboard.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);
        let [board_area] = Layout::vertical([Constraint::Length(board.height())]).areas(board_column);
        let [score_area] =
            Layout::vertical([Constraint::Length(scoreboard.height())]).areas(score_column);

        let board_width = board.width();
        board.render(board_area, buf);
        scoreboard.render(score_area, buf);

        if let Some((text, style)) = self.banner() {
            let block = Block::new().style(style);
            let text = Text::from(Line::styled(text, style)).centered();
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
