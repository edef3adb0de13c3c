use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use wristris_engine::{Command, GameSession, SessionState};
use wristris_runtime::{App, RenderMode, Runtime};

use crate::{
    clock,
    view::{SessionView, widgets::SessionDisplay},
};

pub(crate) const FPS: u32 = 60;
const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Game(Command),
    TogglePause,
    Restart,
    Quit,
}

impl Action {
    fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Left | KeyCode::Char('h') => Self::Game(Command::MoveLeft),
            KeyCode::Right | KeyCode::Char('l') => Self::Game(Command::MoveRight),
            KeyCode::Up | KeyCode::Char('k' | 'x') => Self::Game(Command::Rotate),
            KeyCode::Down | KeyCode::Char('j') => Self::Game(Command::SoftDrop),
            KeyCode::Char('p') => Self::TogglePause,
            KeyCode::Enter | KeyCode::Char('r') => Self::Restart,
            KeyCode::Esc | KeyCode::Char('q') => Self::Quit,
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Debug)]
pub(crate) struct PlayApp {
    session: GameSession,
    clock: String,
    is_exiting: bool,
}

impl PlayApp {
    pub(crate) fn new(session: GameSession) -> Self {
        Self {
            session,
            clock: clock::now(),
            is_exiting: false,
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Game(command) => _ = self.session.handle_command(command),
            Action::TogglePause => self.session.toggle_pause(),
            Action::Restart => _ = self.session.restart(),
            Action::Quit => self.is_exiting = true,
        }
    }

    fn help_text(&self) -> &'static str {
        match self.session.state() {
            SessionState::Running => {
                "← → (Move) | ↑ X (Rotate) | ↓ (Drop) | P (Pause) | Q (Quit)"
            }
            SessionState::Paused => "P (Resume) | Q (Quit)",
            SessionState::Idle | SessionState::GameOver => "Enter (New Game) | Q (Quit)",
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(f64::from(FPS)));
        runtime.set_clock_interval(Some(CLOCK_INTERVAL));
        runtime.set_render_mode(RenderMode::throttled_from_rate(f64::from(FPS)));
        self.session.start();
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        if let Some(key) = event.as_key_event()
            && key.kind == KeyEventKind::Press
            && let Some(action) = Action::from_key(key.code)
        {
            self.apply(action);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let mut view = SessionView::new(self.session.config().size);
        self.session.present(&mut view);
        let display = SessionDisplay::new(&view, &self.clock);

        let help_text = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(display.height()), Constraint::Length(1)])
                .areas(frame.area());
        frame.render_widget(&display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        self.session.increment_frame();
    }

    fn clock_tick(&mut self, _runtime: &mut Runtime) {
        self.clock = clock::now();
    }
}
