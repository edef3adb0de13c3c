use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Terminal application driven by [`Runtime::run`].
pub trait App {
    /// Called once before the loop starts. Configure the tick rate, clock
    /// interval and render mode here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles key presses, resizes and other terminal events.
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the game by one frame.
    fn update(&mut self, runtime: &mut Runtime);

    /// Refreshes wall-clock state. The default does nothing.
    fn clock_tick(&mut self, _runtime: &mut Runtime) {}
}
