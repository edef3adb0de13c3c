use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// A frame of game logic is due.
    Tick,
    /// The wall clock display is due for a refresh.
    ClockTick,
    Render,
    Crossterm(CrosstermEvent),
}
