use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// When the screen is redrawn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum RenderMode {
    /// Render at fixed intervals.
    Interval(Duration),
    /// Render after every tick or terminal event.
    #[default]
    OnDirty,
    /// Render after state changes, at most once per interval.
    Throttled(Duration),
}

impl RenderMode {
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// A signal due every `interval`, disabled when the interval is `None`.
#[derive(Debug, Clone, Copy)]
struct Periodic {
    interval: Option<Duration>,
    last: Instant,
}

impl Periodic {
    fn new(epoch: Instant) -> Self {
        Self {
            interval: None,
            last: epoch,
        }
    }

    fn next_at(&self) -> Option<Instant> {
        self.interval.map(|interval| self.last + interval)
    }

    /// Returns `true` and restarts the period when the signal is due.
    fn fire(&mut self, now: Instant) -> bool {
        if self.next_at().is_some_and(|at| at <= now) {
            self.last = now;
            return true;
        }
        false
    }
}

/// Produces the next event for the runtime.
///
/// Frame ticks take priority over clock ticks, which take priority over
/// renders; terminal events are read while nothing else is due.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick: Periodic,
    clock: Periodic,
    render_mode: RenderMode,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        let now = Instant::now();
        // Every enabled signal fires on the first iteration.
        let epoch = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            tick: Periodic::new(epoch),
            clock: Periodic::new(epoch),
            render_mode: RenderMode::default(),
            last_render: epoch,
            dirty: true,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick.interval = interval;
    }

    pub(super) fn set_clock_interval(&mut self, interval: Option<Duration>) {
        self.clock.interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Blocks until a signal is due or a terminal event arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if self.tick.fire(now) {
            self.dirty = true;
            return Some(TuiEvent::Tick);
        }
        if self.clock.fire(now) {
            self.dirty = true;
            return Some(TuiEvent::ClockTick);
        }

        let do_render = match self.render_mode {
            RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && now.duration_since(self.last_render) >= interval
            }
        };
        if do_render {
            self.last_render = now;
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    /// Time until the earliest pending signal, `None` to wait indefinitely.
    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_render_at = match self.render_mode {
            RenderMode::Interval(interval) => Some(self.last_render + interval),
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let next_at = [self.tick.next_at(), self.clock.next_at(), next_render_at]
            .into_iter()
            .flatten()
            .min()?;
        Some(next_at.saturating_duration_since(now))
    }
}
