//! Fixed-rate terminal runtime for the game front-end.
//!
//! [`Runtime::run`] drives an [`App`] with three periodic signals: frame
//! ticks for game logic, clock ticks for wall-clock displays, and renders
//! scheduled by a [`RenderMode`]. Terminal input is delivered in between.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
