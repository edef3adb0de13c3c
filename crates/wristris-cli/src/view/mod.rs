pub use self::session_view::*;

mod session_view;
pub mod widgets;
