use chrono::{Local, NaiveTime};

/// Formats a time of day as `HH:MM`.
pub(crate) fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Current local time as `HH:MM`.
pub(crate) fn now() -> String {
    format_clock(Local::now().time())
}
