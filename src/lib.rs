//! Today's current and upcoming calendar events as a one-line status
//! indicator.

pub mod agenda;
pub mod app;
pub mod calendar;
pub mod components;
pub mod event;
pub mod format;
pub mod indicator;
pub mod refresh;
pub mod settings;
pub mod theme;
pub mod timers;
pub mod tui;

pub use agenda::{select_events, today_events, Selection};
pub use format::{format_label, DisplayOptions};
