pub mod event;
pub mod store;

pub use event::CalendarEvent;
pub use store::{day_bounds, AgendaFile, CalendarSource};
