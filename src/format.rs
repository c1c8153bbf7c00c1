//! Turns a [`Selection`] into the single line shown in the status bar.

use chrono::{DateTime, Local, Timelike};

use crate::agenda::Selection;
use crate::calendar::CalendarEvent;

/// Shown instead of the summary when event names are hidden.
pub const PLACEHOLDER_NAME: &str = "Meeting";
pub const ELLIPSIS: &str = "...";

/// Display toggles, snapshotted from the settings on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show_event_name: bool,
    pub show_duration: bool,
    pub show_time_before_event: bool,
    pub show_time_of_event: bool,
    pub show_next_event_during_meeting: bool,
    pub truncate_length: usize,
}

pub fn format_label(
    selection: Selection<'_>,
    options: &DisplayOptions,
    now: DateTime<Local>,
) -> String {
    match (selection.current, selection.next) {
        (None, None) => String::new(),
        (None, Some(next)) => next_event_label(next, options, now),
        (Some(current), Some(next)) if options.show_next_event_during_meeting => format!(
            "Ends in {}. Next: {} at {}",
            relative_time(now, current.end),
            event_name(next, options),
            time_of_day(next.start),
        ),
        (Some(current), _) => format!(
            "Ends in {}: {}",
            relative_time(now, current.end),
            event_name(current, options),
        ),
    }
}

fn next_event_label(
    event: &CalendarEvent,
    options: &DisplayOptions,
    now: DateTime<Local>,
) -> String {
    let mut parts = Vec::with_capacity(3);
    if options.show_time_before_event {
        parts.push(format!("In {}", relative_time(now, event.start)));
    }
    if options.show_time_of_event {
        parts.push(format!("({})", time_of_day(event.start)));
    }
    if options.show_duration {
        parts.push(format!("for {}", relative_time(event.start, event.end)));
    }

    let name = event_name(event, options);
    if parts.is_empty() {
        name
    } else {
        format!("{}: {}", parts.join(" "), name)
    }
}

fn event_name(event: &CalendarEvent, options: &DisplayOptions) -> String {
    if options.show_event_name {
        truncate(&event.summary, options.truncate_length)
    } else {
        PLACEHOLDER_NAME.to_string()
    }
}

/// Cuts `text` to `max_chars` characters and marks the cut with an ellipsis.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Distance between two instants as `"2h 5m"`, `"1h"` or `"59m"`.
///
/// Partial minutes round up. There is no day unit, so a gap of more than a
/// day still renders in hours.
pub fn relative_time(from: DateTime<Local>, to: DateTime<Local>) -> String {
    let millis = (to - from).num_milliseconds().unsigned_abs();
    let minutes = millis.div_ceil(60_000);

    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// 24-hour wall-clock time. The minute is padded on the right, so 10:05
/// renders as "10:50".
pub fn time_of_day(at: DateTime<Local>) -> String {
    format!("{}:{:0<2}", at.hour(), at.minute())
}
