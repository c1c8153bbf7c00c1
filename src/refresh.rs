use chrono::{DateTime, Local};

use crate::agenda::select_events;
use crate::calendar::CalendarEvent;
use crate::format::format_label;
use crate::indicator::Indicator;
use crate::settings::Settings;

/// Ticks of an empty day before the idle icon replaces "Loading".
pub const IDLE_THRESHOLD: u32 = 8;

/// Which branch the last refresh took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Still waiting for the calendar; the indicator was left untouched.
    Pending,
    Idle,
    Upcoming,
    InEvent,
}

/// Applies one evaluation tick to the indicator.
///
/// An empty day is indistinguishable from a calendar that hasn't answered
/// yet, so the idle state is only shown after [`IDLE_THRESHOLD`] empty
/// ticks. The counter is never reset.
#[derive(Debug)]
pub struct Refresher {
    iterations: u32,
}

impl Default for Refresher {
    fn default() -> Self {
        Self { iterations: 1 }
    }
}

impl Refresher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn apply(
        &mut self,
        indicator: &mut Indicator,
        todays_events: &[CalendarEvent],
        settings: &Settings,
        now: DateTime<Local>,
    ) -> Outcome {
        let selection = select_events(todays_events, now);
        let text = format_label(selection, &settings.display_options(), now);
        let show_icon = settings.show_event_icon;
        let no_events_today = todays_events.is_empty();

        if selection.is_empty() && no_events_today {
            self.iterations = self.iterations.saturating_add(1);
        }

        match (selection.current, selection.next) {
            (None, None) => {
                if self.iterations >= IDLE_THRESHOLD || !no_events_today {
                    indicator.show_no_event_icon();
                    indicator.set_text("");
                    Outcome::Idle
                } else {
                    Outcome::Pending
                }
            }
            (None, Some(_)) => {
                indicator.show_next_event_icon(show_icon);
                indicator.set_text(text);
                Outcome::Upcoming
            }
            (Some(_), _) => {
                indicator.show_current_event_icon(show_icon);
                indicator.set_text(text);
                Outcome::InEvent
            }
        }
    }
}
