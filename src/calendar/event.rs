use chrono::{DateTime, Local, Timelike};

/// A single, already-expanded occurrence of a calendar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub summary: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl CalendarEvent {
    pub fn new(summary: impl Into<String>, start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self {
            summary: summary.into(),
            start,
            end,
        }
    }

    /// Both ends sit exactly on local midnight.
    pub fn is_all_day(&self) -> bool {
        is_midnight(&self.start) && is_midnight(&self.end)
    }

    /// `start <= now < end`. Empty and inverted spans never match.
    pub fn is_ongoing(&self, now: DateTime<Local>) -> bool {
        self.start <= now && now < self.end
    }

    /// Half-open overlap with `[range_start, range_end)`. Empty or inverted
    /// events belong to the range their start falls in.
    pub fn overlaps(&self, range_start: DateTime<Local>, range_end: DateTime<Local>) -> bool {
        if self.end <= self.start {
            return range_start <= self.start && self.start < range_end;
        }
        self.start < range_end && self.end > range_start
    }
}

fn is_midnight(dt: &DateTime<Local>) -> bool {
    dt.hour() == 0 && dt.minute() == 0
}
