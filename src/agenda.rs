use chrono::{DateTime, Local};
use color_eyre::Result;

use crate::calendar::{day_bounds, CalendarEvent, CalendarSource};

/// The event the user is in right now and the one coming up after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection<'a> {
    pub current: Option<&'a CalendarEvent>,
    pub next: Option<&'a CalendarEvent>,
}

impl Selection<'_> {
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.next.is_none()
    }
}

/// Refreshes `source` and returns today's timed events, ordered by start.
pub fn today_events(
    source: &mut impl CalendarSource,
    now: DateTime<Local>,
) -> Result<Vec<CalendarEvent>> {
    source.load_events(true)?;
    let (start, end) = day_bounds(now.date_naive())?;

    Ok(source
        .events(start, end)
        .into_iter()
        .filter(|e| !e.is_all_day())
        .collect())
}

/// Picks the current and next events out of `events`, which must be sorted
/// by start.
///
/// Events sharing the current event's start are treated as one block, so
/// "next" is the first later event with a different start. When no such
/// event exists the scan carries on, and the last still-running event of
/// the block becomes current.
pub fn select_events(events: &[CalendarEvent], now: DateTime<Local>) -> Selection<'_> {
    let mut current = None;

    for (i, event) in events.iter().enumerate() {
        if now < event.start {
            return Selection {
                current,
                next: Some(event),
            };
        }

        if now < event.end {
            current = Some(event);
            if let Some(next) = events[i + 1..].iter().find(|e| e.start != event.start) {
                return Selection {
                    current,
                    next: Some(next),
                };
            }
        }
    }

    Selection {
        current,
        next: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::AgendaFile;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, h, m, 0).single().unwrap()
    }

    fn ev(summary: &str, start: (u32, u32), end: (u32, u32)) -> CalendarEvent {
        CalendarEvent::new(summary, at(start.0, start.1), at(end.0, end.1))
    }

    fn names(sel: Selection<'_>) -> (Option<&str>, Option<&str>) {
        (
            sel.current.map(|e| e.summary.as_str()),
            sel.next.map(|e| e.summary.as_str()),
        )
    }

    #[test]
    fn empty_day_selects_nothing() {
        assert!(select_events(&[], at(9, 0)).is_empty());
    }

    #[test]
    fn upcoming_event_is_next() {
        let events = [ev("Standup", (10, 0), (10, 30))];
        assert_eq!(names(select_events(&events, at(9, 0))), (None, Some("Standup")));
    }

    #[test]
    fn ongoing_event_without_successor() {
        let events = [ev("Planning", (9, 0), (10, 0))];
        assert_eq!(names(select_events(&events, at(9, 30))), (Some("Planning"), None));
    }

    #[test]
    fn ongoing_event_with_successor() {
        let events = [ev("A", (9, 0), (10, 0)), ev("B", (10, 0), (10, 30))];
        assert_eq!(names(select_events(&events, at(9, 30))), (Some("A"), Some("B")));
    }

    #[test]
    fn all_events_over() {
        let events = [ev("A", (8, 0), (9, 0)), ev("B", (9, 0), (9, 30))];
        assert!(select_events(&events, at(12, 0)).is_empty());
    }

    #[test]
    fn end_instant_is_exclusive() {
        let events = [ev("A", (9, 0), (10, 0)), ev("B", (10, 0), (10, 30))];
        assert_eq!(names(select_events(&events, at(10, 0))), (Some("B"), None));
    }

    #[test]
    fn same_start_events_are_skipped_for_next() {
        let events = [
            ev("A", (9, 0), (10, 0)),
            ev("A-dup", (9, 0), (9, 45)),
            ev("C", (9, 30), (11, 0)),
        ];
        assert_eq!(names(select_events(&events, at(9, 10))), (Some("A"), Some("C")));
    }

    #[test]
    fn later_same_start_event_still_running_becomes_current() {
        let events = [ev("A", (9, 0), (9, 45)), ev("B", (9, 0), (10, 0))];
        assert_eq!(names(select_events(&events, at(9, 30))), (Some("B"), None));
        assert_eq!(names(select_events(&events, at(9, 50))), (Some("B"), None));
    }

    #[test]
    fn same_start_block_keeps_first_when_later_ones_ended() {
        let events = [ev("A", (9, 0), (10, 0)), ev("A-short", (9, 0), (9, 5))];
        assert_eq!(names(select_events(&events, at(9, 10))), (Some("A"), None));
    }

    #[test]
    fn overlapping_later_start_can_be_next() {
        let events = [ev("Long", (9, 0), (12, 0)), ev("Inner", (10, 0), (10, 30))];
        assert_eq!(names(select_events(&events, at(9, 5))), (Some("Long"), Some("Inner")));
    }

    #[test]
    fn zero_length_events_are_never_current() {
        let events = [ev("Ping", (9, 0), (9, 0)), ev("After", (9, 30), (10, 0))];
        assert_eq!(names(select_events(&events, at(9, 0))), (None, Some("After")));
    }

    #[test]
    fn inverted_events_are_skipped() {
        let events = [ev("Broken", (9, 30), (9, 0)), ev("After", (10, 0), (11, 0))];
        assert_eq!(names(select_events(&events, at(9, 45))), (None, Some("After")));
    }

    #[test]
    fn current_event_always_contains_now() {
        let events = [
            ev("A", (8, 0), (9, 0)),
            ev("B", (8, 30), (10, 0)),
            ev("C", (9, 0), (9, 0)),
            ev("D", (9, 15), (9, 45)),
            ev("E", (11, 0), (12, 0)),
        ];
        for minute in (7 * 60..13 * 60).step_by(5) {
            let now = at(minute / 60, minute % 60);
            let sel = select_events(&events, now);
            if let Some(current) = sel.current {
                assert!(current.is_ongoing(now), "{} at {}", current.summary, now);
            }
            if let (Some(current), Some(next)) = (sel.current, sel.next) {
                assert_ne!(current.start, next.start);
            }
        }
    }

    #[test]
    fn today_events_drops_all_day_and_other_days() {
        let mut source = AgendaFile::from_events(vec![
            CalendarEvent::new(
                "Holiday",
                at(0, 0),
                Local.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).single().unwrap(),
            ),
            ev("Standup", (10, 0), (10, 30)),
            CalendarEvent::new(
                "Yesterday",
                Local.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).single().unwrap(),
                Local.with_ymd_and_hms(2026, 3, 9, 11, 0, 0).single().unwrap(),
            ),
        ]);
        let today = today_events(&mut source, at(9, 0)).unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].summary, "Standup");
    }
}
