use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

use super::event::CalendarEvent;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Where the day's events come from.
pub trait CalendarSource {
    /// Refresh the source's view of the calendar.
    fn load_events(&mut self, force_reload: bool) -> Result<()>;

    /// Events overlapping `[range_start, range_end)`, ordered by start.
    fn events(&self, range_start: DateTime<Local>, range_end: DateTime<Local>)
        -> Vec<CalendarEvent>;
}

/// A TOML agenda of already-expanded event occurrences.
///
/// ```toml
/// [[event]]
/// summary = "Standup"
/// start = "2026-10-19 10:00"
/// end = "2026-10-19 10:30"
///
/// [[event]]
/// summary = "Company holiday"
/// date = "2026-10-20"
/// all-day = true
/// ```
pub struct AgendaFile {
    path: Option<PathBuf>,
    events: Vec<CalendarEvent>,
    loaded: bool,
}

impl AgendaFile {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            events: Vec::new(),
            loaded: false,
        }
    }

    /// Agenda kept entirely in memory; reloading is a no-op.
    pub fn from_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            path: None,
            events,
            loaded: true,
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("event-bar").join("agenda.toml"))
    }
}

impl CalendarSource for AgendaFile {
    fn load_events(&mut self, force_reload: bool) -> Result<()> {
        if self.loaded && !force_reload {
            return Ok(());
        }
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        self.events = if path.exists() {
            let content = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read agenda {}", path.display()))?;
            parse_agenda(&content)
                .wrap_err_with(|| format!("Invalid agenda {}", path.display()))?
        } else {
            log::debug!("agenda {} does not exist, treating as empty", path.display());
            Vec::new()
        };
        self.loaded = true;
        Ok(())
    }

    fn events(
        &self,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
    ) -> Vec<CalendarEvent> {
        let mut events: Vec<CalendarEvent> = self
            .events
            .iter()
            .filter(|e| e.overlaps(range_start, range_end))
            .cloned()
            .collect();

        // stable, so same-start entries keep their agenda order
        events.sort_by_key(|e| e.start);
        events
    }
}

/// Local midnight starting `date` and the one starting the day after.
pub fn day_bounds(date: NaiveDate) -> Result<(DateTime<Local>, DateTime<Local>)> {
    let next = date
        .succ_opt()
        .ok_or_else(|| eyre!("No day after {}", date))?;
    Ok((local_midnight(date)?, local_midnight(next)?))
}

fn local_midnight(date: NaiveDate) -> Result<DateTime<Local>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| eyre!("Invalid midnight for {}", date))?;
    to_local(naive)
}

fn to_local(naive: NaiveDateTime) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| eyre!("{} does not exist in the local timezone", naive))
}

// ── TOML agenda types ──

#[derive(Debug, Deserialize, Default)]
struct AgendaConfig {
    #[serde(default)]
    event: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawEvent {
    #[serde(default)]
    summary: String,
    start: Option<String>,
    end: Option<String>,
    date: Option<String>,
    #[serde(default)]
    all_day: bool,
}

impl RawEvent {
    fn into_event(self) -> Result<CalendarEvent> {
        if self.all_day {
            let date = self
                .date
                .as_deref()
                .ok_or_else(|| eyre!("All-day event '{}' needs a date", self.summary))?;
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .wrap_err_with(|| format!("Bad date '{}'", date))?;
            let (start, end) = day_bounds(date)?;
            return Ok(CalendarEvent::new(self.summary, start, end));
        }

        let start = self
            .start
            .as_deref()
            .ok_or_else(|| eyre!("Event '{}' has no start", self.summary))?;
        let end = self
            .end
            .as_deref()
            .ok_or_else(|| eyre!("Event '{}' has no end", self.summary))?;
        let start = parse_datetime(start)?;
        let end = parse_datetime(end)?;
        Ok(CalendarEvent::new(self.summary, start, end))
    }
}

pub fn parse_agenda(content: &str) -> Result<Vec<CalendarEvent>> {
    let config: AgendaConfig = toml::from_str(content)?;
    config.event.into_iter().map(RawEvent::into_event).collect()
}

fn parse_datetime(s: &str) -> Result<DateTime<Local>> {
    let s = s.trim();
    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| eyre!("Unrecognised date-time '{}'", s))?;
    to_local(naive)
}
