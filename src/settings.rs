use std::path::{Path, PathBuf};

use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::format::DisplayOptions;
use crate::theme;

pub const KEYS: &[&str] = &[
    "which-panel",
    "event-length",
    "show-event-name",
    "show-duration",
    "show-time-before-event",
    "show-time-of-event",
    "show-next-event-during-meeting",
    "show-event-icon",
    "show-color-bar",
    "color-bar-color",
    "text-color",
];

/// Where in the bar the indicator sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Left,
    #[default]
    Center,
    Right,
}

impl Panel {
    fn as_str(self) -> &'static str {
        match self {
            Panel::Left => "left",
            Panel::Center => "center",
            Panel::Right => "right",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "0" => Some(Panel::Left),
            "center" | "centre" | "1" => Some(Panel::Center),
            "right" | "2" => Some(Panel::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    pub which_panel: Panel,
    pub event_length: u32,
    pub show_event_name: bool,
    pub show_duration: bool,
    pub show_time_before_event: bool,
    pub show_time_of_event: bool,
    pub show_next_event_during_meeting: bool,
    pub show_event_icon: bool,
    pub show_color_bar: bool,
    pub color_bar_color: String,
    pub text_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            which_panel: Panel::Center,
            event_length: 30,
            show_event_name: true,
            show_duration: true,
            show_time_before_event: true,
            show_time_of_event: true,
            show_next_event_during_meeting: true,
            show_event_icon: true,
            show_color_bar: false,
            color_bar_color: theme::AUTO.to_string(),
            text_color: theme::AUTO.to_string(),
        }
    }
}

impl Settings {
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            show_event_name: self.show_event_name,
            show_duration: self.show_duration,
            show_time_before_event: self.show_time_before_event,
            show_time_of_event: self.show_time_of_event,
            show_next_event_during_meeting: self.show_next_event_during_meeting,
            truncate_length: self.event_length.max(1) as usize,
        }
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "which-panel" => self.which_panel.as_str().to_string(),
            "event-length" => self.event_length.to_string(),
            "show-event-name" => self.show_event_name.to_string(),
            "show-duration" => self.show_duration.to_string(),
            "show-time-before-event" => self.show_time_before_event.to_string(),
            "show-time-of-event" => self.show_time_of_event.to_string(),
            "show-next-event-during-meeting" => self.show_next_event_during_meeting.to_string(),
            "show-event-icon" => self.show_event_icon.to_string(),
            "show-color-bar" => self.show_color_bar.to_string(),
            "color-bar-color" => self.color_bar_color.clone(),
            "text-color" => self.text_color.clone(),
            _ => bail!("Unknown setting '{}'", key),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "which-panel" => {
                self.which_panel =
                    Panel::parse(value).ok_or_else(|| eyre!("Expected left, center or right"))?;
            }
            "event-length" => {
                let n: u32 = value
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("'{}' is not a number", value))?;
                if n == 0 {
                    bail!("event-length must be at least 1");
                }
                self.event_length = n;
            }
            "show-event-name" => self.show_event_name = parse_bool(value)?,
            "show-duration" => self.show_duration = parse_bool(value)?,
            "show-time-before-event" => self.show_time_before_event = parse_bool(value)?,
            "show-time-of-event" => self.show_time_of_event = parse_bool(value)?,
            "show-next-event-during-meeting" => {
                self.show_next_event_during_meeting = parse_bool(value)?
            }
            "show-event-icon" => self.show_event_icon = parse_bool(value)?,
            "show-color-bar" => self.show_color_bar = parse_bool(value)?,
            "color-bar-color" => self.color_bar_color = parse_color_setting(value)?,
            "text-color" => self.text_color = parse_color_setting(value)?,
            _ => bail!("Unknown setting '{}'", key),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => bail!("'{}' is not a boolean", other),
    }
}

fn parse_color_setting(value: &str) -> Result<String> {
    let value = value.trim();
    if value == theme::AUTO || theme::parse_color(value).is_some() {
        Ok(value.to_string())
    } else {
        bail!("'{}' is not a colour (use \"auto\", #rrggbb or a colour name)", value)
    }
}

/// Typed settings backed by a TOML file, with change notification.
pub struct SettingsStore {
    path: Option<PathBuf>,
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    /// Loads `path`, falling back to defaults when it is missing or broken.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match read_settings(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{:#}; using default settings", err);
                Settings::default()
            }
        };
        let (tx, _) = watch::channel(settings);
        Self {
            path: Some(path),
            tx,
        }
    }

    pub fn in_memory(settings: Settings) -> Self {
        let (tx, _) = watch::channel(settings);
        Self { path: None, tx }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("event-bar").join("settings.toml"))
    }

    /// Current snapshot.
    pub fn settings(&self) -> Settings {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Re-reads the backing file. Subscribers are only woken when a value
    /// actually changed; a broken file keeps the last good settings.
    pub fn reload(&self) -> bool {
        let Some(path) = self.path.as_deref() else {
            return false;
        };
        match read_settings(path) {
            Ok(fresh) => self.tx.send_if_modified(|current| {
                if *current == fresh {
                    return false;
                }
                *current = fresh;
                true
            }),
            Err(err) => {
                log::warn!("{:#}; keeping previous settings", err);
                false
            }
        }
    }

    pub fn get(&self, key: &str) -> Result<String> {
        self.tx.borrow().get(key)
    }

    /// Validates and applies one setting, persists it, then notifies.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.settings();
        updated.set(key, value)?;
        if let Some(path) = self.path.as_deref() {
            write_settings(path, &updated)?;
        }
        self.tx.send_if_modified(|current| {
            if *current == updated {
                return false;
            }
            *current = updated;
            true
        });
        Ok(())
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read settings {}", path.display()))?;
    let mut settings: Settings = toml::from_str(&content)
        .wrap_err_with(|| format!("Invalid settings {}", path.display()))?;
    settings.event_length = settings.event_length.max(1);
    Ok(settings)
}

fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content)
        .wrap_err_with(|| format!("Failed to write settings {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let settings: Settings = toml::from_str("show-duration = false\n").unwrap();
        assert!(!settings.show_duration);
        assert!(settings.show_event_name);
        assert_eq!(settings.event_length, 30);
        assert_eq!(settings.which_panel, Panel::Center);
    }

    #[test]
    fn display_options_mirror_settings() {
        let mut settings = Settings::default();
        settings.set("show-event-name", "false").unwrap();
        settings.set("event-length", "12").unwrap();
        let options = settings.display_options();
        assert!(!options.show_event_name);
        assert_eq!(options.truncate_length, 12);
    }

    #[test]
    fn every_key_round_trips_through_get() {
        let settings = Settings::default();
        for key in KEYS {
            let value = settings.get(key).unwrap();
            let mut copy = settings.clone();
            copy.set(key, &value).unwrap();
            assert_eq!(copy, settings, "{}", key);
        }
    }

    #[test]
    fn rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.set("event-length", "0").is_err());
        assert!(settings.set("event-length", "many").is_err());
        assert!(settings.set("show-duration", "maybe").is_err());
        assert!(settings.set("which-panel", "top").is_err());
        assert!(settings.set("text-color", "#12").is_err());
        assert!(settings.set("text-color", "#aébcd").is_err());
        assert!(settings.set("no-such-key", "1").is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn set_persists_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event-bar").join("settings.toml");
        let store = SettingsStore::open(&path);
        let mut rx = store.subscribe();

        store.set("which-panel", "right").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().which_panel, Panel::Right);

        let reopened = SettingsStore::open(&path);
        assert_eq!(reopened.get("which-panel").unwrap(), "right");
    }

    #[test]
    fn reload_only_notifies_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "event-length = 10\n").unwrap();
        let store = SettingsStore::open(&path);
        let rx = store.subscribe();

        assert!(!store.reload());
        assert!(!rx.has_changed().unwrap());

        std::fs::write(&path, "event-length = 20\n").unwrap();
        assert!(store.reload());
        assert!(rx.has_changed().unwrap());
        assert_eq!(store.settings().event_length, 20);
    }

    #[test]
    fn broken_file_keeps_last_good_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "show-duration = false\n").unwrap();
        let store = SettingsStore::open(&path);

        std::fs::write(&path, "show-duration = [oops").unwrap();
        assert!(!store.reload());
        assert!(!store.settings().show_duration);
    }
}
