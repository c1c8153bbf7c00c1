use chrono::{DateTime, Local};

use crate::agenda::today_events;
use crate::calendar::CalendarSource;
use crate::indicator::Indicator;
use crate::refresh::{Outcome, Refresher};
use crate::settings::SettingsStore;
use crate::theme::Theme;

pub struct App<S> {
    pub indicator: Indicator,
    pub theme: Theme,
    pub loaded: bool,
    source: S,
    settings: SettingsStore,
    refresher: Refresher,
}

impl<S: CalendarSource> App<S> {
    pub fn new(source: S, settings: SettingsStore) -> Self {
        let theme = Theme::from_settings(&settings.settings());
        Self {
            indicator: Indicator::new(),
            theme,
            loaded: false,
            source,
            settings,
            refresher: Refresher::new(),
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Places the indicator in its configured panel.
    pub fn load_indicator(&mut self) {
        let settings = self.settings.settings();
        self.indicator.set_panel(settings.which_panel);
        self.theme = Theme::from_settings(&settings);
        self.loaded = true;
        log::info!("indicator placed in {:?} panel", settings.which_panel);
    }

    /// Re-evaluates today's events. A failing calendar leaves the indicator
    /// as it was.
    pub fn refresh(&mut self, now: DateTime<Local>) -> Option<Outcome> {
        let events = match today_events(&mut self.source, now) {
            Ok(events) => events,
            Err(err) => {
                log::warn!("could not load today's events: {:#}", err);
                return None;
            }
        };

        let settings = self.settings.settings();
        let outcome = self
            .refresher
            .apply(&mut self.indicator, &events, &settings, now);
        log::debug!(
            "refresh: {} event(s) today, {:?}, iteration {}",
            events.len(),
            outcome,
            self.refresher.iterations()
        );
        Some(outcome)
    }

    pub fn on_settings_changed(&mut self, now: DateTime<Local>) {
        let settings = self.settings.settings();
        if self.loaded && self.indicator.panel() != settings.which_panel {
            self.load_indicator();
        }
        self.theme = Theme::from_settings(&settings);
        self.refresh(now);
    }
}
