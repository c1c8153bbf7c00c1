use crate::settings::Panel;

pub const LOADING_TEXT: &str = "Loading";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    Loading,
    NoEvents,
    NextEvent,
    CurrentEvent,
}

impl IconState {
    pub fn glyph(self) -> &'static str {
        match self {
            IconState::Loading => "\u{25CC}",      // ◌
            IconState::NoEvents => "\u{25A1}",     // □
            IconState::NextEvent => "\u{25B8}",    // ▸
            IconState::CurrentEvent => "\u{25C9}", // ◉
        }
    }
}

/// What the status line currently shows. Rendering happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    icon: IconState,
    icon_visible: bool,
    text: String,
    panel: Panel,
}

impl Default for Indicator {
    fn default() -> Self {
        Self {
            icon: IconState::Loading,
            icon_visible: true,
            text: LOADING_TEXT.to_string(),
            panel: Panel::default(),
        }
    }
}

impl Indicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Leaves visibility alone, so a hidden icon stays hidden.
    pub fn show_no_event_icon(&mut self) {
        self.icon = IconState::NoEvents;
    }

    pub fn show_next_event_icon(&mut self, show_icon: bool) {
        self.icon = IconState::NextEvent;
        self.icon_visible = show_icon;
    }

    pub fn show_current_event_icon(&mut self, show_icon: bool) {
        self.icon = IconState::CurrentEvent;
        self.icon_visible = show_icon;
    }

    pub fn set_panel(&mut self, panel: Panel) {
        self.panel = panel;
    }

    pub fn icon(&self) -> IconState {
        self.icon
    }

    pub fn icon_visible(&self) -> bool {
        self.icon_visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    /// Icon and text as one plain line, for bars that read stdout.
    pub fn line(&self) -> String {
        match (self.icon_visible, self.text.is_empty()) {
            (true, false) => format!("{} {}", self.icon.glyph(), self.text),
            (true, true) => self.icon.glyph().to_string(),
            (false, _) => self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_out_loading() {
        let indicator = Indicator::new();
        assert_eq!(indicator.icon(), IconState::Loading);
        assert_eq!(indicator.text(), LOADING_TEXT);
        assert_eq!(indicator.line(), format!("\u{25CC} {}", LOADING_TEXT));
    }

    #[test]
    fn event_icons_follow_visibility_flag() {
        let mut indicator = Indicator::new();
        indicator.show_next_event_icon(false);
        indicator.set_text("In 5m: Standup");
        assert!(!indicator.icon_visible());
        assert_eq!(indicator.line(), "In 5m: Standup");

        indicator.show_current_event_icon(true);
        assert_eq!(indicator.icon(), IconState::CurrentEvent);
        assert_eq!(indicator.line(), "\u{25C9} In 5m: Standup");
    }

    #[test]
    fn no_event_icon_keeps_hidden_icon_hidden() {
        let mut indicator = Indicator::new();
        indicator.show_next_event_icon(false);
        indicator.show_no_event_icon();
        indicator.set_text("");
        assert_eq!(indicator.icon(), IconState::NoEvents);
        assert_eq!(indicator.line(), "");
    }
}
