use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::indicator::{IconState, Indicator};
use crate::settings::Panel;
use crate::theme::{self, Theme};

const COLOR_BAR: &str = "\u{258C}"; // ▌

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, indicator: &Indicator, theme: &Theme) {
        let bar =
            Paragraph::new(Self::line(indicator, theme)).alignment(alignment(indicator.panel()));
        frame.render_widget(bar, area);
    }

    pub fn line(indicator: &Indicator, theme: &Theme) -> Line<'static> {
        let mut spans = Vec::with_capacity(3);

        if let Some(color) = theme.bar {
            if !indicator.text().is_empty() {
                spans.push(Span::styled(format!("{} ", COLOR_BAR), Style::default().fg(color)));
            }
        }

        if indicator.icon_visible() {
            let style = match indicator.icon() {
                IconState::Loading => theme::LOADING_STYLE,
                IconState::NoEvents => theme::IDLE_ICON_STYLE,
                IconState::NextEvent | IconState::CurrentEvent => theme.icon,
            };
            spans.push(Span::styled(format!("{} ", indicator.icon().glyph()), style));
        }

        let text_style = match indicator.icon() {
            IconState::Loading => theme::LOADING_STYLE,
            _ => theme.text,
        };
        spans.push(Span::styled(indicator.text().to_string(), text_style));

        Line::from(spans)
    }
}

fn alignment(panel: Panel) -> Alignment {
    match panel {
        Panel::Left => Alignment::Left,
        Panel::Center => Alignment::Center,
        Panel::Right => Alignment::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn theme(bar: Option<Color>) -> Theme {
        Theme {
            text: Style::default().fg(Color::White),
            icon: Style::default().fg(Color::Cyan),
            bar,
        }
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn renders_bar_icon_and_text() {
        let mut indicator = Indicator::new();
        indicator.show_next_event_icon(true);
        indicator.set_text("In 5m: Standup");

        let line = StatusBar::line(&indicator, &theme(Some(Color::Red)));
        assert_eq!(plain(&line), "\u{258C} \u{25B8} In 5m: Standup");
        assert_eq!(line.spans[0].style.fg, Some(Color::Red));
        assert_eq!(line.spans[1].style.fg, Some(Color::Cyan));
    }

    #[test]
    fn idle_state_draws_no_bar() {
        let mut indicator = Indicator::new();
        indicator.show_no_event_icon();
        indicator.set_text("");

        let line = StatusBar::line(&indicator, &theme(Some(Color::Red)));
        assert_eq!(plain(&line), "\u{25A1} ");
    }
}
