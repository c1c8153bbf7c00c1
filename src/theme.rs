use std::process::Command;
use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

use crate::settings::Settings;

/// Colour setting value that follows the desktop accent colour.
pub const AUTO: &str = "auto";

/// Neutral grey used whenever the accent colour can't be determined.
pub const FALLBACK_ACCENT: Color = Color::Rgb(0x5f, 0x63, 0x68);

pub const LOADING_STYLE: Style = Style::new().fg(Color::DarkGray);
pub const IDLE_ICON_STYLE: Style = Style::new().fg(Color::DarkGray);

static ACCENT: OnceLock<Color> = OnceLock::new();

/// Desktop accent colour (looked up once per process).
pub fn accent_color() -> Color {
    *ACCENT.get_or_init(|| match gnome_accent_name() {
        Some(name) => accent_from_name(&name).unwrap_or_else(|| {
            log::debug!("unknown accent colour '{}', using fallback", name);
            FALLBACK_ACCENT
        }),
        None => FALLBACK_ACCENT,
    })
}

fn gnome_accent_name() -> Option<String> {
    let output = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "accent-color"])
        .output();

    match output {
        Ok(out) if out.status.success() => {
            let raw = String::from_utf8_lossy(&out.stdout);
            Some(raw.trim().trim_matches('\'').to_string())
        }
        Ok(out) => {
            log::debug!("gsettings exited with {}", out.status);
            None
        }
        Err(err) => {
            log::debug!("could not query accent colour: {}", err);
            None
        }
    }
}

fn accent_from_name(name: &str) -> Option<Color> {
    let hex = match name {
        "blue" => "#3584e4",
        "teal" => "#2190a4",
        "green" => "#57e389",
        "yellow" => "#f8e45c",
        "orange" => "#ff7800",
        "red" => "#ed333b",
        "pink" => "#e66ba0",
        "purple" => "#9141ac",
        "slate" => "#6f8396",
        _ => return None,
    };
    parse_color(hex)
}

/// Styles for the status line, resolved from the current settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub text: Style,
    pub icon: Style,
    /// Colour of the bar drawn before the text, when enabled.
    pub bar: Option<Color>,
}

impl Theme {
    pub fn from_settings(settings: &Settings) -> Self {
        Self::resolve(settings, accent_color)
    }

    fn resolve(settings: &Settings, accent: impl Fn() -> Color) -> Self {
        let resolve = |value: &str| {
            if value == AUTO {
                accent()
            } else {
                parse_color(value).unwrap_or(FALLBACK_ACCENT)
            }
        };

        let text_color = resolve(&settings.text_color);
        Self {
            text: Style::default().fg(text_color),
            icon: Style::default().fg(text_color).add_modifier(Modifier::BOLD),
            bar: settings
                .show_color_bar
                .then(|| resolve(&settings.color_bar_color)),
        }
    }
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
    ("gray", Color::Gray),
    ("grey", Color::Gray),
    ("darkgray", Color::DarkGray),
    ("darkgrey", Color::DarkGray),
    ("lightred", Color::LightRed),
    ("lightgreen", Color::LightGreen),
    ("lightyellow", Color::LightYellow),
    ("lightblue", Color::LightBlue),
    ("lightmagenta", Color::LightMagenta),
    ("lightcyan", Color::LightCyan),
];

/// Accepts `#rrggbb`, `rgb(r, g, b)` (what GTK colour pickers write) or a
/// terminal colour name.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
        return parse_rgb_triplet(inner);
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|&(_, color)| color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let packed = u32::from_str_radix(hex, 16).ok()?;
    let [_, r, g, b] = packed.to_be_bytes();
    Some(Color::Rgb(r, g, b))
}

fn parse_rgb_triplet(inner: &str) -> Option<Color> {
    let channels = inner
        .split(',')
        .map(|c| c.trim().parse::<u8>().ok())
        .collect::<Option<Vec<u8>>>()?;
    match channels[..] {
        [r, g, b] => Some(Color::Rgb(r, g, b)),
        _ => None,
    }
}
