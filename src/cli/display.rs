// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal output for the CLI.
//!
//! OneDark on dark terminals, One Light on light ones. `WFST_THEME` forces a
//! theme, otherwise `COLORFGBG` decides, otherwise dark. `NO_COLOR` and
//! non-TTY stdout turn colors off entirely so piped output stays clean.

use std::io::IsTerminal;
use std::sync::OnceLock;

/// Width between the box borders.
pub const BOX_WIDTH: usize = 72;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    fn from_env() -> Self {
        let forced = std::env::var("WFST_THEME").ok().and_then(|value| {
            match value.to_ascii_lowercase().as_str() {
                "light" | "l" => Some(Theme::Light),
                "dark" | "d" => Some(Theme::Dark),
                _ => None,
            }
        });
        forced
            .or_else(|| std::env::var("COLORFGBG").ok().and_then(|v| Self::from_colorfgbg(&v)))
            .unwrap_or(Theme::Dark)
    }

    /// `COLORFGBG` is "fg;bg"; backgrounds 7 and up, except 8, are light.
    fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.parse().ok()?;
        Some(if bg >= 7 && bg != 8 {
            Theme::Light
        } else {
            Theme::Dark
        })
    }

    fn palette(self) -> &'static Palette {
        match self {
            Theme::Dark => &ONE_DARK,
            Theme::Light => &ONE_LIGHT,
        }
    }
}

pub fn theme() -> Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    *THEME.get_or_init(Theme::from_env)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Cyan,
    Gray,
    Accent,
}

type Rgb = (u8, u8, u8);

struct Palette {
    red: Rgb,
    green: Rgb,
    yellow: Rgb,
    cyan: Rgb,
    gray: Rgb,
    accent: Rgb,
}

const ONE_DARK: Palette = Palette {
    red: (224, 108, 117),
    green: (152, 195, 121),
    yellow: (229, 192, 123),
    cyan: (86, 182, 194),
    gray: (92, 99, 112),
    accent: (102, 217, 239),
};

const ONE_LIGHT: Palette = Palette {
    red: (228, 86, 73),
    green: (80, 161, 79),
    yellow: (193, 132, 1),
    cyan: (1, 132, 188),
    gray: (160, 161, 167),
    accent: (1, 112, 158),
};

impl Palette {
    fn rgb(&self, color: Color) -> Rgb {
        match color {
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Yellow => self.yellow,
            Color::Cyan => self.cyan,
            Color::Gray => self.gray,
            Color::Accent => self.accent,
        }
    }
}

fn escape((r, g, b): Rgb) -> String {
    format!("\x1b[38;2;{r};{g};{b}m")
}

pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// `text` in `color`, or untouched when colors are off.
pub fn paint(color: Color, text: &str) -> String {
    styled(color, false, text)
}

/// Bold `text` in `color`, or untouched when colors are off.
pub fn bold(color: Color, text: &str) -> String {
    styled(color, true, text)
}

fn styled(color: Color, bold: bool, text: &str) -> String {
    if !use_colors() {
        return text.to_string();
    }
    let weight = if bold { BOLD } else { "" };
    let rgb = theme().palette().rgb(color);
    format!("{weight}{}{text}{RESET}", escape(rgb))
}

/// Length as seen on screen, ignoring `ESC ... m` sequences.
pub fn visible_len(s: &str) -> usize {
    s.split('\x1b')
        .enumerate()
        .map(|(i, chunk)| {
            if i == 0 {
                chunk.chars().count()
            } else {
                chunk.split_once('m').map_or(0, |(_, rest)| rest.chars().count())
            }
        })
        .sum()
}

#[derive(Debug, Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

/// Pad to `width` visible columns. Longer strings come back unchanged.
pub fn pad(s: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(visible_len(s)));
    match align {
        Align::Left => format!("{s}{fill}"),
        Align::Right => format!("{fill}{s}"),
    }
}

fn frame(text: &str) -> String {
    paint(Color::Gray, text)
}

/// `│ content          │`
pub fn row(content: &str) {
    let fill = " ".repeat(BOX_WIDTH.saturating_sub(visible_len(content)));
    println!("{}{content}{fill}{}", frame("│"), frame("│"));
}

/// `┌─ LABEL ──────────┐`
pub fn section_top(label: &str) {
    let title = format!("─ {} ", bold(Color::Cyan, label));
    let rule = "─".repeat(BOX_WIDTH.saturating_sub(visible_len(&title)));
    println!("{}{title}{}", frame("┌"), frame(&format!("{rule}┐")));
}

/// `└──────────────────┘`
pub fn section_bot() {
    println!("{}", frame(&format!("└{}┘", "─".repeat(BOX_WIDTH))));
}

/// `  label   value` inside a box.
pub fn field(label: &str, value: &str) {
    row(&format!("  {} {value}", pad(&paint(Color::Gray, label), 20, Align::Left)));
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Green under 5 ms, yellow under 50 ms, red beyond.
pub fn timing_ms(value: f64) -> String {
    let color = match value {
        v if v < 5.0 => Color::Green,
        v if v < 50.0 => Color::Yellow,
        _ => Color::Red,
    };
    paint(color, &format!("{value:.3} ms"))
}

/// Surface form, highlighted when it is the exact match for the query.
pub fn suggestion(key: &str, exact: bool) -> String {
    if exact {
        bold(Color::Accent, key)
    } else {
        key.to_string()
    }
}

pub fn check_mark(ok: bool) -> String {
    if ok {
        paint(Color::Green, "ok")
    } else {
        bold(Color::Red, "MISMATCH")
    }
}
