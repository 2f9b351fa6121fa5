//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;
use soilwatch_types::Field;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for rising trends.
    pub rising: Color,
    /// Color for falling trends.
    pub falling: Color,
    /// Color for errors.
    pub error: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Per-field colors, indexed like [`Field::TRACKED`].
    pub fields: [Color; 4],
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            rising: Color::Green,
            falling: Color::Yellow,
            error: Color::Red,
            border: Color::Gray,
            fields: [Color::LightBlue, Color::LightRed, Color::LightGreen, Color::LightYellow],
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            rising: Color::Green,
            falling: Color::Magenta,
            error: Color::Red,
            border: Color::DarkGray,
            fields: [Color::Blue, Color::Red, Color::Green, Color::Magenta],
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Color for a field's card and sparkline.
    pub fn field_color(&self, field: Field) -> Color {
        Field::TRACKED
            .iter()
            .position(|f| *f == field)
            .map_or(self.highlight, |i| self.fields[i])
    }

    /// Style for a rate of change.
    pub fn trend_style(&self, rate: f64) -> Style {
        if rate > 0.0 {
            Style::default().fg(self.rising)
        } else if rate < 0.0 {
            Style::default().fg(self.falling)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    }
}
