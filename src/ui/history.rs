//! History view rendering.
//!
//! Displays the result of a range query, with the range and its span
//! shown above the readings.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::common::render_placeholder;
use super::readings::render_set;
use crate::app::App;
use crate::data::duration::format_span;
use crate::data::Origin;

/// Render the History view for the selected device and range.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Range line
        Constraint::Min(8),    // Readings
    ])
    .split(area);

    // Show which range the loaded readings actually cover; after a failed
    // reload it may differ from the requested one.
    let loaded = app.historical.as_ref().and_then(|s| match s.origin {
        Origin::Historical(range) => Some(range),
        Origin::Live => None,
    });

    let mut spans = vec![
        Span::styled(" Range ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "{} ({})",
            app.history_range.label(),
            format_span(app.history_range.span())
        )),
    ];
    if loaded.is_some_and(|r| r != app.history_range) {
        spans.push(Span::styled(
            " [showing previous range]",
            Style::default().fg(app.theme.error),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    match app.historical {
        Some(ref set) if !set.is_empty() => {
            render_set(frame, app, set, chunks[1], "Readings in range");
        }
        Some(_) => {
            render_placeholder(frame, app, chunks[1], "History", "No readings in this range");
        }
        None => {
            render_placeholder(frame, app, chunks[1], "History", "Press Enter to load readings");
        }
    }
}
