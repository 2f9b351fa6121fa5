//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::export::format_timestamp;

/// Render the header bar with the selected device and its latest reading.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (status_icon, status_style) = if app.load_error.is_some() {
        ("●", Style::default().fg(app.theme.error))
    } else if app.is_subscribed() {
        ("●", Style::default().fg(app.theme.rising))
    } else {
        ("○", Style::default().add_modifier(Modifier::DIM))
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled("SOILWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            app.device_id.clone(),
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(name) = app.device_info.as_ref().and_then(|i| i.name.as_deref()) {
        spans.push(Span::raw(format!(" ({})", name)));
    }

    if let Some(latest) = app.live.as_ref().and_then(|s| s.latest()) {
        spans.push(Span::raw(format!(" │ last reading {}", format_timestamp(latest.timestamp))));
    }

    spans.push(Span::styled(
        format!(" │ {}", app.store_description()),
        Style::default().add_modifier(Modifier::DIM),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Live "),
        Line::from(" 2:History "),
        Line::from(" 3:Devices "),
    ];

    let selected = match app.current_view {
        View::Live => 0,
        View::History => 1,
        View::Devices => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the time since the last update and available controls. Also
/// displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" Error: {} | r:retry q:quit", err))
            .style(Style::default().fg(app.theme.error));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Live => "f:field e:csv J:json Tab:switch ?:help q:quit",
        View::History => "[ ]:shift +/-:zoom r:reload e:csv J:json ?:help q:quit",
        View::Devices => "↑↓:select Enter:use device r:refresh ?:help q:quit",
    };

    let status = match app.displayed_set() {
        Some(set) => format!(
            " {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            set.received_at.elapsed().as_secs_f64(),
            controls
        ),
        None => format!(" {} | {}", app.current_view.label(), controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1/2/3       Live/History/Devices"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Esc         Back to Live"),
        Line::from(""),
        section(" History"),
        Line::from("  [ / ]       Previous/next range"),
        Line::from("  + / -       Widen/narrow range"),
        Line::from("  Enter, r    Reload range"),
        Line::from(""),
        section(" Devices"),
        Line::from("  Enter       Use selected device"),
        Line::from(""),
        section(" General"),
        Line::from("  f           Cycle trend field"),
        Line::from("  e           Export CSV"),
        Line::from("  J           Export JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 27u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Render a dimmed placeholder message inside a bordered block.
pub fn render_placeholder(frame: &mut Frame, app: &App, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(block);

    frame.render_widget(paragraph, area);
}
