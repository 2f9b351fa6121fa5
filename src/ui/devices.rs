//! Devices view rendering.
//!
//! Lists the devices known to the store, with metadata for the device
//! currently in use.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::common::render_placeholder;
use crate::app::App;

/// Render the device list and the active device's info panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(60), // Device list
        Constraint::Percentage(40), // Info
    ])
    .split(area);

    if app.devices.is_empty() {
        render_placeholder(frame, app, chunks[0], "Devices (0)", "No devices found");
    } else {
        render_list(frame, app, chunks[0]);
    }
    render_info(frame, app, chunks[1]);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![Cell::from(""), Cell::from("Device")])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = app
        .devices
        .iter()
        .map(|d| {
            let (marker, style) = if *d == app.device_id {
                ("●", Style::default().fg(app.theme.highlight))
            } else {
                (" ", Style::default())
            };
            Row::new(vec![Cell::from(marker).style(style), Cell::from(d.clone()).style(style)])
        })
        .collect();

    let widths = [Constraint::Length(2), Constraint::Fill(1)];

    let selected = app.selected_device_index.min(app.devices.len().saturating_sub(1));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    " Devices ({}) [{}/{}] ",
                    app.devices.len(),
                    selected + 1,
                    app.devices.len()
                ))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_info(frame: &mut Frame, app: &App, area: Rect) {
    let label = |name: &'static str| Span::styled(name, Style::default().add_modifier(Modifier::BOLD));
    let value = |v: Option<&str>| Span::raw(v.unwrap_or("-").to_string());

    let mut lines = vec![
        Line::from(vec![label(" Device:   "), Span::raw(app.device_id.clone())]),
        Line::from(""),
    ];

    match app.device_info {
        Some(ref info) => {
            lines.push(Line::from(vec![label(" Name:     "), value(info.name.as_deref())]));
            lines.push(Line::from(vec![label(" Location: "), value(info.location.as_deref())]));
            lines.push(Line::from(vec![label(" Firmware: "), value(info.firmware.as_deref())]));
            for (key, v) in &info.extra {
                let text = match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!(" {}: ", key), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(text),
                ]));
            }
        }
        None => lines.push(Line::from(Span::styled(
            " No device info",
            Style::default().add_modifier(Modifier::DIM),
        ))),
    }

    let block = Block::default()
        .title(" Active device ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
