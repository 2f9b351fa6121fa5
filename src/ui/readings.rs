//! Reading set rendering shared by the Live and History views.
//!
//! Lays out stat cards for the tracked fields, a sparkline for the selected
//! field and the readings table, newest first.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use soilwatch_types::{Field, FieldStats};

use crate::app::App;
use crate::data::trend::{field_sparkline, rate_per_hour};
use crate::data::ReadingSet;
use crate::export::format_timestamp;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a reading set: stat cards, sparkline and table.
pub fn render_set(frame: &mut Frame, app: &App, set: &ReadingSet, area: Rect, title: &str) {
    let chunks = Layout::vertical([
        Constraint::Length(5), // Stat cards
        Constraint::Length(3), // Sparkline
        Constraint::Min(4),    // Table
    ])
    .split(area);

    render_stat_cards(frame, app, set, chunks[0]);
    render_trend(frame, app, set, chunks[1]);
    render_table(frame, app, set, chunks[2], title);
}

fn render_stat_cards(frame: &mut Frame, app: &App, set: &ReadingSet, area: Rect) {
    let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

    for (field, card) in Field::TRACKED.into_iter().zip(cards.iter()) {
        let stats = set.stats.as_ref().and_then(|s| s.get(field));
        let rate = rate_per_hour(&set.readings, field);
        let lines = stat_lines(app, field, stats, rate);

        let border = if field == app.selected_field {
            Style::default().fg(app.theme.field_color(field))
        } else {
            Style::default().fg(app.theme.border)
        };

        let title = match field.unit() {
            "" => format!(" {} ", field.label()),
            unit => format!(" {} ({}) ", field.label(), unit),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(border);

        frame.render_widget(Paragraph::new(lines).block(block), *card);
    }
}

fn stat_lines(
    app: &App,
    field: Field,
    stats: Option<&FieldStats>,
    rate: Option<f64>,
) -> Vec<Line<'static>> {
    let Some(stats) = stats else {
        return vec![Line::from(Span::styled(
            " -",
            Style::default().add_modifier(Modifier::DIM),
        ))];
    };

    let trend = match rate {
        Some(r) => {
            let arrow = if r > 0.0 {
                "▲"
            } else if r < 0.0 {
                "▼"
            } else {
                "■"
            };
            Span::styled(
                format!(" {} {}/h", arrow, field.format(r.abs())),
                app.theme.trend_style(r),
            )
        }
        None => Span::styled(" -", Style::default().add_modifier(Modifier::DIM)),
    };

    vec![
        Line::from(Span::styled(
            format!(" {}", field.format(stats.avg)),
            Style::default()
                .fg(app.theme.field_color(field))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {} – {}", field.format(stats.min), field.format(stats.max)),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(trend),
    ]
}

fn render_trend(frame: &mut Frame, app: &App, set: &ReadingSet, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let levels = field_sparkline(&set.readings, app.selected_field, width);
    let color = app.theme.field_color(app.selected_field);

    let line = if levels.is_empty() {
        Line::from(Span::styled(
            "Not enough readings for a trend",
            Style::default().add_modifier(Modifier::DIM),
        ))
    } else {
        Line::from(Span::styled(
            render_sparkline(&levels),
            Style::default().fg(color),
        ))
    };

    let block = Block::default()
        .title(format!(" {} trend [f:field] ", app.selected_field.label()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_table(frame: &mut Frame, app: &App, set: &ReadingSet, area: Rect, title: &str) {
    let mut header_cells = vec![Cell::from("Time")];
    header_cells.extend(Field::ALL.iter().map(|f| Cell::from(f.label())));
    let header = Row::new(header_cells).height(1).style(app.theme.header);

    let rows: Vec<Row> = set
        .readings
        .iter()
        .rev()
        .map(|r| {
            let mut cells = vec![Cell::from(format_timestamp(r.timestamp))];
            cells.extend(Field::ALL.iter().map(|f| Cell::from(f.format(r.get(*f)))));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(20)];
    widths.extend(Field::ALL.iter().map(|_| Constraint::Fill(1)));

    let selected = app.selected_row.min(set.len().saturating_sub(1));
    let position_info = if set.is_empty() {
        String::new()
    } else {
        format!(" [{}/{}]", selected + 1, set.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" {} ({}){} ", title, set.len(), position_info))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !set.is_empty() {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_sparkline(levels: &[u8]) -> String {
    levels.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}
