//! Live view rendering.
//!
//! Shows the most recent batch delivered by the realtime feed.

use ratatui::{layout::Rect, Frame};

use super::common::render_placeholder;
use super::readings::render_set;
use crate::app::App;

/// Render the Live view for the selected device.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match app.live {
        Some(ref set) if !set.is_empty() => {
            let title = format!("Latest readings for {}", set.device_id);
            render_set(frame, app, set, area, &title);
        }
        _ => {
            let message = match app.load_error {
                Some(ref err) => format!("Cannot read {}: {}", app.device_id, err),
                None => format!("Waiting for readings from {}...", app.device_id),
            };
            render_placeholder(frame, app, area, "Live", &message);
        }
    }
}
