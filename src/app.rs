//! Application state and navigation logic.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use soilwatch_types::Field;
use tracing::{debug, warn};

use crate::data::range::{DEFAULT_SPAN, SPAN_PRESETS};
use crate::data::{ReadingSet, TimeRange};
use crate::export::{export_to_dir, ExportFormat};
use crate::store::{DeviceInfo, ReadingFeed, ReadingStore, FEED_LIMIT};
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Realtime readings for the selected device.
    Live,
    /// Readings for the selected device over a time range.
    History,
    /// Devices known to the store.
    Devices,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Live => View::History,
            View::History => View::Devices,
            View::Devices => View::Live,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Live => View::Devices,
            View::History => View::Live,
            View::Devices => View::History,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Live => "Live",
            View::History => "History",
            View::Devices => "Devices",
        }
    }
}

/// Startup options for [`App`].
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub device_id: String,
    /// Maximum readings shown in the Live view.
    pub window: usize,
    pub history_range: TimeRange,
    pub export_dir: PathBuf,
    pub theme: Theme,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            device_id: "device_001".to_string(),
            window: FEED_LIMIT,
            history_range: TimeRange::last_from_now(DEFAULT_SPAN),
            export_dir: PathBuf::from("."),
            theme: Theme::dark(),
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data access
    store: Box<dyn ReadingStore>,
    feed: Option<Box<dyn ReadingFeed>>,
    pub device_id: String,
    pub device_info: Option<DeviceInfo>,
    pub devices: Vec<String>,
    pub live: Option<ReadingSet>,
    pub historical: Option<ReadingSet>,
    pub history_range: TimeRange,
    pub load_error: Option<String>,
    pub window: usize,
    pub export_dir: PathBuf,

    // Navigation state
    pub selected_field: Field,
    pub selected_device_index: usize,
    pub selected_row: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `store`.
    ///
    /// Nothing is queried until [`App::start`] is called.
    pub fn new(store: Box<dyn ReadingStore>, options: AppOptions) -> Self {
        Self {
            running: true,
            current_view: View::Live,
            show_help: false,
            store,
            feed: None,
            device_id: options.device_id,
            device_info: None,
            devices: Vec::new(),
            live: None,
            historical: None,
            history_range: options.history_range,
            load_error: None,
            window: options.window.max(1),
            export_dir: options.export_dir,
            selected_field: Field::Moisture,
            selected_device_index: 0,
            selected_row: 0,
            theme: options.theme,
            status_message: None,
        }
    }

    /// Load the device list and subscribe to the selected device.
    pub fn start(&mut self) {
        self.refresh_devices();
        self.refresh_device_info();
        if self.current_view == View::Live {
            self.start_live();
            self.poll_live();
        }
    }

    /// Returns a description of the current store.
    pub fn store_description(&self) -> &str {
        self.store.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Whether a realtime subscription is currently open.
    pub fn is_subscribed(&self) -> bool {
        self.feed.as_ref().is_some_and(|f| f.is_active())
    }

    /// Open a feed for the selected device if none is open.
    pub fn start_live(&mut self) {
        if self.feed.is_some() {
            return;
        }
        match self.store.subscribe(&self.device_id) {
            Ok(feed) => {
                debug!(device_id = %self.device_id, feed = feed.description(), "subscribed");
                self.feed = Some(feed);
            }
            Err(e) => {
                warn!(device_id = %self.device_id, error = %e, "subscribe failed");
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Close the current feed, if any.
    pub fn stop_live(&mut self) {
        if let Some(mut feed) = self.feed.take() {
            feed.unsubscribe();
            debug!(device_id = %self.device_id, "unsubscribed");
        }
    }

    /// Poll the feed for a new batch.
    ///
    /// Returns true if a new batch was received.
    pub fn poll_live(&mut self) -> bool {
        // Check for errors from background ingest first
        if let Some(err) = self.store.error() {
            self.load_error = Some(err);
        }

        let Some(feed) = self.feed.as_mut() else {
            return false;
        };

        if let Some(batch) = feed.poll() {
            self.live = Some(ReadingSet::live(&self.device_id, &batch, self.window));
            self.load_error = None;
            self.clamp_selected_row();
            return true;
        }

        if let Some(err) = feed.error() {
            self.load_error = Some(err.to_string());
        }
        false
    }

    /// Periodic refresh, driven by the main loop.
    pub fn tick(&mut self) -> bool {
        match self.current_view {
            View::Live => self.poll_live(),
            _ => false,
        }
    }

    /// Run the range query for the selected device.
    ///
    /// On failure the previously loaded readings stay on screen.
    pub fn load_history(&mut self) {
        match self.store.query_range(&self.device_id, &self.history_range) {
            Ok(readings) => {
                debug!(
                    device_id = %self.device_id,
                    range = %self.history_range.label(),
                    readings = readings.len(),
                    "loaded history"
                );
                self.historical =
                    Some(ReadingSet::historical(&self.device_id, readings, self.history_range));
                self.load_error = None;
                self.clamp_selected_row();
            }
            Err(e) => {
                warn!(device_id = %self.device_id, error = %e, "history query failed");
                self.set_status_message(format!("Failed to load history: {}", e));
            }
        }
    }

    /// Move the history range back (`forward == false`) or forward by its span.
    pub fn shift_range(&mut self, forward: bool) {
        let span = i64::try_from(self.history_range.span().as_millis()).unwrap_or(i64::MAX);
        let delta = if forward { span } else { -span };
        self.history_range = self.history_range.shifted(delta);
        self.load_history();
    }

    /// Narrow the history range to the next smaller span preset.
    pub fn zoom_in(&mut self) {
        let span = self.history_range.span();
        if let Some(preset) = SPAN_PRESETS.iter().rev().find(|p| **p < span) {
            self.set_span(*preset);
        }
    }

    /// Widen the history range to the next larger span preset.
    pub fn zoom_out(&mut self) {
        let span = self.history_range.span();
        if let Some(preset) = SPAN_PRESETS.iter().find(|p| **p > span) {
            self.set_span(*preset);
        }
    }

    fn set_span(&mut self, span: Duration) {
        self.history_range = self.history_range.with_span(span);
        self.load_history();
    }

    /// Reload the device list from the store.
    pub fn refresh_devices(&mut self) {
        match self.store.list_devices() {
            Ok(devices) => {
                self.devices = devices;
                if let Some(index) = self.devices.iter().position(|d| *d == self.device_id) {
                    self.selected_device_index = index;
                } else if self.selected_device_index >= self.devices.len() {
                    self.selected_device_index = self.devices.len().saturating_sub(1);
                }
            }
            Err(e) => {
                warn!(error = %e, "listing devices failed");
                self.set_status_message(format!("Failed to list devices: {}", e));
            }
        }
    }

    fn refresh_device_info(&mut self) {
        self.device_info = self.store.device_info(&self.device_id).ok().flatten();
    }

    /// Switch to the device highlighted in the Devices view and show its
    /// live readings.
    pub fn select_current_device(&mut self) {
        if let Some(device_id) = self.devices.get(self.selected_device_index).cloned() {
            self.select_device(&device_id);
            self.set_view(View::Live);
        }
    }

    /// Switch to another device, dropping data loaded for the previous one.
    ///
    /// An open subscription is replaced by one for the new device.
    pub fn select_device(&mut self, device_id: &str) {
        if device_id == self.device_id {
            return;
        }

        let resubscribe = self.feed.is_some();
        self.stop_live();

        self.device_id = device_id.to_string();
        self.live = None;
        self.historical = None;
        self.load_error = None;
        self.selected_row = 0;
        self.refresh_device_info();

        if resubscribe {
            self.start_live();
            self.poll_live();
        }
        self.set_status_message(format!("Selected {}", self.device_id));
    }

    /// Switch to the next view (cycles through Live → History → Devices).
    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view.
    ///
    /// The realtime subscription only stays open while the Live view is shown.
    pub fn set_view(&mut self, view: View) {
        if view == self.current_view {
            return;
        }

        if self.current_view == View::Live {
            self.stop_live();
        }

        self.current_view = view;
        self.selected_row = 0;

        match view {
            View::Live => {
                self.start_live();
                self.poll_live();
            }
            View::History => {
                if self.historical.is_none() {
                    self.load_history();
                }
            }
            View::Devices => self.refresh_devices(),
        }
    }

    /// Reload whatever the current view shows.
    pub fn reload(&mut self) {
        match self.current_view {
            View::Live => {
                self.stop_live();
                self.start_live();
                self.poll_live();
            }
            View::History => self.load_history(),
            View::Devices => self.refresh_devices(),
        }
    }

    /// The reading set shown by the current view.
    pub fn displayed_set(&self) -> Option<&ReadingSet> {
        match self.current_view {
            View::Live => self.live.as_ref(),
            View::History => self.historical.as_ref(),
            View::Devices => None,
        }
    }

    /// Cycle the field plotted in the sparkline.
    pub fn cycle_field(&mut self) {
        self.selected_field = self.selected_field.next_tracked();
    }

    fn item_count(&self) -> usize {
        match self.current_view {
            View::Devices => self.devices.len(),
            _ => self.displayed_set().map_or(0, |s| s.len()),
        }
    }

    fn selected_index_mut(&mut self) -> &mut usize {
        match self.current_view {
            View::Devices => &mut self.selected_device_index,
            _ => &mut self.selected_row,
        }
    }

    fn clamp_selected_row(&mut self) {
        let count = self.displayed_set().map_or(0, |s| s.len());
        if self.selected_row >= count {
            self.selected_row = count.saturating_sub(1);
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.item_count().saturating_sub(1);
        let index = self.selected_index_mut();
        *index = (*index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        let index = self.selected_index_mut();
        *index = index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        *self.selected_index_mut() = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.item_count().saturating_sub(1);
        *self.selected_index_mut() = last;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.stop_live();
        self.running = false;
    }

    /// Export the readings on screen into the export directory and report
    /// the outcome in the status bar.
    pub fn export(&mut self, format: ExportFormat) {
        let readings = self
            .displayed_set()
            .or(self.live.as_ref())
            .or(self.historical.as_ref())
            .map(|s| s.readings.clone())
            .unwrap_or_default();

        match export_to_dir(&self.export_dir, &self.device_id, &readings, format) {
            Ok(path) => {
                self.set_status_message(format!(
                    "Exported {} readings to {}",
                    readings.len(),
                    path.display()
                ));
            }
            Err(e) => {
                self.set_status_message(format!("Export failed: {}", e));
            }
        }
    }
}
