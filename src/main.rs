// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use soilwatch_types::Field;

mod app;
mod config;
mod data;
mod events;
mod export;
mod logging;
mod store;
mod ui;

use app::{App, AppOptions, View};
use crate::config::Settings;
use data::duration::parse_span;
use data::range::{now_ms, parse_instant, Bound};
use data::{compute_stats, TimeRange};
use export::ExportFormat;
use store::{FileStore, ReadingStore, StreamStore};

/// Datastore export read when neither a file nor a relay is configured.
const DEFAULT_FILE: &str = "soil.json";

#[derive(Parser, Debug)]
#[command(name = "soilwatch")]
#[command(about = "Terminal dashboard for soil sensor telemetry")]
struct Args {
    /// Path to a datastore JSON export
    #[arg(short, long, conflicts_with = "connect")]
    file: Option<PathBuf>,

    /// Connect to a TCP relay streaming device snapshots (host:port)
    #[arg(short, long, conflicts_with_all = ["export", "list_devices"])]
    connect: Option<String>,

    /// Device to show
    #[arg(short, long)]
    device: Option<String>,

    /// Config file (defaults to ./soilwatch.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of readings shown in the Live view
    #[arg(short, long)]
    window: Option<usize>,

    /// Refresh interval in milliseconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// History span ending now (e.g., "24h", "7d")
    #[arg(short, long, conflicts_with = "from")]
    since: Option<String>,

    /// Start of the history range (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    from: Option<String>,

    /// End of the history range (defaults to now)
    #[arg(long, requires = "from")]
    to: Option<String>,

    /// Export the history range to a file (.csv or .json) and exit
    #[arg(short, long, conflicts_with = "list_devices")]
    export: Option<PathBuf>,

    /// Print the devices in the store and exit
    #[arg(long)]
    list_devices: bool,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Command-line flags take precedence over configuration.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref device) = self.device {
            settings.device = device.clone();
        }
        if let Some(window) = self.window {
            settings.window = window;
        }
        if let Some(refresh) = self.refresh {
            settings.refresh_ms = refresh;
        }
        if let Some(ref file) = self.file {
            settings.store.file = Some(file.clone());
            settings.store.connect = None;
        }
        if let Some(ref addr) = self.connect {
            settings.store.connect = Some(addr.clone());
            settings.store.file = None;
        }
        if let Some(ref log_file) = self.log_file {
            settings.log.file = Some(log_file.clone());
        }
    }

    fn is_interactive(&self) -> bool {
        self.export.is_none() && !self.list_devices
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);

    logging::init(&settings.log, args.is_interactive())?;

    let range = history_range(&args, &settings, now_ms())?;
    tracing::debug!(range = %range.label(), device = %settings.device, "starting");

    // Handle TCP connection mode
    if let Some(ref addr) = settings.store.connect {
        if !args.is_interactive() {
            bail!("--export and --list-devices need a datastore file (--file)");
        }
        return run_with_tcp(addr, app_options(&settings, range), settings.refresh_interval());
    }

    let path = settings.store.file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_FILE));
    let store = FileStore::new(&path);

    // Handle non-interactive modes
    if args.list_devices {
        return list_devices(&store);
    }
    if let Some(ref export_path) = args.export {
        return export_range(&store, &settings.device, &range, export_path);
    }

    // Default: file-based mode
    run_tui(Box::new(store), app_options(&settings, range), settings.refresh_interval())
}

/// Resolve the history range from `--from`/`--to`, `--since`, or the
/// configured span.
fn history_range(args: &Args, settings: &Settings, now: i64) -> Result<TimeRange> {
    if let Some(ref from) = args.from {
        let start = parse_instant(from, Bound::Start)?;
        let end = match args.to {
            Some(ref to) => parse_instant(to, Bound::End)?,
            None => now,
        };
        if start > end {
            bail!("--from {} is after --to", from);
        }
        return Ok(TimeRange::new(start, end));
    }

    let span = match args.since {
        Some(ref since) => parse_span(since).with_context(|| format!("Invalid --since: {}", since))?,
        None => settings.history_span()?,
    };
    Ok(TimeRange::last(span, now))
}

fn app_options(settings: &Settings, history_range: TimeRange) -> AppOptions {
    AppOptions {
        device_id: settings.device.clone(),
        window: settings.window,
        history_range,
        export_dir: settings.export_dir.clone(),
        theme: ui::Theme::auto_detect(),
    }
}

/// Run with a TCP stream store
fn run_with_tcp(addr: &str, options: AppOptions, refresh: Duration) -> Result<()> {
    // Build a tokio runtime for the TCP connection
    let rt = tokio::runtime::Runtime::new()?;

    let store = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                println!("Connected!");
                Ok(Box::new(StreamStore::spawn(stream, addr)) as Box<dyn ReadingStore>)
            }
            Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e)),
        }
    })?;

    // The runtime keeps ingesting in the background while the TUI runs
    run_tui(store, options, refresh)
}

/// Run the TUI with the given store
fn run_tui(store: Box<dyn ReadingStore>, options: AppOptions, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(store, options);
    app.start();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 80;
    const MIN_HEIGHT: u16 = 20;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered =
                    ratatui::layout::Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5)
                        .intersection(area);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(16),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Live => ui::live::render(frame, app, chunks[2]),
                View::History => ui::history::render(frame, app, chunks[2]),
                View::Devices => ui::devices::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Poll the live feed periodically
        if last_refresh.elapsed() >= refresh_interval {
            app.tick();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Print the devices in the store, one per line
fn list_devices(store: &dyn ReadingStore) -> Result<()> {
    for device_id in store.list_devices()? {
        match store.device_info(&device_id)?.and_then(|info| info.name) {
            Some(name) => println!("{}\t{}", device_id, name),
            None => println!("{}", device_id),
        }
    }
    Ok(())
}

/// Export a device's readings over `range` and print a summary
fn export_range(store: &dyn ReadingStore, device_id: &str, range: &TimeRange, path: &Path) -> Result<()> {
    let readings = store.query_range(device_id, range)?;
    export::export_to_file(path, device_id, &readings, ExportFormat::from_path(path))?;

    println!(
        "Exported {} readings for {} ({}) to: {}",
        readings.len(),
        device_id,
        range.label(),
        path.display()
    );

    if let Some(stats) = compute_stats(&readings) {
        for field in Field::TRACKED {
            if let Some(s) = stats.get(field) {
                println!(
                    "  {:<12} avg {:>8}  min {:>8}  max {:>8}",
                    field.label(),
                    field.format(s.avg),
                    field.format(s.min),
                    field.format(s.max)
                );
            }
        }
    }
    Ok(())
}
