// ABOUTME: Main entry point for the dockdeck TUI application

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, Terminal};
use std::{
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::info;

use dockdeck::api::ApiClient;
use dockdeck::app::{App, EventHandler};
use dockdeck::components::LayoutComponent;
use dockdeck::config::{user_dir, AppConfig, ClientStore, FileStore};
use dockdeck::terminal::WsConnector;

#[derive(Debug, Parser)]
#[command(name = "dockdeck", version, about = "Terminal console for Docker hosts and Kubernetes clusters")]
struct Cli {
    /// Backend base URL, e.g. http://localhost:8080
    #[arg(long)]
    server: Option<String>,

    /// Docker host id to start on
    #[arg(long)]
    host: Option<i64>,

    /// Extra config file, applied before ~/.dockdeck/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the persisted client state
    #[arg(long)]
    state_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();
    setup_panic_handler();

    let mut config = match &cli.config {
        Some(path) => {
            let mut paths = vec![path.clone()];
            paths.extend(AppConfig::config_paths());
            AppConfig::load_from(&paths)?
        }
        None => AppConfig::load()?,
    };
    if let Some(server) = cli.server {
        config.server.base_url = server.trim_end_matches('/').to_string();
    }
    info!("Using backend {}", config.server.base_url);

    let state_dir = match cli.state_dir {
        Some(dir) => dir,
        None => user_dir()?,
    };
    let store = FileStore::in_dir(state_dir);
    if let Some(host_id) = cli.host {
        let mut state = store.load();
        state.active_host_id = host_id;
        store.save(&state)?;
    }

    let client = ApiClient::http(&config.server.base_url, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let connector = Arc::new(WsConnector::new(config.connect_timeout()));

    let mut app = App::new(config, client, connector, Arc::new(store));
    app.init();
    let mut layout = LayoutComponent::new();

    run_tui(&mut app, &mut layout)?;

    Ok(())
}

fn run_tui(app: &mut App, layout: &mut LayoutComponent) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    app.state.on_screen_resize(size.width, size.height);

    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    let result = loop {
        if let Err(e) = terminal.draw(|frame| layout.render(frame, &app.state)) {
            break Err(e.into());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key_event)) if key_event.kind == KeyEventKind::Press => {
                    if let Some(app_event) =
                        EventHandler::handle_key_event(key_event, &mut app.state)
                    {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
                Ok(Event::Resize(cols, rows)) => app.state.on_screen_resize(cols, rows),
                Ok(Event::Paste(text)) => {
                    for app_event in EventHandler::handle_paste(&text, &app.state) {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }

        // Session output and finished tasks are drained between key presses too
        app.tick();
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.state.should_quit {
            break Ok(());
        }
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = user_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| PathBuf::from(".dockdeck/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "dockdeck-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    // Without a log file the TUI still runs; stderr would corrupt the screen
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dockdeck=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        let _ = disable_raw_mode();
        let _ = execute!(
            std::io::stderr(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
