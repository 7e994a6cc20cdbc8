mod app;
mod cli;
mod commands;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;
mod ui;

use anyhow::Context;
use app::{App, RefreshRequest, Screen};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::{ConfiguredLocation, OpenWeatherMapClient, SpotifyClient};
use logic::refresh::{full_refresh, repick};
use logic::{RefreshOutcome, SituationService, WeatherService};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use ui::screens::{LibraryScreen, WeatherScreen};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The TUI owns the terminal, so it logs to a file instead
    init_logging(cli.verbose, cli.command.is_none(), cli.data_dir.as_ref())?;

    if matches!(cli.command, Some(Commands::Init)) {
        Config::setup_interactive().context("Setup failed")?;
        return Ok(());
    }

    let config = if Config::exists(cli.config.as_ref()) {
        Config::load(cli.config.clone()).context("Configuration error")?
    } else {
        Config::setup_interactive().context("Setup failed")?.0
    };
    tracing::debug!(?config, "Loaded configuration");

    let store = db::open_store(&config, cli.data_dir.as_ref())
        .await
        .context("Failed to open datastore")?;

    let weather = Arc::new(WeatherService::new(
        Arc::new(ConfiguredLocation::new(config.location.clone())),
        Arc::new(OpenWeatherMapClient::new(config.openweathermap.clone())),
    ));
    let situations = Arc::new(SituationService::new(
        store.clone(),
        config.matching.candidate_limit,
    ));

    match cli.command {
        Some(Commands::Init) => Ok(()),
        Some(Commands::Check) => commands::handle_check(&config, store).await,
        Some(Commands::Match { json, hour }) => {
            commands::handle_match(&weather, &situations, json, hour).await
        }
        Some(Commands::Situation(cmd)) => commands::handle_situation(store.as_ref(), cmd).await,
        Some(Commands::Music(cmd)) => {
            commands::handle_music(store.as_ref(), &SpotifyClient::new(), cmd).await
        }
        Some(Commands::Clothing(cmd)) => commands::handle_clothing(store.as_ref(), cmd).await,
        Some(Commands::Assign(cmd)) => commands::handle_assign(store.as_ref(), cmd).await,
        Some(Commands::Unassign(cmd)) => commands::handle_unassign(store.as_ref(), cmd).await,
        None => run_tui(weather, situations).await,
    }
}

fn init_logging(verbose: u8, to_file: bool, data_dir: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    if to_file {
        let path = Config::log_path(data_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Cannot open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

async fn run_tui(
    weather: Arc<WeatherService>,
    situations: Arc<SituationService>,
) -> anyhow::Result<()> {
    let mut app = App::new();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, weather, situations).await;

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

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    weather: Arc<WeatherService>,
    situations: Arc<SituationService>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<RefreshOutcome>();
    let backend_name = situations.store().backend_name();
    let mut library_stale = true;

    loop {
        // Start any requested refresh in the background
        if let Some((request, generation)) = app.begin_refresh() {
            let tx = tx.clone();
            let weather = weather.clone();
            let situations = situations.clone();
            tokio::spawn(async move {
                let outcome = match request {
                    RefreshRequest::Full => full_refresh(&weather, &situations, generation).await,
                    RefreshRequest::Repick(observed) => {
                        repick(&situations, observed, generation).await
                    }
                };
                // Receiver is gone once the app quits
                let _ = tx.send(outcome);
            });
        }

        while let Ok(outcome) = rx.try_recv() {
            app.apply_outcome(outcome);
        }

        if app.screen == Screen::Library && library_stale {
            match situations.store().list_situations().await {
                Ok(list) => app.set_library(list),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load situation library");
                    app.set_status(&format!("Library load failed: {}", e));
                }
            }
            library_stale = false;
        }

        terminal.draw(|f| {
            let area = f.area();

            match app.screen {
                Screen::Weather => {
                    let screen = WeatherScreen::new(app.weather.as_ref(), &app.lookup)
                        .with_error(app.weather_error.as_deref())
                        .with_refreshing(app.refreshing)
                        .with_status(app.status_message.as_deref());
                    f.render_widget(screen, area);
                }
                Screen::Library => {
                    let screen = LibraryScreen::new(&app.library)
                        .with_selection(app.library_state.selected_index)
                        .with_backend(backend_name);
                    f.render_widget(screen, area);
                }
            }
        })?;

        // Handle input with timeout so refresh results get picked up
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => app.quit(),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    KeyCode::Esc => app.switch_screen(Screen::Weather),
                    KeyCode::Char(c) => match Screen::from_key(c) {
                        Some(screen) => {
                            if screen == Screen::Library {
                                library_stale = true;
                            }
                            app.switch_screen(screen);
                        }
                        None => library_stale |= handle_screen_input(app, key.code),
                    },
                    code => library_stale |= handle_screen_input(app, code),
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Returns true when the library should be reloaded.
fn handle_screen_input(app: &mut App, code: KeyCode) -> bool {
    match app.screen {
        Screen::Weather => {
            match code {
                KeyCode::Char('r') => app.request_refresh(),
                KeyCode::Char('n') => app.request_repick(),
                _ => {}
            }
            false
        }
        Screen::Library => {
            let count = app.library.len();
            match code {
                KeyCode::Up => app.library_state.prev(),
                KeyCode::Down => app.library_state.next(count),
                KeyCode::Char('r') => return true,
                _ => {}
            }
            false
        }
    }
}
