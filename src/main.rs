use anyhow::Result;
use azurelite::app::App;
use azurelite::config::Config;
use azurelite::lifecycle::SimulatedBackend;
use azurelite::resource::{load_resources, sample_resources, Directory};
use azurelite::ui::splash::{render as render_splash, SplashState};
use azurelite::{event, ui};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Terminal dashboard for simulated cloud resources
#[derive(Parser, Debug)]
#[command(name = "azurelite", version, about, long_about = None)]
struct Args {
    /// Rows per page in the resource list
    #[arg(long)]
    page_size: Option<usize>,

    /// Load the initial inventory from a JSON file instead of the samples
    #[arg(long)]
    data: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Run in read-only mode (block all lifecycle actions)
    #[arg(long)]
    readonly: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("azurelite started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("azurelite").join("azurelite.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".azurelite").join("azurelite.log");
    }
    PathBuf::from("azurelite.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = initialize_with_splash(&mut terminal, &args).await;

    match result {
        Ok(Some(mut app)) => {
            let run_result = run_app(&mut terminal, &mut app).await;
            cleanup_terminal(&mut terminal)?;

            if let Err(err) = app.config.save() {
                tracing::warn!("Failed to save config: {}", err);
            }
            if let Err(err) = run_result {
                eprintln!("Error: {err:?}");
            }
        },
        Ok(None) => {
            cleanup_terminal(&mut terminal)?;
        },
        Err(err) => {
            cleanup_terminal(&mut terminal)?;
            eprintln!("Initialization error: {err:?}");
        },
    }

    Ok(())
}

fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn initialize_with_splash<B: Backend>(
    terminal: &mut Terminal<B>,
    args: &Args,
) -> Result<Option<App>>
where
    B::Error: Send + Sync + 'static,
{
    let mut splash = SplashState::new(3);
    terminal.draw(|f| render_splash(f, &splash))?;

    if check_abort()? {
        return Ok(None);
    }

    // Step 1: Configuration
    splash.set_message("Loading configuration");
    terminal.draw(|f| render_splash(f, &splash))?;
    let config = Config::load();
    let page_size = config.effective_page_size(args.page_size);
    tracing::info!("Page size: {}, delays: {:?}", page_size, config.delays);
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 2: Inventory
    let resources = match &args.data {
        Some(path) => {
            splash.set_message(&format!("Loading resources from {}", path.display()));
            terminal.draw(|f| render_splash(f, &splash))?;
            load_resources(path)?
        },
        None => {
            splash.set_message("Loading sample resources");
            terminal.draw(|f| render_splash(f, &splash))?;
            sample_resources()?
        },
    };
    tracing::info!("Loaded {} resources", resources.len());
    let directory = Directory::new(resources, page_size)?;
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 3: Operation backend
    splash.set_message("Starting operation scheduler");
    terminal.draw(|f| render_splash(f, &splash))?;
    let backend = Arc::new(SimulatedBackend::new(config.delays.to_delays()));
    splash.complete_step();

    splash.set_message("Ready!");
    terminal.draw(|f| render_splash(f, &splash))?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    Ok(Some(App::new(config, directory, backend, args.readonly)))
}

fn check_abort() -> Result<bool> {
    if poll(Duration::from_millis(50))? {
        if let Event::Key(key) = read()? {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::handle_events(app).await? {
            return Ok(());
        }

        app.process_completed_operations();
    }
}
