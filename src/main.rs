use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use formpilot::{
    app::App,
    clock::{Clock, SystemClock},
    config::{default_log_path, Config, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, Runner, WizardEvent},
    tracker::{EventSink, Tracker},
    transport::{HttpTransport, NullTransport, Transport},
    ui::screen::current_screen,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// multi-step form wizard that reports interaction telemetry to a collector
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A four-step terminal form wizard (personal, address, preferences, review) that reports page loads, clicks, field errors, idle periods, backtracking, section timing and submission to an HTTP collector."
)]
pub struct Cli {
    /// collector base address; events are posted to <url>/log-event
    #[clap(short = 'u', long)]
    collector_url: Option<String>,

    /// milliseconds of inactivity before an idle event is reported
    #[clap(short = 'i', long)]
    idle_threshold_ms: Option<u64>,

    /// event loop tick interval in milliseconds
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// do not send any telemetry
    #[clap(long)]
    no_telemetry: bool,

    /// path of the JSON config file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// diagnostic log file (the terminal is owned by the form)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// persist the effective settings to the config file before starting
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command-line flags on the stored configuration
    fn apply(&self, cfg: &mut Config) {
        if let Some(url) = &self.collector_url {
            cfg.collector_base_url = url.clone();
        }
        if let Some(ms) = self.idle_threshold_ms {
            cfg.idle_threshold_ms = ms;
        }
        if let Some(ms) = self.tick_rate_ms {
            cfg.tick_rate_ms = ms;
        }
        if self.no_telemetry {
            cfg.telemetry_enabled = false;
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = cli.config_store();
    let mut config = store.load();
    cli.apply(&mut config);
    if cli.save_config {
        store.save(&config)?;
    }

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path)?;
    info!(collector = %config.collector_base_url, telemetry = config.telemetry_enabled, "starting");

    let transport: Box<dyn Transport> = if config.telemetry_enabled {
        Box::new(HttpTransport::new(
            &config.collector_base_url,
            config.request_timeout(),
        ))
    } else {
        Box::new(NullTransport)
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let tracker = Tracker::new(transport, clock.clone());
    let mut app = App::new(tracker, clock, config.idle_threshold_ms);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &config);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(
        step = app.wizard.current_step(),
        submitted = app.wizard.state().is_submitted(),
        "exiting"
    );
    result
}

fn start_tui<B: Backend, S: EventSink>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.tick_rate()),
    );

    terminal.draw(|f| current_screen(app.screen()).render(app.screen(), f))?;

    loop {
        let event = runner.step();
        let redraw = !matches!(event, WizardEvent::Tick);
        app.handle_event(event);

        if app.should_quit() {
            break;
        }
        if redraw {
            terminal.draw(|f| current_screen(app.screen()).render(app.screen(), f))?;
        }
    }

    Ok(())
}
