mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};
use typelab::{
    clock::{validate_duration, SessionState},
    config::{Config, ConfigStore, FileConfigStore},
    history::History,
    logging::init_file_logging,
    runtime::{CrosstermEventSource, FixedTicker, LabEvent, LabEventSource, Runner, Ticker},
    ConfigurationError, PoolRegistry, TypingLab, WordGenerator,
};

const POLL_INTERVAL_MS: u64 = 100;

/// timed typing lab: themed word streams, countdown sessions and net wpm scoring
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing test for the terminal. The countdown starts on your first keystroke; each space commits a word, and only correctly typed words count toward your net wpm."
)]
pub struct Cli {
    /// word pool to draw the target text from
    #[clap(short = 't', long)]
    theme: Option<String>,

    /// session length in seconds (15, 30 or 60)
    #[clap(short = 'd', long, value_parser = parse_duration)]
    duration: Option<u32>,

    /// seed for a repeatable word stream
    #[clap(long)]
    seed: Option<u64>,

    /// write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// log at debug level (requires --log-file)
    #[clap(short = 'v', long)]
    verbose: bool,

    /// do not record results or show personal bests
    #[clap(long)]
    no_history: bool,

    /// print the available themes and exit
    #[clap(long)]
    list_themes: bool,
}

fn parse_duration(raw: &str) -> Result<u32, String> {
    let secs: u32 = raw.parse().map_err(|e| format!("{e}"))?;
    validate_duration(secs).map_err(|e| e.to_string())
}

pub struct App {
    pub lab: TypingLab,
    pub config_store: Option<FileConfigStore>,
    /// Last configuration problem, shown until the next successful change.
    pub notice: Option<String>,
}

impl App {
    pub fn new(lab: TypingLab, config_store: Option<FileConfigStore>) -> Self {
        Self {
            lab,
            config_store,
            notice: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.lab.session().state() == SessionState::Finished
    }

    fn apply(&mut self, change: Result<(), ConfigurationError>) {
        match change {
            Ok(()) => {
                self.notice = None;
                self.persist_config();
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    fn persist_config(&self) {
        if let Some(store) = &self.config_store {
            if let Err(e) = store.save(&Config::from(self.lab.config())) {
                warn!(path = %store.path().display(), error = %e, "could not save config");
            }
        }
    }

    /// Applies a key press. Returns false when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('c') if ctrl => return false,
            KeyCode::Char('t') if ctrl => {
                let change = self.lab.cycle_theme();
                self.apply(change);
            }
            KeyCode::Char('d') if ctrl => {
                let change = self.lab.cycle_duration();
                self.apply(change);
            }
            KeyCode::Tab => {
                let change = self.lab.restart();
                self.apply(change);
            }
            KeyCode::Char('r') if self.is_finished() => {
                let change = self.lab.restart();
                self.apply(change);
            }
            KeyCode::Backspace => {
                self.lab.backspace();
            }
            KeyCode::Char(c) if !ctrl => {
                self.lab.type_char(c);
            }
            _ => {}
        }
        true
    }

    /// Routes one runtime event. Returns false when the app should quit.
    pub fn handle_event(&mut self, event: LabEvent) -> bool {
        match event {
            LabEvent::Key(key) => self.handle_key(key),
            LabEvent::Tick(id) => {
                self.lab.on_tick(id);
                true
            }
            LabEvent::Resize => true,
        }
    }
}

/// Resolves the session configuration: CLI over stored values, falling
/// back to defaults when a stale stored value no longer validates.
fn resolve_config(cli: &Cli, stored: Config, registry: &PoolRegistry) -> Result<Config, ConfigurationError> {
    let merged = stored.merged(cli.theme.clone(), cli.duration);
    match merged.session_config().validate(registry) {
        Ok(()) => Ok(merged),
        Err(e) if cli.theme.is_none() && cli.duration.is_none() => {
            warn!(error = %e, "stored config is invalid, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_file_logging(path, cli.verbose)?;
    }

    let registry = PoolRegistry::builtin()?;

    if cli.list_themes {
        println!("{}", registry.themes().iter().join("\n"));
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = match resolve_config(&cli, store.load(), &registry) {
        Ok(config) => config,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e.to_string()).exit();
        }
    };
    info!(theme = %config.theme, duration = config.duration_secs, "starting typelab");

    let generator = match cli.seed {
        Some(seed) => WordGenerator::seeded(seed),
        None => WordGenerator::from_entropy(),
    };

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(POLL_INTERVAL_MS)),
    );
    let mut lab = TypingLab::new(
        registry,
        generator,
        config.session_config(),
        FixedTicker::seconds(),
        Some(runner.sender()),
    )?;
    if !cli.no_history {
        if let Some(history) = History::default_location() {
            lab = lab.with_history(history);
        }
    }
    let mut app = App::new(lab, Some(store));
    app.persist_config();

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = run_app(&mut terminal, &mut app, &runner);

    // The session timer is cancelled before the terminal is handed back.
    drop(app);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn run_app<B: Backend, E: LabEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let Some(event) = runner.step() else {
            continue;
        };
        if !app.handle_event(event) {
            break;
        }
    }
    Ok(())
}
