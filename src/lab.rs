use rand::rngs::StdRng;
use rand::Rng;
use std::sync::mpsc::Sender;
use tracing::{debug, warn};

use crate::clock::{next_duration, ClockEvent, SessionState};
use crate::error::ConfigurationError;
use crate::history::{History, HistoryRecord};
use crate::language::PoolRegistry;
use crate::runtime::{ClockTimer, FixedTicker, LabEvent, Ticker};
use crate::session::{Keystroke, Session, SessionConfig, SessionId, WordCommit};
use crate::word_generator::WordGenerator;

/// Owns the current session together with the timer that drives it.
///
/// Every configuration change or restart cancels the running timer and
/// installs a brand-new session under a fresh id, so a tick scheduled for
/// an old session can never touch the new one.
pub struct TypingLab<R: Rng = StdRng, T: Ticker = FixedTicker> {
    registry: PoolRegistry,
    generator: WordGenerator<R>,
    config: SessionConfig,
    session: Session,
    ticker: T,
    /// `None` means ticks are delivered by hand (headless use).
    tick_tx: Option<Sender<LabEvent>>,
    timer: Option<ClockTimer>,
    history: Option<History>,
    personal_best: Option<u32>,
}

impl<R: Rng, T: Ticker> TypingLab<R, T> {
    pub fn new(
        registry: PoolRegistry,
        mut generator: WordGenerator<R>,
        config: SessionConfig,
        ticker: T,
        tick_tx: Option<Sender<LabEvent>>,
    ) -> Result<Self, ConfigurationError> {
        let session = Session::create(SessionId(1), &config, &registry, &mut generator)?;
        Ok(Self {
            registry,
            generator,
            config,
            session,
            ticker,
            tick_tx,
            timer: None,
            history: None,
            personal_best: None,
        })
    }

    /// Enables the results log; the personal best is read from it.
    pub fn with_history(mut self, history: History) -> Self {
        self.history = Some(history);
        self.refresh_personal_best();
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    pub fn personal_best(&self) -> Option<u32> {
        self.personal_best
    }

    /// True while a live timer is driving the current session.
    pub fn has_active_timer(&self) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|t| !t.is_cancelled() && t.session() == self.session.id())
    }

    pub fn type_char(&mut self, c: char) -> Keystroke {
        let outcome = self.session.type_char(c);
        self.ensure_timer();
        outcome
    }

    pub fn backspace(&mut self) -> bool {
        self.session.backspace()
    }

    pub fn submit_word(&mut self, committed_text: &str) -> WordCommit {
        let outcome = self.session.submit_word(committed_text);
        self.ensure_timer();
        outcome
    }

    fn ensure_timer(&mut self) {
        if self.timer.is_some() || self.session.state() != SessionState::Running {
            return;
        }
        if let Some(tx) = &self.tick_tx {
            self.timer = Some(ClockTimer::spawn(&self.ticker, tx.clone(), self.session.id()));
        }
    }

    /// Applies one clock tick addressed to session `id`.
    pub fn on_tick(&mut self, id: SessionId) -> ClockEvent {
        if id != self.session.id() {
            debug!(stale = %id, current = %self.session.id(), "dropping tick for replaced session");
            return ClockEvent::Ignored;
        }
        let event = self.session.tick();
        if event == ClockEvent::Finished {
            self.stop_timer();
            self.record_result();
        }
        event
    }

    fn stop_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn record_result(&mut self) {
        let Some(result) = self.session.result() else {
            return;
        };
        let Some(history) = &self.history else {
            return;
        };
        let record = HistoryRecord::new(self.session.theme(), self.session.duration_secs(), &result);
        if let Err(e) = history.append(&record) {
            warn!(path = %history.path().display(), error = %e, "could not write results history");
        }
        self.personal_best = Some(self.personal_best.map_or(result.wpm, |pb| pb.max(result.wpm)));
    }

    fn refresh_personal_best(&mut self) {
        self.personal_best = match &self.history {
            Some(history) => history
                .personal_best(&self.config.theme, self.config.duration_secs)
                .unwrap_or_else(|e| {
                    warn!(error = %e, "could not read results history");
                    None
                }),
            None => None,
        };
    }

    /// Discards the current session for a fresh one with `config`. On a
    /// configuration error the current session is left untouched.
    fn replace_session(&mut self, config: SessionConfig) -> Result<(), ConfigurationError> {
        let next_id = self.session.id().next();
        let session = Session::create(next_id, &config, &self.registry, &mut self.generator)
            .inspect_err(|e| warn!(error = %e, "configuration rejected"))?;
        self.stop_timer();
        let changed = config != self.config;
        self.session = session;
        self.config = config;
        if changed {
            self.refresh_personal_best();
        }
        Ok(())
    }

    /// New session with the same theme and duration
    pub fn restart(&mut self) -> Result<(), ConfigurationError> {
        self.replace_session(self.config.clone())
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<(), ConfigurationError> {
        if theme == self.config.theme {
            return Ok(());
        }
        self.replace_session(SessionConfig::new(theme, self.config.duration_secs))
    }

    pub fn set_duration(&mut self, duration_secs: u32) -> Result<(), ConfigurationError> {
        if duration_secs == self.config.duration_secs {
            return Ok(());
        }
        self.replace_session(SessionConfig::new(self.config.theme.clone(), duration_secs))
    }

    pub fn cycle_theme(&mut self) -> Result<(), ConfigurationError> {
        match self.registry.next_theme(&self.config.theme) {
            Some(theme) => self.set_theme(&theme),
            None => Ok(()),
        }
    }

    pub fn cycle_duration(&mut self) -> Result<(), ConfigurationError> {
        self.set_duration(next_duration(self.config.duration_secs))
    }
}
