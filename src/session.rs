use std::fmt;

use rand::Rng;
use tracing::{debug, info};

use crate::clock::{validate_duration, ClockEvent, SessionClock, SessionState};
use crate::error::ConfigurationError;
use crate::language::PoolRegistry;
use crate::scoring::{self, SessionResult, Submission};
use crate::time_series::TimeSeriesPoint;
use crate::word_generator::{WordGenerator, TARGET_WORD_COUNT};

/// Identity of one session; timer callbacks carry it so a superseded
/// session can never be ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(self) -> Self {
        SessionId(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub theme: String,
    pub duration_secs: u32,
}

impl SessionConfig {
    pub fn new<S: Into<String>>(theme: S, duration_secs: u32) -> Self {
        Self {
            theme: theme.into(),
            duration_secs,
        }
    }

    pub fn validate(&self, registry: &PoolRegistry) -> Result<(), ConfigurationError> {
        validate_duration(self.duration_secs)?;
        registry.get(&self.theme)?;
        Ok(())
    }
}

/// Outcome of committing a word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCommit {
    Recorded { is_correct: bool },
    /// Finished session, or no target word left.
    Ignored,
}

/// Outcome of a single keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Buffered,
    Committed { is_correct: bool },
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordStatus {
    Correct,
    Incorrect,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewWord {
    pub index: usize,
    pub text: String,
    pub status: WordStatus,
}

/// Everything a front-end needs to draw the session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub words: Vec<ViewWord>,
    pub cursor: usize,
    pub pending: String,
    /// False once the pending input stops being a prefix of the current word.
    pub pending_on_track: bool,
    pub remaining_secs: u32,
    pub state: SessionState,
    pub live_wpm: u32,
}

/// One timed attempt: target words, committed submissions and the countdown
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    theme: String,
    target_words: Vec<String>,
    submissions: Vec<Submission>,
    pending: String,
    clock: SessionClock,
    result: Option<SessionResult>,
    progress: Vec<TimeSeriesPoint>,
}

impl Session {
    pub fn new(
        id: SessionId,
        config: &SessionConfig,
        target_words: Vec<String>,
    ) -> Result<Self, ConfigurationError> {
        validate_duration(config.duration_secs)?;
        if target_words.is_empty() {
            return Err(ConfigurationError::EmptyPool(config.theme.clone()));
        }
        Ok(Self {
            id,
            theme: config.theme.clone(),
            target_words,
            submissions: Vec::new(),
            pending: String::new(),
            clock: SessionClock::new(config.duration_secs),
            result: None,
            progress: Vec::new(),
        })
    }

    /// Validates `config` and fills the session with a fresh word stream.
    pub fn create<R: Rng>(
        id: SessionId,
        config: &SessionConfig,
        registry: &PoolRegistry,
        generator: &mut WordGenerator<R>,
    ) -> Result<Self, ConfigurationError> {
        config.validate(registry)?;
        let words = generator.generate(registry, &config.theme, TARGET_WORD_COUNT)?;
        let session = Self::new(id, config, words)?;
        debug!(session = %id, theme = %config.theme, duration = config.duration_secs, "session created");
        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn duration_secs(&self) -> u32 {
        self.clock.duration_secs()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.clock.remaining_secs()
    }

    pub fn state(&self) -> SessionState {
        self.clock.state()
    }

    pub fn target_words(&self) -> &[String] {
        &self.target_words
    }

    /// Index of the expected word. Always equal to the number of submissions.
    pub fn cursor(&self) -> usize {
        self.submissions.len()
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn result(&self) -> Option<SessionResult> {
        self.result
    }

    pub fn progress(&self) -> &[TimeSeriesPoint] {
        &self.progress
    }

    pub fn current_word(&self) -> Option<&str> {
        self.target_words.get(self.cursor()).map(String::as_str)
    }

    fn start_clock(&mut self) {
        if self.clock.on_first_keystroke() {
            debug!(session = %self.id, "clock started");
        }
    }

    /// Commits `committed_text` against the current target word. A
    /// not-yet-started session starts its clock; a finished one ignores it.
    pub fn submit_word(&mut self, committed_text: &str) -> WordCommit {
        if self.clock.is_finished() {
            debug!(session = %self.id, "submission after finish ignored");
            return WordCommit::Ignored;
        }
        self.start_clock();

        let Some(expected) = self.target_words.get(self.cursor()) else {
            return WordCommit::Ignored;
        };
        let submission = Submission::evaluate(committed_text.trim_end(), expected);
        let is_correct = submission.is_correct;
        self.submissions.push(submission);
        WordCommit::Recorded { is_correct }
    }

    /// Feeds one typed character. Whitespace commits the pending word.
    pub fn type_char(&mut self, c: char) -> Keystroke {
        if self.clock.is_finished() {
            return Keystroke::Ignored;
        }
        if c.is_whitespace() {
            if self.pending.is_empty() {
                return Keystroke::Ignored;
            }
            let committed = std::mem::take(&mut self.pending);
            return match self.submit_word(&committed) {
                WordCommit::Recorded { is_correct } => Keystroke::Committed { is_correct },
                WordCommit::Ignored => Keystroke::Ignored,
            };
        }
        self.start_clock();
        self.pending.push(c);
        Keystroke::Buffered
    }

    /// Removes the last pending character; committed words stay committed.
    pub fn backspace(&mut self) -> bool {
        if self.clock.is_finished() {
            return false;
        }
        self.pending.pop().is_some()
    }

    /// Advances the countdown by one second, scoring the session when it hits zero.
    pub fn tick(&mut self) -> ClockEvent {
        let event = self.clock.tick();
        match event {
            ClockEvent::Ignored => {}
            ClockEvent::Counted { .. } => self.sample_progress(),
            ClockEvent::Finished => {
                self.sample_progress();
                self.finalize();
            }
        }
        event
    }

    fn sample_progress(&mut self) {
        let elapsed = self.clock.elapsed_secs() as f64;
        let correct = scoring::correct_character_count(&self.submissions);
        self.progress
            .push(TimeSeriesPoint::new(elapsed, scoring::net_wpm(correct, elapsed)));
    }

    /// Computes the result once the clock has finished; later calls return
    /// the cached value. `None` while the session is still open.
    pub fn finalize(&mut self) -> Option<SessionResult> {
        if !self.clock.is_finished() {
            return None;
        }
        if self.result.is_none() {
            let result = scoring::finalize(
                &self.submissions,
                self.clock.duration_secs(),
                self.clock.remaining_secs(),
            );
            info!(
                session = %self.id,
                theme = %self.theme,
                wpm = result.wpm,
                accuracy = result.accuracy_percent,
                correct_chars = result.correct_character_count,
                "session finished"
            );
            self.result = Some(result);
        }
        self.result
    }

    /// Running net wpm over the seconds counted so far
    pub fn live_wpm(&self) -> u32 {
        if let Some(result) = self.result {
            return result.wpm;
        }
        let correct = scoring::correct_character_count(&self.submissions);
        scoring::net_wpm(correct, self.clock.elapsed_secs() as f64).round() as u32
    }

    /// Window of `before` completed words and `after` upcoming words around the cursor.
    pub fn view(&self, before: usize, after: usize) -> SessionView {
        let cursor = self.cursor();
        let start = cursor.saturating_sub(before);
        let end = cursor
            .saturating_add(after)
            .saturating_add(1)
            .min(self.target_words.len());

        let words = (start..end)
            .map(|index| {
                let status = match self.submissions.get(index) {
                    Some(s) if s.is_correct => WordStatus::Correct,
                    Some(_) => WordStatus::Incorrect,
                    None if index == cursor => WordStatus::Current,
                    None => WordStatus::Upcoming,
                };
                ViewWord {
                    index,
                    text: self.target_words[index].clone(),
                    status,
                }
            })
            .collect();

        SessionView {
            words,
            cursor,
            pending: self.pending.clone(),
            pending_on_track: self
                .current_word()
                .is_some_and(|w| w.starts_with(self.pending.as_str())),
            remaining_secs: self.clock.remaining_secs(),
            state: self.clock.state(),
            live_wpm: self.live_wpm(),
        }
    }
}
