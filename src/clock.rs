use crate::error::ConfigurationError;

/// Countdown lengths a session may be configured with
pub const DURATION_CHOICES: [u32; 3] = [15, 30, 60];

pub const DEFAULT_DURATION_SECS: u32 = 30;

/// Lifecycle of one timed attempt. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    Running,
    Finished,
}

/// What a single `tick` did to the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// Not running; nothing changed.
    Ignored,
    /// One second counted, time still left.
    Counted { remaining_secs: u32 },
    /// The countdown hit zero. Emitted exactly once per clock run.
    Finished,
}

pub fn validate_duration(secs: u32) -> Result<u32, ConfigurationError> {
    if secs == 0 || !DURATION_CHOICES.contains(&secs) {
        return Err(ConfigurationError::InvalidDuration(secs));
    }
    Ok(secs)
}

/// The allowed duration after `secs`, wrapping around.
pub fn next_duration(secs: u32) -> u32 {
    let idx = DURATION_CHOICES.iter().position(|&d| d == secs);
    match idx {
        Some(i) => DURATION_CHOICES[(i + 1) % DURATION_CHOICES.len()],
        None => DURATION_CHOICES[0],
    }
}

/// One-second countdown that starts on the first keystroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    duration_secs: u32,
    remaining_secs: u32,
    state: SessionState,
}

impl SessionClock {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            state: SessionState::NotStarted,
        }
    }

    /// Starts the countdown. Returns false (and changes nothing) unless
    /// the clock had not started yet.
    pub fn on_first_keystroke(&mut self) -> bool {
        if self.state != SessionState::NotStarted {
            return false;
        }
        self.remaining_secs = self.duration_secs;
        self.state = SessionState::Running;
        true
    }

    pub fn tick(&mut self) -> ClockEvent {
        if self.state != SessionState::Running {
            return ClockEvent::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = SessionState::Finished;
            ClockEvent::Finished
        } else {
            ClockEvent::Counted {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Back to a full, stopped countdown of `duration_secs`. Valid from any state.
    pub fn reset(&mut self, duration_secs: u32) {
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.state = SessionState::NotStarted;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Seconds left. Reads as the full duration until the clock starts.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Whole seconds counted down so far
    pub fn elapsed_secs(&self) -> u32 {
        self.duration_secs - self.remaining_secs
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_is_stopped_at_full_duration() {
        let clock = SessionClock::new(30);

        assert_eq!(clock.state(), SessionState::NotStarted);
        assert_eq!(clock.remaining_secs(), 30);
        assert_eq!(clock.elapsed_secs(), 0);
    }

    #[test]
    fn tick_before_start_is_ignored() {
        let mut clock = SessionClock::new(15);

        assert_eq!(clock.tick(), ClockEvent::Ignored);
        assert_eq!(clock.remaining_secs(), 15);
    }

    #[test]
    fn first_keystroke_is_idempotent() {
        let mut clock = SessionClock::new(15);

        assert!(clock.on_first_keystroke());
        clock.tick();
        assert!(!clock.on_first_keystroke());

        assert_eq!(clock.state(), SessionState::Running);
        assert_eq!(clock.remaining_secs(), 14);
    }

    #[test]
    fn counts_down_and_finishes_once() {
        let mut clock = SessionClock::new(15);
        clock.on_first_keystroke();

        for expected in (1..15).rev() {
            assert_eq!(
                clock.tick(),
                ClockEvent::Counted {
                    remaining_secs: expected
                }
            );
        }
        assert_eq!(clock.tick(), ClockEvent::Finished);
        assert!(clock.is_finished());
        assert_eq!(clock.remaining_secs(), 0);
        assert_eq!(clock.elapsed_secs(), 15);

        assert_eq!(clock.tick(), ClockEvent::Ignored);
        assert_eq!(clock.remaining_secs(), 0);
        assert!(!clock.on_first_keystroke());
    }

    #[test]
    fn reset_from_any_state() {
        let mut clock = SessionClock::new(15);
        clock.on_first_keystroke();
        for _ in 0..15 {
            clock.tick();
        }
        assert!(clock.is_finished());

        clock.reset(60);

        assert_eq!(clock.state(), SessionState::NotStarted);
        assert_eq!(clock.remaining_secs(), 60);
        assert_eq!(clock.duration_secs(), 60);
    }

    #[test]
    fn duration_allow_list() {
        assert_eq!(validate_duration(30), Ok(30));
        assert_eq!(
            validate_duration(0),
            Err(ConfigurationError::InvalidDuration(0))
        );
        assert_eq!(
            validate_duration(45),
            Err(ConfigurationError::InvalidDuration(45))
        );
    }

    #[test]
    fn durations_cycle() {
        assert_eq!(next_duration(15), 30);
        assert_eq!(next_duration(30), 60);
        assert_eq!(next_duration(60), 15);
        assert_eq!(next_duration(7), 15);
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::NotStarted.to_string(), "not_started");
        assert_eq!(SessionState::Running.to_string(), "running");
    }
}
