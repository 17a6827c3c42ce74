use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tracing::debug;

use crate::session::SessionId;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum LabEvent {
    Key(KeyEvent),
    Resize,
    /// One clock second elapsed for the tagged session.
    Tick(SessionId),
}

/// Source of terminal events (keyboard, resize, clock ticks)
pub trait LabEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<LabEvent, RecvTimeoutError>;

    /// Sender the clock timer pushes its ticks into.
    fn sender(&self) -> Sender<LabEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<LabEvent>,
    rx: Receiver<LabEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let key_tx = tx.clone();

        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if key_tx.send(LabEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if key_tx.send(LabEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { tx, rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LabEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<LabEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<LabEvent> {
        self.tx.clone()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// The one-second cadence of the session clock
    pub fn seconds() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    tx: Sender<LabEvent>,
    rx: Receiver<LabEvent>,
}

impl TestEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl Default for TestEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LabEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<LabEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<LabEvent> {
        self.tx.clone()
    }
}

/// Handle to a repeating tick thread bound to one session.
/// Dropping the handle cancels the timer and joins the thread.
#[derive(Debug)]
pub struct ClockTimer {
    session: SessionId,
    cancel_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ClockTimer {
    pub fn spawn<T: Ticker>(ticker: &T, tx: Sender<LabEvent>, session: SessionId) -> Self {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let interval = ticker.interval();

        // Wakes early (and exits) as soon as the cancel sender is dropped.
        let handle = thread::spawn(move || loop {
            match cancel_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if tx.send(LabEvent::Tick(session)).is_err() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        debug!(%session, ?interval, "clock timer started");

        Self {
            session,
            cancel_tx: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_tx.is_none()
    }

    pub fn cancel(&mut self) {
        let Some(cancel_tx) = self.cancel_tx.take() else {
            return;
        };
        drop(cancel_tx);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        debug!(session = %self.session, "clock timer cancelled");
    }
}

impl Drop for ClockTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: LabEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: LabEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to the poll interval; `None` when nothing arrived.
    pub fn step(&self) -> Option<LabEvent> {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn sender(&self) -> Sender<LabEvent> {
        self.event_source.sender()
    }
}
