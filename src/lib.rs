// Library surface for the binary, headless/integration tests and reuse.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod lab;
pub mod language;
pub mod logging;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod time_series;
pub mod word_generator;

pub use clock::{ClockEvent, SessionClock, SessionState};
pub use error::{ConfigurationError, LabError, LabResult};
pub use lab::TypingLab;
pub use language::{PoolRegistry, WordPool};
pub use scoring::{SessionResult, Submission};
pub use session::{Session, SessionConfig, SessionId, SessionView};
pub use word_generator::WordGenerator;
