// BMI Tracker - Core Library
// Exposes the tracker core for the binary and tests

pub mod classify;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod session;
pub mod store;
pub mod validate;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export commonly used types
pub use classify::{classify, Category, Classification};
pub use config::Config;
pub use display::{DisplayAdapter, Emphasis, Key, PlainDisplay, ScreenLine};
pub use error::{ConfigError, StoreError, ValidationError};
pub use session::{Session, State, DEFAULT_HISTORY_LIMIT};
pub use store::{Record, RecordStore, SqliteStore};
pub use validate::{normalize, Measurements, RawInput};

#[cfg(feature = "tui")]
pub use tui::TerminalDisplay;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
