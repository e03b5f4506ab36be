//! Keeps locally persisted reference data (currencies and language names)
//! in sync with their upstream sources without ever losing existing entries.

pub mod artifact;
pub mod commit;
pub mod config;
pub mod currency;
pub mod error;
pub mod fetch;
pub mod locale;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod retry;

pub use commit::ExitSignal;
pub use config::Config;
pub use error::{Result, SyncError};
