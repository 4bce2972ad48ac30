//! Root of the `roster-core` library.

// Library code reports through `tracing`; only the binary prints.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod models_manager;

pub use config::Config;
pub use config::ConfigError;
pub use config::ConfigOverrides;
pub use models_manager::ModelsManager;
pub use roster_protocol::CandidateModel;
