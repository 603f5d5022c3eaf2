//! Core utilities and types shared across all nwalign crates

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{check_penalty, load_config, save_config, AlignmentConfig, Config, OutputConfig};
pub use error::{NwError, NwResult};

/// Version information for the nwalign project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
