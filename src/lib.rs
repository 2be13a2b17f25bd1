pub mod assistant;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod geo;
pub mod metrics;
pub mod session;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use dashboard::{Dashboard, launch};
pub use error::{BriefingError, Result};
