//! ReviewFlow Common Library
//!
//! Shared code for the ReviewFlow services including:
//! - Database models and repository pattern
//! - External system ports (Users, Submissions)
//! - Workflow engines (phases, verification, assignment, consensus)
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod clients;
pub mod clock;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod workflow;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::AppConfig;
pub use db::Repository;
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reviewers selected per paper by automatic assignment
pub const REVIEWERS_PER_PAPER: usize = 3;

/// Days between the submission deadline and the default bidding deadline
pub const DEFAULT_BIDDING_WINDOW_DAYS: i64 = 2;
