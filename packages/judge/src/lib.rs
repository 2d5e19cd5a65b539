pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

pub use config::{EngineConfig, JudgeAppConfig, ToolchainConfig};
pub use error::{JudgeError, Result};
pub use models::{InMemoryScoreboard, Judge, LocalRunner, ProcessRunner, ScoringService};
