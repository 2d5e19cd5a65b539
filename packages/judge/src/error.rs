use common::language::ParseLanguageError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that no verdict can represent. Per-test problems never surface here.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    UnsupportedLanguage(#[from] ParseLanguageError),

    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Toolchain error: failed to start `{program}`: {source}")]
    Toolchain {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Workspace error: {context}: {source}")]
    Workspace {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read test data {}: {source}", path.display())]
    TestData {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JudgeError {
    pub(crate) fn workspace(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Workspace {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, JudgeError>;
