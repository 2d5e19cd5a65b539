use common::Language;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::config::ToolchainConfig;
use crate::error::{JudgeError, Result};
use crate::models::language::LanguageProfile;
use crate::models::runner::{Invocation, RunOutcome, wait_with_deadline};
use crate::models::workspace::Scratch;

pub const COMPILE_TIMEOUT_MESSAGE: &str = "Compilation timed out";

/// Result of preparing a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Ready(Invocation),
    /// The build step rejected the source. Carries the compiler diagnostic.
    CompileFailure(String),
}

/// Turns a source file into something the runner can execute.
pub struct Builder<'a> {
    toolchain: &'a ToolchainConfig,
    compile_timeout: Option<Duration>,
}

impl<'a> Builder<'a> {
    pub fn new(toolchain: &'a ToolchainConfig, compile_timeout: Option<Duration>) -> Self {
        Self {
            toolchain,
            compile_timeout,
        }
    }

    /// Prepare `source` for execution. Artifacts are written into `scratch` only.
    pub async fn prepare(
        &self,
        source: &Path,
        language: Language,
        scratch: &Scratch,
    ) -> Result<BuildOutcome> {
        let profile = LanguageProfile::for_language(language);
        let source = self.place_source(&profile, source, scratch).await?;

        if let Some(build) = profile.build_invocation(self.toolchain, &source, scratch.path()) {
            if let Some(diagnostic) = self.compile(&build).await? {
                return Ok(BuildOutcome::CompileFailure(diagnostic));
            }
        }

        Ok(BuildOutcome::Ready(profile.run_invocation(
            self.toolchain,
            &source,
            scratch.path(),
        )))
    }

    async fn place_source(
        &self,
        profile: &LanguageProfile,
        source: &Path,
        scratch: &Scratch,
    ) -> Result<PathBuf> {
        if !profile.needs_copy(source) {
            return Ok(source.to_path_buf());
        }

        let target = scratch.path().join(profile.canonical_file_name());
        tokio::fs::copy(source, &target).await.map_err(|e| {
            JudgeError::workspace(format!("failed to copy {}", source.display()), e)
        })?;
        debug!(from = %source.display(), to = %target.display(), "Copied source");
        Ok(target)
    }

    /// Run the compiler. Returns the diagnostic if it rejected the source.
    async fn compile(&self, build: &Invocation) -> Result<Option<String>> {
        let toolchain_error = |source| JudgeError::Toolchain {
            program: build.program.clone(),
            source,
        };

        let child = build.spawn().map_err(toolchain_error)?;
        let outcome = wait_with_deadline(child, b"", self.compile_timeout)
            .await
            .map_err(toolchain_error)?;

        match outcome {
            RunOutcome::Completed(output) if output.success => Ok(None),
            RunOutcome::Completed(output) => {
                debug!(exit_code = ?output.exit_code, "Compiler rejected source");
                // Some toolchains print diagnostics on stdout.
                if output.stderr.trim().is_empty() {
                    Ok(Some(output.stdout))
                } else {
                    Ok(Some(output.stderr))
                }
            }
            RunOutcome::TimedOut => Ok(Some(COMPILE_TIMEOUT_MESSAGE.to_string())),
        }
    }
}
