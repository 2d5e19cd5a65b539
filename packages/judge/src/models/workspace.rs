use std::path::Path;
use tempfile::TempDir;

use crate::error::{JudgeError, Result};

/// Scratch directory owned by exactly one judging run.
///
/// The directory and everything in it is removed when the value is dropped,
/// so concurrent runs never share compiled artifacts.
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn create(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root).map_err(|e| {
            JudgeError::workspace(format!("failed to create {}", root.display()), e)
        })?;

        let dir = tempfile::Builder::new()
            .prefix("judge-")
            .tempdir_in(root)
            .map_err(|e| {
                JudgeError::workspace(
                    format!("failed to create scratch dir in {}", root.display()),
                    e,
                )
            })?;

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory now, reporting failures that `Drop` would swallow.
    pub fn close(self) -> std::io::Result<()> {
        self.dir.close()
    }
}
