use anyhow::{Context, Result, bail};
use common::judge_job::{Problem, TestCaseSet, TestData, TestFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_NAME: &str = "problem.toml";

/// Optional `problem.toml` next to the test files.
#[derive(Debug, Deserialize)]
struct ProblemManifest {
    #[serde(default)]
    id: i32,
    #[serde(default = "default_time_limit")]
    time_limit: u32,
}

fn default_time_limit() -> u32 {
    1
}

impl Default for ProblemManifest {
    fn default() -> Self {
        Self {
            id: 0,
            time_limit: default_time_limit(),
        }
    }
}

/// Load a problem from a directory of `*.in` / `*.out` files.
///
/// Inputs and outputs are each ordered by file name and paired by position.
pub fn load_problem_dir(dir: &Path) -> Result<Problem> {
    let manifest_path = dir.join(MANIFEST_NAME);
    let manifest = if manifest_path.exists() {
        let text = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", manifest_path.display()))?
    } else {
        ProblemManifest::default()
    };

    if manifest.time_limit == 0 {
        bail!("time_limit must be at least 1 second");
    }

    let inputs = collect(dir, "in")?;
    let outputs = collect(dir, "out")?;
    debug!(
        inputs = inputs.len(),
        outputs = outputs.len(),
        "Loaded problem directory"
    );

    Ok(Problem {
        id: manifest.id,
        time_limit: manifest.time_limit,
        test_cases: TestCaseSet::pair(inputs, outputs),
    })
}

fn collect(dir: &Path, extension: &str) -> Result<Vec<TestFile>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == extension))
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(idx, path)| TestFile {
            id: idx as i32 + 1,
            data: TestData::Path(path),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_files_by_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in [
            ("b.in", "4\n"),
            ("a.in", "3\n"),
            ("a.out", "6\n"),
            ("b.out", "8\n"),
            ("notes.txt", "ignored"),
        ] {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        std::fs::write(dir.path().join(MANIFEST_NAME), "id = 5\ntime_limit = 2\n").unwrap();

        let problem = load_problem_dir(dir.path()).unwrap();
        assert_eq!(problem.id, 5);
        assert_eq!(problem.time_limit, 2);

        let pairs: Vec<_> = problem
            .test_cases
            .iter()
            .map(|tc| (tc.input.clone(), tc.expected_output.clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (
                    TestData::Path(dir.path().join("a.in")),
                    TestData::Path(dir.path().join("a.out"))
                ),
                (
                    TestData::Path(dir.path().join("b.in")),
                    TestData::Path(dir.path().join("b.out"))
                ),
            ]
        );
    }

    #[test]
    fn test_manifest_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let problem = load_problem_dir(dir.path()).unwrap();
        assert_eq!(problem.time_limit, 1);
        assert!(problem.test_cases.is_empty());
    }

    #[test]
    fn test_zero_time_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_NAME), "time_limit = 0\n").unwrap();
        assert!(load_problem_dir(dir.path()).is_err());
    }
}
