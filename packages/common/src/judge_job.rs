use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

use crate::language::{Language, ParseLanguageError};

/// Where a test blob lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum TestData {
    /// File path on the judging host
    #[serde(rename = "path")]
    Path(PathBuf),
    /// Inline content
    #[serde(rename = "content")]
    Content(String),
}

impl TestData {
    /// Read the blob as text. Invalid UTF-8 is replaced rather than rejected.
    pub async fn read(&self) -> std::io::Result<String> {
        match self {
            Self::Path(path) => {
                let bytes = tokio::fs::read(path).await?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Self::Content(text) => Ok(text.clone()),
        }
    }
}

/// One stored test file, keyed by its insertion order in the problem store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestFile {
    pub id: i32,
    pub data: TestData,
}

/// An input paired with its expected output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: i32,
    pub input: TestData,
    pub expected_output: TestData,
}

/// Ordered test cases of a problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestCaseSet(Vec<TestCase>);

impl TestCaseSet {
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self(cases)
    }

    /// Pair separately stored inputs and outputs.
    ///
    /// Both lists are sorted by id and zipped by position, so the pairing is only
    /// correct if inputs and outputs were created in lockstep. Unmatched trailing
    /// entries are dropped.
    pub fn pair(mut inputs: Vec<TestFile>, mut outputs: Vec<TestFile>) -> Self {
        inputs.sort_by_key(|f| f.id);
        outputs.sort_by_key(|f| f.id);

        if inputs.len() != outputs.len() {
            warn!(
                inputs = inputs.len(),
                outputs = outputs.len(),
                "Test input/output counts differ, extra files are ignored"
            );
        }

        Self(
            inputs
                .into_iter()
                .zip(outputs)
                .map(|(input, output)| TestCase {
                    id: input.id,
                    input: input.data,
                    expected_output: output.data,
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a TestCaseSet {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Problem data needed for judging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: i32,
    /// Wall-clock limit per test case, in seconds. Must be at least 1.
    pub time_limit: u32,
    pub test_cases: TestCaseSet,
}

/// The submitted program: a single file and its declared language tag.
///
/// The tag is kept as received so that an unknown value can be rejected by the
/// engine before any work starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceArtifact {
    pub path: PathBuf,
    pub language: String,
}

impl SourceArtifact {
    pub fn new(path: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
        }
    }

    pub fn language(&self) -> Result<Language, ParseLanguageError> {
        self.language.parse()
    }
}

/// Who submitted, and where the result should be credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionContext {
    pub submission_id: i32,
    pub user_id: Option<i32>,
    /// Contest ID if this is a contest submission
    pub contest_id: Option<i32>,
    /// Points awarded to the user when the submission is accepted
    pub points: u32,
}

/// A judge job: everything the engine needs for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeJob {
    /// Job identifier (UUID)
    pub job_id: String,
    pub submission: SubmissionContext,
    pub problem: Problem,
    pub source: SourceArtifact,
}

impl JudgeJob {
    /// Create a new judge job with a generated UUID.
    pub fn new(submission: SubmissionContext, problem: Problem, source: SourceArtifact) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            submission,
            problem,
            source,
        }
    }

    pub fn test_case_ids(&self) -> Vec<i32> {
        self.problem.test_cases.iter().map(|tc| tc.id).collect()
    }
}
