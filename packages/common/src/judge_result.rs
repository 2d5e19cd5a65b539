use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{FinalVerdict, Verdict};

/// Result for a single test case execution.
///
/// Text fields are stored with surrounding whitespace trimmed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Input fed to the program.
    pub input: String,
    /// Expected output.
    pub expected: String,
    /// Program stdout. Empty on timeout.
    pub actual: String,
    /// Program stderr, compiler diagnostics, or the failure message.
    pub stderr: String,
    pub passed: bool,
    pub verdict: Verdict,
}

impl ExecutionResult {
    pub fn new(
        verdict: Verdict,
        input: &str,
        expected: &str,
        actual: &str,
        stderr: &str,
    ) -> Self {
        Self {
            input: input.trim().to_string(),
            expected: expected.trim().to_string(),
            actual: actual.trim().to_string(),
            stderr: stderr.trim().to_string(),
            passed: verdict.is_accepted(),
            verdict,
        }
    }

    /// The single synthetic entry reported when the build step fails.
    pub fn compile_error(diagnostic: &str) -> Self {
        Self::new(Verdict::CompilationError, "", "", "", diagnostic)
    }
}

/// Reduction of all per-test results for one submission.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct JudgeOutcome {
    pub verdict: FinalVerdict,
    /// Percentage of test cases accepted, 0..=100.
    pub score: u8,
}

/// Contest-mode output: the outcome plus the per-test detail it was computed from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct JudgeReport {
    pub verdict: FinalVerdict,
    pub score: u8,
    pub results: Vec<ExecutionResult>,
}

impl JudgeReport {
    pub fn outcome(&self) -> JudgeOutcome {
        JudgeOutcome {
            verdict: self.verdict,
            score: self.score,
        }
    }
}

/// Result of a judge job, as handed to the scoring boundary.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct JudgeResult {
    /// Original job ID.
    pub job_id: String,
    /// Submission that was judged.
    pub submission_id: i32,
    pub verdict: FinalVerdict,
    pub score: u8,
    /// Individual test case results, in test-case order.
    pub test_case_results: Vec<ExecutionResult>,
    pub judged_at: DateTime<Utc>,
}

impl JudgeResult {
    pub fn from_report(job_id: String, submission_id: i32, report: JudgeReport) -> Self {
        Self {
            job_id,
            submission_id,
            verdict: report.verdict,
            score: report.score,
            test_case_results: report.results,
            judged_at: Utc::now(),
        }
    }

    pub fn outcome(&self) -> JudgeOutcome {
        JudgeOutcome {
            verdict: self.verdict,
            score: self.score,
        }
    }
}
