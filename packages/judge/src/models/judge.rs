//! Judging orchestrator.
//!
//! One run is `build -> (CE | run each test case in order -> reduce)`. Failures
//! local to one test case become that test case's verdict; only a compile
//! failure ends the run early.

use common::Verdict;
use common::judge_job::{Problem, SourceArtifact, TestData};
use common::judge_result::{ExecutionResult, JudgeReport};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::JudgeAppConfig;
use crate::error::{JudgeError, Result};
use crate::models::aggregator;
use crate::models::builder::{BuildOutcome, Builder};
use crate::models::comparator::outputs_match;
use crate::models::runner::{Invocation, LocalRunner, ProcessRunner, RunOutcome};
use crate::models::workspace::Scratch;

pub struct Judge<R: ProcessRunner = LocalRunner> {
    config: JudgeAppConfig,
    runner: R,
}

impl Judge<LocalRunner> {
    pub fn new(config: JudgeAppConfig) -> Self {
        Self::with_runner(config, LocalRunner)
    }
}

impl<R: ProcessRunner> Judge<R> {
    pub fn with_runner(config: JudgeAppConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &JudgeAppConfig {
        &self.config
    }

    /// Judge a submission and reduce the per-test results to a final verdict
    /// and score.
    pub async fn judge(&self, problem: &Problem, source: &SourceArtifact) -> Result<JudgeReport> {
        let results = self.check(problem, source).await?;
        let outcome = aggregator::reduce(&results);

        info!(
            problem_id = problem.id,
            verdict = %outcome.verdict,
            score = outcome.score,
            "Judging completed"
        );

        Ok(JudgeReport {
            verdict: outcome.verdict,
            score: outcome.score,
            results,
        })
    }

    /// Judge a submission and return one result per test case, in order.
    ///
    /// A compile failure yields a single `CE` entry and no test case runs.
    #[instrument(skip_all, fields(problem_id = problem.id, language = %source.language))]
    pub async fn check(
        &self,
        problem: &Problem,
        source: &SourceArtifact,
    ) -> Result<Vec<ExecutionResult>> {
        let language = source.language()?;
        if problem.time_limit == 0 {
            return Err(JudgeError::InvalidProblem(format!(
                "problem {} has a zero time limit",
                problem.id
            )));
        }

        info!(test_cases = problem.test_cases.len(), "Starting judging");

        let scratch = Scratch::create(&self.config.engine.scratch_root())?;
        let builder = Builder::new(
            &self.config.toolchain,
            self.config.engine.compile_timeout_secs.map(Duration::from_secs),
        );

        let results = match builder.prepare(&source.path, language, &scratch).await {
            Ok(BuildOutcome::Ready(invocation)) => {
                let deadline = Duration::from_secs(u64::from(problem.time_limit));
                self.run_all(problem, &invocation, deadline).await
            }
            Ok(BuildOutcome::CompileFailure(diagnostic)) => {
                info!("Compilation failed");
                Ok(vec![ExecutionResult::compile_error(&diagnostic)])
            }
            Err(e) => Err(e),
        };

        if let Err(e) = scratch.close() {
            warn!(error = %e, "Failed to remove scratch directory");
        }

        results
    }

    async fn run_all(
        &self,
        problem: &Problem,
        invocation: &Invocation,
        deadline: Duration,
    ) -> Result<Vec<ExecutionResult>> {
        let mut results = Vec::with_capacity(problem.test_cases.len());

        for tc in &problem.test_cases {
            let input = load(&tc.input).await?;
            let expected = load(&tc.expected_output).await?;

            let result = self
                .run_test_case(invocation, &input, &expected, deadline)
                .await;
            debug!(test_case_id = tc.id, verdict = %result.verdict, "Test case judged");
            results.push(result);
        }

        Ok(results)
    }

    async fn run_test_case(
        &self,
        invocation: &Invocation,
        input: &str,
        expected: &str,
        deadline: Duration,
    ) -> ExecutionResult {
        match self.runner.run(invocation, input, deadline).await {
            Ok(RunOutcome::Completed(output)) => {
                // Exit status is checked before the output.
                let verdict = if !output.success {
                    debug!(exit_code = ?output.exit_code, "Program exited with failure status");
                    Verdict::RuntimeError
                } else if outputs_match(&output.stdout, expected) {
                    Verdict::Accepted
                } else {
                    Verdict::WrongAnswer
                };
                ExecutionResult::new(verdict, input, expected, &output.stdout, &output.stderr)
            }
            Ok(RunOutcome::TimedOut) => ExecutionResult::new(
                Verdict::TimeLimitExceeded,
                input,
                expected,
                "",
                &self.config.engine.tle_marker,
            ),
            Err(e) => {
                warn!(error = %e, program = %invocation.program, "Failed to execute program");
                ExecutionResult::new(Verdict::RuntimeError, input, expected, "", &e.to_string())
            }
        }
    }
}

async fn load(data: &TestData) -> Result<String> {
    data.read().await.map_err(|source| JudgeError::TestData {
        path: match data {
            TestData::Path(path) => path.clone(),
            TestData::Content(_) => PathBuf::from("<inline>"),
        },
        source,
    })
}
