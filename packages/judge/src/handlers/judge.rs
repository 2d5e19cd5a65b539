use anyhow::{Context, Result};
use common::judge_job::JudgeJob;
use common::judge_result::JudgeResult;
use tracing::{info, instrument};

use crate::models::{Judge, ProcessRunner, ScoringService};

/// Entry point for serialized jobs.
/// Receives a JudgeJob, returns a serialized JudgeResult.
pub async fn handle_judge<R: ProcessRunner>(
    judge: &Judge<R>,
    scoring: &dyn ScoringService,
    payload: serde_json::Value,
) -> Result<serde_json::Value> {
    let job: JudgeJob =
        serde_json::from_value(payload).context("Failed to deserialize JudgeJob")?;

    let result = handle_judge_job(judge, scoring, job).await?;
    serde_json::to_value(&result).context("Failed to serialize JudgeResult")
}

/// Judge a job and hand the outcome to the scoring boundary.
#[instrument(skip_all, fields(submission_id = job.submission.submission_id, job_id = %job.job_id))]
pub async fn handle_judge_job<R: ProcessRunner>(
    judge: &Judge<R>,
    scoring: &dyn ScoringService,
    job: JudgeJob,
) -> Result<JudgeResult> {
    let report = judge
        .judge(&job.problem, &job.source)
        .await
        .context("Judging failed")?;

    scoring
        .record_outcome(&job.submission, &report.outcome())
        .await
        .context("Failed to record judge outcome")?;

    info!(
        verdict = %report.verdict,
        score = report.score,
        test_cases = report.results.len(),
        "Judge job finished"
    );

    Ok(JudgeResult::from_report(
        job.job_id,
        job.submission.submission_id,
        report,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JudgeAppConfig;
    use crate::models::InMemoryScoreboard;

    #[tokio::test]
    async fn test_malformed_payload_is_rejected() {
        let judge = Judge::new(JudgeAppConfig::default());
        let board = InMemoryScoreboard::new();

        let err = handle_judge(&judge, &board, serde_json::json!({ "job_id": 1 }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to deserialize JudgeJob"));
    }

    #[tokio::test]
    async fn test_unsupported_language_is_not_recorded() {
        let root = tempfile::tempdir().unwrap();
        let mut config = JudgeAppConfig::default();
        config.engine.scratch_root = Some(root.path().to_path_buf());
        let judge = Judge::new(config);
        let board = InMemoryScoreboard::new();

        let payload = serde_json::json!({
            "job_id": "j-1",
            "submission": { "submission_id": 3, "user_id": 1, "contest_id": null, "points": 10 },
            "problem": { "id": 1, "time_limit": 1, "test_cases": [] },
            "source": { "path": "/tmp/x.kt", "language": "kotlin" },
        });

        let err = handle_judge(&judge, &board, payload).await.unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported language 'kotlin'"));
        assert_eq!(board.submission(3), None);
    }
}
