use anyhow::Result;
use async_trait::async_trait;
use common::FinalVerdict;
use common::judge_job::SubmissionContext;
use common::judge_result::JudgeOutcome;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::info;

/// Persistence boundary for judging outcomes.
///
/// Implementations must be idempotent per submission: recording the same
/// submission twice must not award points twice.
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn record_outcome(
        &self,
        submission: &SubmissionContext,
        outcome: &JudgeOutcome,
    ) -> Result<()>;
}

/// In-process scoreboard: submission records, lifetime user points and
/// per-contest leaderboard totals.
#[derive(Debug, Default)]
pub struct InMemoryScoreboard {
    submissions: DashMap<i32, JudgeOutcome>,
    user_points: DashMap<i32, u64>,
    leaderboard: DashMap<(i32, i32), u64>,
}

impl InMemoryScoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submission(&self, submission_id: i32) -> Option<JudgeOutcome> {
        self.submissions.get(&submission_id).map(|o| *o)
    }

    pub fn user_points(&self, user_id: i32) -> u64 {
        self.user_points.get(&user_id).map(|p| *p).unwrap_or(0)
    }

    pub fn contest_points(&self, contest_id: i32, user_id: i32) -> u64 {
        self.leaderboard
            .get(&(contest_id, user_id))
            .map(|p| *p)
            .unwrap_or(0)
    }

    /// Leaderboard of a contest, highest points first, ties by user id.
    pub fn standings(&self, contest_id: i32) -> Vec<(i32, u64)> {
        let mut rows: Vec<(i32, u64)> = self
            .leaderboard
            .iter()
            .filter(|e| e.key().0 == contest_id)
            .map(|e| (e.key().1, *e.value()))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        rows
    }
}

#[async_trait]
impl ScoringService for InMemoryScoreboard {
    async fn record_outcome(
        &self,
        submission: &SubmissionContext,
        outcome: &JudgeOutcome,
    ) -> Result<()> {
        // The entry guard serializes concurrent records of the same submission.
        match self.submissions.entry(submission.submission_id) {
            Entry::Occupied(_) => {
                info!(
                    submission_id = submission.submission_id,
                    "Submission already recorded, skipping"
                );
                return Ok(());
            }
            Entry::Vacant(slot) => {
                slot.insert(*outcome);
            }
        }

        if outcome.verdict == FinalVerdict::Accepted {
            if let Some(user_id) = submission.user_id {
                let points = u64::from(submission.points);
                *self.user_points.entry(user_id).or_insert(0) += points;
                if let Some(contest_id) = submission.contest_id {
                    *self.leaderboard.entry((contest_id, user_id)).or_insert(0) += points;
                }
            }
        }

        info!(
            submission_id = submission.submission_id,
            verdict = %outcome.verdict,
            score = outcome.score,
            "Recorded judge outcome"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(submission_id: i32, contest_id: Option<i32>) -> SubmissionContext {
        SubmissionContext {
            submission_id,
            user_id: Some(7),
            contest_id,
            points: 10,
        }
    }

    const AC: JudgeOutcome = JudgeOutcome {
        verdict: FinalVerdict::Accepted,
        score: 100,
    };
    const WA: JudgeOutcome = JudgeOutcome {
        verdict: FinalVerdict::WrongAnswer,
        score: 50,
    };

    #[tokio::test]
    async fn test_accepted_awards_points() {
        let board = InMemoryScoreboard::new();
        board.record_outcome(&ctx(1, Some(3)), &AC).await.unwrap();

        assert_eq!(board.submission(1), Some(AC));
        assert_eq!(board.user_points(7), 10);
        assert_eq!(board.contest_points(3, 7), 10);
        assert_eq!(board.standings(3), vec![(7, 10)]);
    }

    #[tokio::test]
    async fn test_partial_score_is_stored_without_points() {
        let board = InMemoryScoreboard::new();
        board.record_outcome(&ctx(1, Some(3)), &WA).await.unwrap();

        assert_eq!(board.submission(1).unwrap().score, 50);
        assert_eq!(board.user_points(7), 0);
        assert!(board.standings(3).is_empty());
    }

    #[tokio::test]
    async fn test_practice_submission_skips_leaderboard() {
        let board = InMemoryScoreboard::new();
        board.record_outcome(&ctx(1, None), &AC).await.unwrap();

        assert_eq!(board.user_points(7), 10);
        assert!(board.standings(3).is_empty());
    }

    #[tokio::test]
    async fn test_recording_is_idempotent() {
        let board = InMemoryScoreboard::new();
        board.record_outcome(&ctx(1, Some(3)), &AC).await.unwrap();
        board.record_outcome(&ctx(1, Some(3)), &AC).await.unwrap();
        board.record_outcome(&ctx(1, Some(3)), &WA).await.unwrap();

        assert_eq!(board.submission(1), Some(AC));
        assert_eq!(board.user_points(7), 10);
        assert_eq!(board.contest_points(3, 7), 10);
    }

    #[tokio::test]
    async fn test_standings_order() {
        let board = InMemoryScoreboard::new();
        for (sid, user) in [(1, 2), (2, 1), (3, 1)] {
            let submission = SubmissionContext {
                submission_id: sid,
                user_id: Some(user),
                contest_id: Some(9),
                points: 5,
            };
            board.record_outcome(&submission, &AC).await.unwrap();
        }
        assert_eq!(board.standings(9), vec![(1, 10), (2, 5)]);
    }
}
