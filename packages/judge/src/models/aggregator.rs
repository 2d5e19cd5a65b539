use common::judge_result::{ExecutionResult, JudgeOutcome};
use common::{FinalVerdict, Verdict};

/// Fold per-test results into the final verdict and a 0..=100 score.
///
/// Any failure (WA, RE or TLE) reports as `WrongAnswer`; only accepted results
/// earn credit.
pub fn reduce(results: &[ExecutionResult]) -> JudgeOutcome {
    if results
        .iter()
        .any(|r| r.verdict == Verdict::CompilationError)
    {
        return JudgeOutcome {
            verdict: FinalVerdict::CompilationError,
            score: 0,
        };
    }

    let total = results.len();
    if total == 0 {
        return JudgeOutcome {
            verdict: FinalVerdict::Pending,
            score: 0,
        };
    }

    let passed = results.iter().filter(|r| r.verdict.is_accepted()).count();
    if passed == total {
        JudgeOutcome {
            verdict: FinalVerdict::Accepted,
            score: 100,
        }
    } else {
        JudgeOutcome {
            verdict: FinalVerdict::WrongAnswer,
            // passed < total, so this stays below 100.
            score: (100 * passed / total) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(verdict: Verdict) -> ExecutionResult {
        ExecutionResult::new(verdict, "", "", "", "")
    }

    fn outcome(verdicts: &[Verdict]) -> JudgeOutcome {
        let results: Vec<_> = verdicts.iter().copied().map(result).collect();
        reduce(&results)
    }

    #[test]
    fn test_empty_is_pending() {
        assert_eq!(
            reduce(&[]),
            JudgeOutcome {
                verdict: FinalVerdict::Pending,
                score: 0
            }
        );
    }

    #[test]
    fn test_compile_error_short_circuits() {
        let results = vec![ExecutionResult::compile_error("boom")];
        assert_eq!(
            reduce(&results),
            JudgeOutcome {
                verdict: FinalVerdict::CompilationError,
                score: 0
            }
        );
    }

    #[test]
    fn test_all_accepted() {
        let o = outcome(&[Verdict::Accepted, Verdict::Accepted]);
        assert_eq!(o.verdict, FinalVerdict::Accepted);
        assert_eq!(o.score, 100);
    }

    #[test]
    fn test_any_failure_reports_wrong_answer() {
        for failing in [
            Verdict::WrongAnswer,
            Verdict::RuntimeError,
            Verdict::TimeLimitExceeded,
        ] {
            let o = outcome(&[Verdict::Accepted, failing]);
            assert_eq!(o.verdict, FinalVerdict::WrongAnswer);
            assert_eq!(o.score, 50);
        }
    }

    #[test]
    fn test_score_is_floored() {
        let o = outcome(&[Verdict::Accepted, Verdict::WrongAnswer, Verdict::WrongAnswer]);
        assert_eq!(o.score, 33);

        let o = outcome(&[
            Verdict::Accepted,
            Verdict::Accepted,
            Verdict::TimeLimitExceeded,
        ]);
        assert_eq!(o.score, 66);
    }

    #[test]
    fn test_score_monotone_and_full_only_when_accepted() {
        let total = 7;
        let mut previous = 0;
        for passed in 0..=total {
            let verdicts: Vec<_> = (0..total)
                .map(|i| {
                    if i < passed {
                        Verdict::Accepted
                    } else {
                        Verdict::RuntimeError
                    }
                })
                .collect();
            let o = outcome(&verdicts);
            assert!(o.score >= previous);
            assert_eq!(o.score == 100, o.verdict == FinalVerdict::Accepted);
            assert_eq!(o.score == 100, passed == total);
            previous = o.score;
        }
    }
}
