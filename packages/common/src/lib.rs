pub mod judge_job;
pub mod judge_result;
pub mod language;
pub mod verdict;

pub use language::Language;
pub use verdict::{FinalVerdict, Verdict};
