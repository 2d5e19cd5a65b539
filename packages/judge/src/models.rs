pub mod aggregator;
pub mod builder;
pub mod comparator;
pub mod judge;
pub mod language;
pub mod problem_dir;
pub mod runner;
pub mod scoring;
pub mod workspace;

pub use judge::Judge;
pub use runner::{Invocation, LocalRunner, ProcessRunner, RunOutcome};
pub use scoring::{InMemoryScoreboard, ScoringService};
