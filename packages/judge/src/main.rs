use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::judge_job::{JudgeJob, SourceArtifact};
use judge::config::JudgeAppConfig;
use judge::handlers::judge::handle_judge_job;
use judge::models::problem_dir::load_problem_dir;
use judge::models::{InMemoryScoreboard, Judge};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "judge", about = "Build, run and score submissions against test cases")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Judge a serialized job and print the JudgeResult as JSON.
    Run {
        /// Path to a JudgeJob JSON file.
        job: PathBuf,
    },
    /// Judge a source file against a directory of `*.in` / `*.out` files.
    Check {
        /// Directory holding the test files and an optional problem.toml.
        problem_dir: PathBuf,
        /// Source file to judge.
        source: PathBuf,
        /// Language tag: py, c, cpp, java or js.
        #[arg(short, long)]
        lang: String,
        /// Print only the per-test results.
        #[arg(long)]
        practice: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = JudgeAppConfig::load().context("Failed to load config")?;
    let judge = Judge::new(config);

    match cli.command {
        Command::Run { job } => {
            let text = std::fs::read_to_string(&job)
                .with_context(|| format!("Failed to read {}", job.display()))?;
            let job: JudgeJob =
                serde_json::from_str(&text).context("Failed to deserialize JudgeJob")?;
            info!(
                submission_id = job.submission.submission_id,
                job_id = %job.job_id,
                test_cases = job.problem.test_cases.len(),
                "Processing judge job"
            );

            let scoreboard = InMemoryScoreboard::new();
            let result = handle_judge_job(&judge, &scoreboard, job).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Check {
            problem_dir,
            source,
            lang,
            practice,
        } => {
            let problem = load_problem_dir(&problem_dir)?;
            let source = SourceArtifact::new(source, lang);

            if practice {
                let results = judge.check(&problem, &source).await?;
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                let report = judge.judge(&problem, &source).await?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }

    Ok(())
}
