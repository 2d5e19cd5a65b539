//! Child-process execution under a wall-clock deadline.
//!
//! Every child is started as the leader of a new process group so that a
//! timeout can take down everything it spawned, not just the direct child.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::debug;

/// A fully resolved command line, ready to be spawned once per test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        #[cfg(unix)]
        command.process_group(0);
        command
    }

    /// Start the process. Fails if the program cannot be executed at all.
    pub fn spawn(&self) -> std::io::Result<Child> {
        self.command().spawn()
    }
}

/// Captured output of a process that exited on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(ProcessOutput),
    /// The deadline expired and the process group was killed. Output is discarded.
    TimedOut,
}

/// Executes one invocation against one input.
///
/// This is the seam for an isolation layer: a sandboxed implementation only has
/// to honour the same deadline and output contract.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(
        &self,
        invocation: &Invocation,
        stdin: &str,
        deadline: Duration,
    ) -> std::io::Result<RunOutcome>;
}

/// Runs programs directly on the host with the judge's own privileges.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalRunner;

#[async_trait]
impl ProcessRunner for LocalRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        stdin: &str,
        deadline: Duration,
    ) -> std::io::Result<RunOutcome> {
        let child = invocation.spawn()?;
        wait_with_deadline(child, stdin.as_bytes(), Some(deadline)).await
    }
}

/// Feed `input`, drain stdout/stderr and wait for exit, killing the whole
/// process group if `deadline` passes first.
pub async fn wait_with_deadline(
    mut child: Child,
    input: &[u8],
    deadline: Option<Duration>,
) -> std::io::Result<RunOutcome> {
    let Some(deadline) = deadline else {
        return communicate(&mut child, input).await.map(RunOutcome::Completed);
    };

    match tokio::time::timeout(deadline, communicate(&mut child, input)).await {
        Ok(output) => output.map(RunOutcome::Completed),
        Err(_) => {
            kill_process_tree(&mut child).await;
            Ok(RunOutcome::TimedOut)
        }
    }
}

async fn communicate(child: &mut Child, input: &[u8]) -> std::io::Result<ProcessOutput> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Write and read concurrently so a child that fills its stdout pipe before
    // consuming stdin cannot deadlock us.
    let write = async move {
        if let Some(mut pipe) = stdin {
            match pipe.write_all(input).await {
                Ok(()) => {}
                // The program exited without reading all of its input.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    };

    let ((), stdout, stderr) = tokio::try_join!(write, read_all(stdout), read_all(stderr))?;
    let status = child.wait().await?;

    Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        exit_code: status.code(),
        success: status.success(),
    })
}

async fn read_all<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Kill the child and every process in its group, then reap the child.
async fn kill_process_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        // The child was spawned with process_group(0), so its pid is the pgid.
        if let Some(pid) = child.id() {
            if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                debug!(pid, error = %e, "killpg failed");
            }
        }
    }

    #[cfg(windows)]
    {
        if let Some(pid) = child.id() {
            let status = Command::new("taskkill")
                .args(["/F", "/T", "/PID", &pid.to_string()])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;
            if let Err(e) = status {
                debug!(pid, error = %e, "taskkill failed");
            }
        }
    }

    if let Err(e) = child.kill().await {
        debug!(error = %e, "Failed to reap timed out process");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh").arg("-c").arg(script)
    }

    async fn run(script: &str, stdin: &str, secs: u64) -> RunOutcome {
        LocalRunner
            .run(&sh(script), stdin, Duration::from_secs(secs))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_feeds_stdin_and_captures_streams() {
        let outcome = run("read n; echo $((n * 2)); echo note >&2", "21\n", 5).await;
        assert_eq!(
            outcome,
            RunOutcome::Completed(ProcessOutput {
                stdout: "42\n".into(),
                stderr: "note\n".into(),
                exit_code: Some(0),
                success: true,
            })
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported() {
        let RunOutcome::Completed(output) = run("echo 6; exit 3", "", 5).await else {
            panic!("expected completion");
        };
        assert_eq!(output.stdout, "6\n");
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success);
    }

    #[tokio::test]
    async fn test_signal_death_has_no_exit_code() {
        let RunOutcome::Completed(output) = run("kill -9 $$", "", 5).await else {
            panic!("expected completion");
        };
        assert_eq!(output.exit_code, None);
        assert!(!output.success);
    }

    #[tokio::test]
    async fn test_unread_stdin_is_not_an_error() {
        let input = "x".repeat(1 << 20);
        let RunOutcome::Completed(output) = run("exit 0", &input, 5).await else {
            panic!("expected completion");
        };
        assert!(output.success);
    }

    #[tokio::test]
    async fn test_large_output_does_not_deadlock() {
        let input = "y\n".repeat(1 << 18);
        let RunOutcome::Completed(output) = run("cat; head -c 200000 /dev/zero | tr '\\0' z", &input, 10).await
        else {
            panic!("expected completion");
        };
        assert_eq!(output.stdout.len(), input.len() + 200_000);
    }

    #[tokio::test]
    async fn test_deadline_kills_and_discards_output() {
        let start = Instant::now();
        let outcome = run("echo partial; sleep 30", "", 1).await;
        assert_eq!(outcome, RunOutcome::TimedOut);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_spawn() {
        let err = LocalRunner
            .run(
                &Invocation::new("/nonexistent/judge-interpreter"),
                "",
                Duration::from_secs(1),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_no_deadline_waits_for_exit() {
        let child = sh("sleep 1; echo done").spawn().unwrap();
        let outcome = wait_with_deadline(child, b"", None).await.unwrap();
        let RunOutcome::Completed(output) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(output.stdout, "done\n");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_deadline_kills_descendants() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!(
            "sleep 60 & echo $! > {}; wait",
            pid_file.to_string_lossy()
        );

        assert_eq!(run(&script, "", 1).await, RunOutcome::TimedOut);

        let pid = std::fs::read_to_string(&pid_file).unwrap().trim().to_string();
        let stat = format!("/proc/{pid}/stat");
        // The grandchild may linger briefly as a zombie until it is reaped.
        let mut alive = true;
        for _ in 0..40 {
            alive = match std::fs::read_to_string(&stat) {
                Ok(s) => !s
                    .rsplit_once(')')
                    .is_some_and(|(_, rest)| rest.trim_start().starts_with('Z')),
                Err(_) => false,
            };
            if !alive {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(!alive, "descendant {pid} survived the deadline");
    }
}
