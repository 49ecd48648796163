// Shell runner - spawns one command and waits for it
//
// Every child gets its environment overlay and working directory explicitly;
// the caller's own environment and current directory are never touched.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::warn;

use super::Verdict;
use crate::logging::LogConfig;

/// A shell command plus everything needed to run it in isolation.
#[derive(Debug, Clone, Default)]
pub struct ShellCommand {
    pub command: String,
    /// Variables added to the inherited environment of the child only
    pub env: Vec<(String, String)>,
    pub current_dir: Option<PathBuf>,
    /// Discard the child's stdout/stderr instead of inheriting them
    pub quiet: bool,
    pub timeout: Option<Duration>,
}

impl ShellCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((name.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// How a single run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Exited(i32),
    /// Terminated by a signal (no exit code)
    Signaled,
    TimedOut(Duration),
    SpawnFailed(String),
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        matches!(self, RunOutcome::Exited(0))
    }
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Run `cmd` once and wait for it (or for its timeout).
pub async fn run_shell(cmd: &ShellCommand) -> RunOutcome {
    let mut command = shell(&cmd.command);
    command.envs(cmd.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    if let Some(dir) = &cmd.current_dir {
        command.current_dir(dir);
    }
    if cmd.quiet {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    } else {
        command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    }
    command.stdin(Stdio::null()).kill_on_drop(true);
    // Own process group, so a timeout can take down everything the shell started.
    #[cfg(unix)]
    command.process_group(0);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!("Failed to spawn command '{}': {}", cmd.command, e);
            return RunOutcome::SpawnFailed(e.to_string());
        }
    };

    let status = match cmd.timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                warn!("Command '{}' timed out after {:?}, killing it", cmd.command, limit);
                kill_tree(&mut child).await;
                return RunOutcome::TimedOut(limit);
            }
        },
        None => child.wait().await,
    };

    match status {
        Ok(status) => match status.code() {
            Some(code) => RunOutcome::Exited(code),
            None => RunOutcome::Signaled,
        },
        Err(e) => {
            warn!("Failed to wait for command '{}': {}", cmd.command, e);
            RunOutcome::SpawnFailed(e.to_string())
        }
    }
}

/// Kill the child's whole process group and reap the child.
#[cfg(unix)]
async fn kill_tree(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    // No pid means the child was already reaped.
    let Some(pid) = child.id() else {
        return;
    };

    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        warn!(pid = pid, "Failed to kill process group: {}", e);
        if let Err(e) = child.start_kill() {
            warn!("Failed to kill timed out command: {}", e);
        }
    }

    if let Err(e) = child.wait().await {
        warn!("Failed to reap timed out command: {}", e);
    }
}

#[cfg(not(unix))]
async fn kill_tree(child: &mut Child) {
    if let Err(e) = child.kill().await {
        warn!("Failed to kill timed out command: {}", e);
    }
}

/// Run `cmd` up to `pass_count` times; pass only if every run succeeds.
///
/// The first unsuccessful run short-circuits the rest.
pub async fn run_repeated(
    cmd: &ShellCommand,
    pass_count: u32,
    label: &str,
    log: &LogConfig,
) -> Verdict {
    log.detail(format!("start test with {}", label));

    for round in 0..pass_count {
        log.detail(format!("round={}", round));
        let outcome = run_shell(cmd).await;
        if !outcome.success() {
            log.detail(format!(
                "test failed with {}, cnt={} ({:?})",
                label, round, outcome
            ));
            return Verdict::Fail;
        }
    }

    log.detail(format!("test passed with {}", label));
    Verdict::Pass
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_exit_codes() {
        assert_eq!(run_shell(&ShellCommand::new("true")).await, RunOutcome::Exited(0));
        assert_eq!(run_shell(&ShellCommand::new("exit 3")).await, RunOutcome::Exited(3));
    }

    #[tokio::test]
    async fn test_missing_program_is_unsuccessful() {
        let outcome = run_shell(&ShellCommand::new("definitely-not-a-real-binary-xyz").quiet(true)).await;
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn test_env_applies_to_child_only() {
        let cmd = ShellCommand::new("test \"$BISECTOR_SHELL_PROBE\" = 42")
            .env("BISECTOR_SHELL_PROBE", "42");
        assert!(run_shell(&cmd).await.success());
        assert!(std::env::var("BISECTOR_SHELL_PROBE").is_err());
    }

    #[tokio::test]
    async fn test_current_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker"), "x").unwrap();

        let cmd = ShellCommand::new("test -f marker").current_dir(dir.path());
        assert!(run_shell(&cmd).await.success());
        assert!(!run_shell(&ShellCommand::new("test -f marker")).await.success());
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let cmd = ShellCommand::new("sleep 5").timeout(Some(Duration::from_millis(200)));
        let started = std::time::Instant::now();
        let outcome = run_shell(&cmd).await;
        assert_eq!(outcome, RunOutcome::TimedOut(Duration::from_millis(200)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_timeout_kills_grandchildren() {
        let dir = TempDir::new().unwrap();
        let cmd = ShellCommand::new("(sleep 1; touch late_write) ; exit 0")
            .current_dir(dir.path())
            .timeout(Some(Duration::from_millis(200)));

        let outcome = run_shell(&cmd).await;
        assert_eq!(outcome, RunOutcome::TimedOut(Duration::from_millis(200)));

        tokio::time::sleep(Duration::from_millis(1800)).await;
        assert!(
            !dir.path().join("late_write").exists(),
            "a process started by the timed out command kept running"
        );
    }

    #[tokio::test]
    async fn test_repeat_short_circuits_on_first_failure() {
        let dir = TempDir::new().unwrap();
        let counter = dir.path().join("runs");
        // Appends a line per run, then fails.
        let cmd = ShellCommand::new(format!("echo x >> '{}'; exit 1", counter.display()));

        let verdict = run_repeated(&cmd, 5, "probe", &LogConfig::default()).await;
        assert_eq!(verdict, Verdict::Fail);

        let runs = std::fs::read_to_string(&counter).unwrap();
        assert_eq!(runs.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_repeat_runs_pass_count_times() {
        let dir = TempDir::new().unwrap();
        let counter = dir.path().join("runs");
        let cmd = ShellCommand::new(format!("echo x >> '{}'", counter.display()));

        let verdict = run_repeated(&cmd, 4, "probe", &LogConfig::new(true)).await;
        assert_eq!(verdict, Verdict::Pass);

        let runs = std::fs::read_to_string(&counter).unwrap();
        assert_eq!(runs.lines().count(), 4);
    }
}
