//! Cancellable child-process execution for probes.

use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::process::Command;

use crate::verification::{CancellationSignal, ProbeError};

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output, lossily decoded.
    pub stdout: String,

    /// Standard error, lossily decoded.
    pub stderr: String,

    /// Wall-clock duration.
    pub duration: Duration,
}

impl CapturedOutput {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Short description of a failure, for outcome messages.
    pub fn describe_failure(&self) -> String {
        let code = self
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        match self.stderr.lines().map(str::trim).find(|l| !l.is_empty()) {
            Some(line) => format!("exit code {}: {}", code, line),
            None => format!("exit code {}", code),
        }
    }
}

/// Run `program` with `args`, killing it if `cancel` fires.
pub async fn run_captured(
    program: &str,
    args: &[String],
    cancel: &CancellationSignal,
) -> Result<CapturedOutput, ProbeError> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .with_context(|| format!("failed to start '{}'", program))?;

    let output = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
        output = child.wait_with_output() => {
            output.with_context(|| format!("failed waiting for '{}'", program))?
        }
    };

    Ok(CapturedOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration: start.elapsed(),
    })
}

/// Run a command line through the platform shell.
pub async fn run_shell(
    command: &str,
    cancel: &CancellationSignal,
) -> Result<CapturedOutput, ProbeError> {
    let (shell, flag) = platform_shell();
    run_captured(&shell, &[flag.to_string(), command.to_string()], cancel).await
}

/// Non-interactive shell and its command flag.
fn platform_shell() -> (String, &'static str) {
    if cfg!(target_os = "windows") {
        (
            std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string()),
            "/C",
        )
    } else {
        ("/bin/sh".to_string(), "-c")
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::verification::CancellationSource;

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let out = run_shell("echo hello", &CancellationSignal::never())
            .await
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn failure_reports_first_stderr_line() {
        let out = run_shell("echo 'not installed' >&2; exit 3", &CancellationSignal::never())
            .await
            .unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.describe_failure(), "exit code 3: not installed");
    }

    #[tokio::test]
    async fn missing_program_is_a_failure() {
        let err = run_captured(
            "this-command-does-not-exist-12345",
            &[],
            &CancellationSignal::never(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProbeError::Failed(_)));
    }

    #[tokio::test]
    async fn cancellation_kills_long_command() {
        let source = CancellationSource::new();
        let signal = source.signal();
        let handle = tokio::spawn(async move { run_shell("sleep 30", &signal).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        source.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(ProbeError::Cancelled)));
    }
}
