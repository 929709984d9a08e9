//! Command-based detection.
//!
//! Runs a shell command such as `dpkg-query -W {package}` or
//! `winget list --id {package} --exact`. A zero exit status means the
//! package is installed; the installed version is scraped from stdout.

use async_trait::async_trait;
use regex::Regex;

use super::expand_template;
use super::process::{run_shell, CapturedOutput};
use crate::verification::version::{capture_version, extract_version, versions_match};
use crate::verification::{CancellationSignal, Probe, ProbeError, VerificationOutcome};

/// Detects packages by running a shell command.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    command: String,
    version_command: Option<String>,
    version_pattern: Option<Regex>,
}

impl CommandProbe {
    /// Create a command probe.
    pub fn new(command: &str, version_command: Option<&str>, version_pattern: Option<Regex>) -> Self {
        Self {
            command: command.to_string(),
            version_command: version_command.map(str::to_string),
            version_pattern,
        }
    }

    fn installed_version(&self, output: &CapturedOutput) -> Option<String> {
        match &self.version_pattern {
            Some(re) => capture_version(re, &output.stdout),
            None => extract_version(&output.stdout),
        }
    }
}

#[async_trait]
impl Probe for CommandProbe {
    async fn check_presence(
        &self,
        strategy: &str,
        package_id: &str,
        cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, ProbeError> {
        let command = expand_template(&self.command, package_id, None);
        let output = run_shell(&command, cancel).await?;

        if !output.success() {
            return Ok(VerificationOutcome::failed(
                strategy,
                format!("'{}' reported {}", command, output.describe_failure()),
            ));
        }

        let mut outcome = VerificationOutcome::verified(strategy).with_detail(&format!("Ran: {}", command));
        if let Some(version) = self.installed_version(&output) {
            outcome = outcome.with_installed_version(version);
        }
        Ok(outcome)
    }

    async fn check_version(
        &self,
        strategy: &str,
        package_id: &str,
        version: &str,
        cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, ProbeError> {
        if let Some(template) = &self.version_command {
            let command = expand_template(template, package_id, Some(version));
            let output = run_shell(&command, cancel).await?;
            return Ok(if output.success() {
                VerificationOutcome::verified(strategy).with_installed_version(version)
            } else {
                VerificationOutcome::failed(
                    strategy,
                    format!("'{}' reported {}", command, output.describe_failure()),
                )
            });
        }

        let command = expand_template(&self.command, package_id, Some(version));
        let output = run_shell(&command, cancel).await?;
        if !output.success() {
            return Ok(VerificationOutcome::failed(
                strategy,
                format!("'{}' reported {}", command, output.describe_failure()),
            ));
        }

        let Some(installed) = self.installed_version(&output) else {
            return Ok(VerificationOutcome::failed(
                strategy,
                format!("Could not determine installed version from '{}'", command),
            ));
        };

        if versions_match(&installed, version) {
            Ok(VerificationOutcome::verified(strategy).with_installed_version(installed))
        } else {
            Ok(VerificationOutcome::not_verified(strategy).with_installed_version(installed))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn never() -> CancellationSignal {
        CancellationSignal::never()
    }

    #[tokio::test]
    async fn presence_succeeds_on_zero_exit() {
        let probe = CommandProbe::new("echo {package} 1.4.2", None, None);
        let outcome = probe.check_presence("Shell", "tool", &never()).await.unwrap();

        assert!(outcome.verified);
        assert_eq!(outcome.installed_version.as_deref(), Some("1.4.2"));
        assert_eq!(outcome.details, vec!["Ran: echo tool 1.4.2"]);
    }

    #[tokio::test]
    async fn presence_fails_on_nonzero_exit() {
        let probe = CommandProbe::new("echo 'no such package' >&2; exit 1", None, None);
        let outcome = probe.check_presence("Shell", "tool", &never()).await.unwrap();

        assert!(!outcome.verified);
        let message = outcome.message.unwrap();
        assert!(message.contains("exit code 1"));
        assert!(message.contains("no such package"));
    }

    #[tokio::test]
    async fn version_match_is_verified() {
        let probe = CommandProbe::new("echo 'Version: 2.0'", None, None);
        let outcome = probe
            .check_version("Shell", "tool", "2.0", &never())
            .await
            .unwrap();
        assert!(outcome.verified);
    }

    #[tokio::test]
    async fn version_mismatch_reports_installed_version() {
        let pattern = Regex::new(r"installed=(\S+)").unwrap();
        let probe = CommandProbe::new("echo installed=1.0", None, Some(pattern));
        let outcome = probe
            .check_version("Shell", "tool", "2.0", &never())
            .await
            .unwrap();

        assert!(!outcome.verified);
        assert_eq!(outcome.installed_version.as_deref(), Some("1.0"));
    }

    #[tokio::test]
    async fn version_without_parsable_output_fails() {
        let probe = CommandProbe::new("echo present", None, None);
        let outcome = probe
            .check_version("Shell", "tool", "2.0", &never())
            .await
            .unwrap();

        assert!(!outcome.verified);
        assert!(outcome.installed_version.is_none());
        assert!(outcome.message.unwrap().contains("Could not determine"));
    }

    #[tokio::test]
    async fn dedicated_version_command_receives_version() {
        let probe = CommandProbe::new("false", Some("test '{version}' = '2.0'"), None);

        let ok = probe
            .check_version("Shell", "tool", "2.0", &never())
            .await
            .unwrap();
        assert!(ok.verified);

        let not_ok = probe
            .check_version("Shell", "tool", "3.0", &never())
            .await
            .unwrap();
        assert!(!not_ok.verified);
    }
}
