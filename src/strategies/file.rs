//! File-based detection.

use std::path::Path;

use async_trait::async_trait;

use super::expand_template;
use crate::verification::version::versions_match;
use crate::verification::{CancellationSignal, Probe, ProbeError, VerificationOutcome};

/// Detects packages by the marker files they leave behind.
#[derive(Debug, Clone)]
pub struct FileProbe {
    paths: Vec<String>,
    version_file: Option<String>,
}

impl FileProbe {
    /// Create a probe matching if any of `paths` exists.
    pub fn new(paths: Vec<String>, version_file: Option<String>) -> Self {
        Self {
            paths,
            version_file,
        }
    }

    fn expanded(&self, package_id: &str, version: Option<&str>) -> Vec<String> {
        self.paths
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| expand_template(p, package_id, version))
            .collect()
    }

    async fn first_existing(
        candidates: &[String],
        cancel: &CancellationSignal,
    ) -> Result<Option<String>, ProbeError> {
        for candidate in candidates {
            if cancel.is_cancelled() {
                return Err(ProbeError::Cancelled);
            }
            if tokio::fs::try_exists(Path::new(candidate)).await? {
                return Ok(Some(candidate.clone()));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl Probe for FileProbe {
    async fn check_presence(
        &self,
        strategy: &str,
        package_id: &str,
        cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, ProbeError> {
        let candidates = self.expanded(package_id, None);
        match Self::first_existing(&candidates, cancel).await? {
            Some(found) => {
                Ok(VerificationOutcome::verified(strategy).with_detail(&format!("Found: {}", found)))
            }
            None => Ok(VerificationOutcome::failed(
                strategy,
                format!("None of the expected paths exist: {}", candidates.join(", ")),
            )),
        }
    }

    async fn check_version(
        &self,
        strategy: &str,
        package_id: &str,
        version: &str,
        cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, ProbeError> {
        let Some(template) = &self.version_file else {
            // Versioned paths such as /opt/app/{version}/ identify the version.
            let candidates = self.expanded(package_id, Some(version));
            return Ok(match Self::first_existing(&candidates, cancel).await? {
                Some(found) => VerificationOutcome::verified(strategy)
                    .with_installed_version(version)
                    .with_detail(&format!("Found: {}", found)),
                None => VerificationOutcome::failed(
                    strategy,
                    format!("None of the expected paths exist: {}", candidates.join(", ")),
                ),
            });
        };

        let version_file = expand_template(template, package_id, Some(version));
        if cancel.is_cancelled() {
            return Err(ProbeError::Cancelled);
        }
        let content = match tokio::fs::read_to_string(&version_file).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(VerificationOutcome::failed(
                    strategy,
                    format!("Version file not found: {}", version_file),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let installed = content.trim();
        if installed.is_empty() {
            return Ok(VerificationOutcome::failed(
                strategy,
                format!("Version file is empty: {}", version_file),
            ));
        }

        let outcome = if versions_match(installed, version) {
            VerificationOutcome::verified(strategy)
        } else {
            VerificationOutcome::not_verified(strategy)
        };
        Ok(outcome
            .with_installed_version(installed)
            .with_detail(&format!("Read: {}", version_file)))
    }
}
