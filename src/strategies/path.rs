//! PATH-based detection.
//!
//! Resolves the package's binary by walking the `PATH` entries directly
//! instead of shelling out to `which`, whose behavior varies across
//! systems. The lookup reads `PATH` on every call, so a freshly installed
//! binary is found once the environment catches up.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use regex::Regex;

use super::expand_template;
use super::process::run_captured;
use crate::verification::version::{capture_version, extract_version, versions_match};
use crate::verification::{CancellationSignal, Probe, ProbeError, VerificationOutcome};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. On Windows the
/// `PATHEXT`-style suffixes `.exe`, `.cmd` and `.bat` are also tried.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let suffixes: &[&str] = if cfg!(windows) {
        &["", ".exe", ".cmd", ".bat"]
    } else {
        &[""]
    };

    for dir in path_entries {
        for suffix in suffixes {
            let candidate = dir.join(format!("{}{}", tool, suffix));
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Detects packages that install an executable.
#[derive(Debug, Clone)]
pub struct PathProbe {
    binary: String,
    version_args: Vec<String>,
    version_pattern: Option<Regex>,
    search_path: Option<Vec<PathBuf>>,
}

impl PathProbe {
    /// Create a probe resolving `binary` on the system PATH.
    pub fn new(binary: &str, version_args: Vec<String>, version_pattern: Option<Regex>) -> Self {
        Self {
            binary: binary.to_string(),
            version_args,
            version_pattern,
            search_path: None,
        }
    }

    /// Search these directories instead of the system PATH.
    pub fn with_search_path(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_path = Some(dirs);
        self
    }

    fn resolve(&self, package_id: &str) -> (String, Option<PathBuf>) {
        let tool = expand_template(&self.binary, package_id, None);
        let resolved = match &self.search_path {
            Some(dirs) => resolve_tool_path(&tool, dirs),
            None => resolve_tool_path(&tool, &parse_system_path()),
        };
        (tool, resolved)
    }
}

#[async_trait]
impl Probe for PathProbe {
    async fn check_presence(
        &self,
        strategy: &str,
        package_id: &str,
        _cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, ProbeError> {
        match self.resolve(package_id) {
            (_, Some(path)) => Ok(VerificationOutcome::verified(strategy)
                .with_detail(&format!("Found: {}", path.display()))),
            (tool, None) => Ok(VerificationOutcome::failed(
                strategy,
                format!("'{}' not found on PATH", tool),
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
        let (tool, resolved) = self.resolve(package_id);
        let Some(path) = resolved else {
            return Ok(VerificationOutcome::failed(
                strategy,
                format!("'{}' not found on PATH", tool),
            ));
        };

        let program = path.to_string_lossy().to_string();
        let output = run_captured(&program, &self.version_args, cancel).await?;
        // Some tools print their version on stderr.
        let text = format!("{}\n{}", output.stdout, output.stderr);
        let installed = match &self.version_pattern {
            Some(re) => capture_version(re, &text),
            None => extract_version(&text),
        };

        let Some(installed) = installed else {
            return Ok(VerificationOutcome::failed(
                strategy,
                format!("Could not determine version of '{}'", program),
            ));
        };

        let outcome = if versions_match(&installed, version) {
            VerificationOutcome::verified(strategy)
        } else {
            VerificationOutcome::not_verified(strategy)
        };
        Ok(outcome
            .with_installed_version(installed)
            .with_detail(&format!("Found: {}", program)))
    }
}
