//! Verification outcome types.

use serde::Serialize;

/// Method name used for outcomes synthesized by the composite verifier.
pub const COMPOSITE_METHOD: &str = "Composite";

/// Result of one verification attempt by one strategy, or the aggregate
/// produced by the composite verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    /// Whether presence (or the exact version) was confirmed.
    pub verified: bool,

    /// Human-readable diagnostic, usually set only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Name of the strategy that produced this outcome.
    pub method: String,

    /// Version the strategy observed on the system, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_version: Option<String>,

    /// Strategy-specific detail lines.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,

    /// Per-strategy outcomes behind a composite failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<CompositeDiagnostics>,
}

/// Diagnostic payload attached to composite failure outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositeDiagnostics {
    /// Package that was being verified.
    pub package_id: String,

    /// Requested version, for version checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Outcomes collected on the final attempt.
    pub outcomes: Vec<VerificationOutcome>,
}

impl VerificationOutcome {
    /// Create a successful outcome.
    pub fn verified(method: &str) -> Self {
        Self {
            verified: true,
            message: None,
            method: method.to_string(),
            installed_version: None,
            details: Vec::new(),
            diagnostics: None,
        }
    }

    /// Create a failed outcome with a diagnostic message.
    pub fn failed(method: &str, message: impl Into<String>) -> Self {
        Self {
            verified: false,
            message: Some(message.into()),
            method: method.to_string(),
            installed_version: None,
            details: Vec::new(),
            diagnostics: None,
        }
    }

    /// Create a failed outcome without a message.
    pub fn not_verified(method: &str) -> Self {
        Self {
            verified: false,
            message: None,
            method: method.to_string(),
            installed_version: None,
            details: Vec::new(),
            diagnostics: None,
        }
    }

    /// Record the version observed on the system.
    pub fn with_installed_version(mut self, version: impl Into<String>) -> Self {
        self.installed_version = Some(version.into());
        self
    }

    /// Add a detail line.
    pub fn with_detail(mut self, detail: &str) -> Self {
        self.details.push(detail.to_string());
        self
    }

    /// Attach composite diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: CompositeDiagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// The message, if present and not blank.
    pub fn failure_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Whether this outcome was synthesized by the composite verifier.
    pub fn is_composite(&self) -> bool {
        self.method == COMPOSITE_METHOD
    }
}

/// Join the non-empty failure messages of `outcomes` with `"; "`.
pub fn join_failure_messages(outcomes: &[VerificationOutcome]) -> String {
    outcomes
        .iter()
        .filter(|o| !o.verified)
        .filter_map(VerificationOutcome::failure_message)
        .collect::<Vec<_>>()
        .join("; ")
}
