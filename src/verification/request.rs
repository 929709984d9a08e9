//! What a strategy is asked to confirm.

/// A single verification request passed to a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationRequest {
    /// Is the package present at any version?
    Presence { package_id: String },

    /// Is the package present at exactly this version?
    Version { package_id: String, version: String },
}

impl VerificationRequest {
    /// Request a presence-only check.
    pub fn presence(package_id: &str) -> Self {
        Self::Presence {
            package_id: package_id.to_string(),
        }
    }

    /// Request an exact-version check.
    pub fn version(package_id: &str, version: &str) -> Self {
        Self::Version {
            package_id: package_id.to_string(),
            version: version.to_string(),
        }
    }

    /// Package the request is about.
    pub fn package_id(&self) -> &str {
        match self {
            Self::Presence { package_id } | Self::Version { package_id, .. } => package_id,
        }
    }

    /// Requested version, for version checks.
    pub fn requested_version(&self) -> Option<&str> {
        match self {
            Self::Presence { .. } => None,
            Self::Version { version, .. } => Some(version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_request_has_no_version() {
        let req = VerificationRequest::presence("App.Id");
        assert_eq!(req.package_id(), "App.Id");
        assert!(req.requested_version().is_none());
    }

    #[test]
    fn version_request_exposes_both() {
        let req = VerificationRequest::version("App.Id", "2.0");
        assert_eq!(req.package_id(), "App.Id");
        assert_eq!(req.requested_version(), Some("2.0"));
    }
}
