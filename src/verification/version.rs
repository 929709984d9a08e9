//! Version extraction and comparison.

use regex::Regex;

/// Patterns tried in order when no custom pattern is configured.
const DEFAULT_VERSION_PATTERNS: &[&str] = &[
    r"(\d+\.\d+\.\d+(?:\.\d+)?)",
    r"[Vv]ersion\s*:?\s*(\d+\.\d+)",
    r"v(\d+\.\d+)",
];

/// Extract a version string from tool output using the built-in patterns.
pub fn extract_version(output: &str) -> Option<String> {
    DEFAULT_VERSION_PATTERNS.iter().find_map(|pattern| {
        Regex::new(pattern)
            .ok()
            .and_then(|re| capture_version(&re, output))
    })
}

/// Extract a version with a caller-supplied pattern.
///
/// Uses the first capture group if the pattern has one, otherwise the whole
/// match.
pub fn capture_version(pattern: &Regex, output: &str) -> Option<String> {
    let caps = pattern.captures(output)?;
    let m = caps.get(1).or_else(|| caps.get(0))?;
    let version = m.as_str().trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

/// Whether an installed version satisfies an exact-version request.
///
/// Surrounding whitespace and a single leading `v` are ignored; anything
/// else must match exactly.
pub fn versions_match(installed: &str, expected: &str) -> bool {
    normalize(installed) == normalize(expected)
}

fn normalize(version: &str) -> &str {
    let trimmed = version.trim();
    trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed)
}
