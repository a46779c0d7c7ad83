//! Version extraction and comparison for preflight checks.
//!
//! Two comparators exist. [`legacy_lexical_compare`] is the historical
//! behavior and the default: both sides lose a leading `v` and are then
//! compared as plain strings, which misorders versions whose components have
//! different digit counts (`"9.9" > "10.0"`). [`dotted_numeric_compare`]
//! compares component by component as integers and is the correct
//! replacement; it is selected with `settings.version_compare: numeric`.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static VERSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"v?\d+(?:\.\d+)*").expect("version token pattern is valid")
});

/// How observed versions are compared with their floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionCompare {
    /// Plain string comparison after stripping a leading `v`.
    #[default]
    Lexical,
    /// Component-wise integer comparison.
    Numeric,
}

impl VersionCompare {
    /// Compare `observed` with `required`.
    ///
    /// Returns `None` when the comparison is undefined (numeric mode with a
    /// non-numeric component).
    pub fn compare(&self, observed: &str, required: &str) -> Option<Ordering> {
        match self {
            VersionCompare::Lexical => Some(legacy_lexical_compare(observed, required)),
            VersionCompare::Numeric => dotted_numeric_compare(observed, required),
        }
    }
}

/// Pull the first version-looking token out of free-form probe output.
///
/// `"git version 2.43.0.windows.1"` yields `"2.43.0"`, `"v20.11.0"` yields
/// `"v20.11.0"`. Output without any digits is returned trimmed and unchanged.
pub fn extract_version(output: &str) -> String {
    VERSION_TOKEN
        .find(output)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| output.trim().to_string())
}

/// Remove a single leading `v` marker.
pub fn strip_marker(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Legacy comparison: strip a leading `v`, then compare as raw strings.
///
/// Known limitation: `legacy_lexical_compare("9.9", "10.0")` is `Greater`.
pub fn legacy_lexical_compare(observed: &str, required: &str) -> Ordering {
    strip_marker(observed).cmp(strip_marker(required))
}

/// Compare dotted versions component by component as integers.
///
/// Missing trailing components count as zero, so `"2.0"` equals `"2.0.0"`.
/// Returns `None` if any component is not a non-negative integer.
pub fn dotted_numeric_compare(observed: &str, required: &str) -> Option<Ordering> {
    let parse = |v: &str| -> Option<Vec<u64>> {
        strip_marker(v)
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect()
    };

    let observed = parse(observed)?;
    let required = parse(required)?;
    let len = observed.len().max(required.len());

    for i in 0..len {
        let o = observed.get(i).copied().unwrap_or(0);
        let r = required.get(i).copied().unwrap_or(0);
        match o.cmp(&r) {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }
    Some(Ordering::Equal)
}
