//! Prerequisite definitions.

use serde::{Deserialize, Serialize};

/// An external tool that must be present before anything is installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prerequisite {
    /// Display name used in log lines (e.g. "Node.js").
    pub name: String,

    /// Probe command printing the tool's version.
    pub command: String,

    /// Lowest accepted version, optionally prefixed with `v`.
    pub min_version: String,
}

impl Prerequisite {
    /// Create a prerequisite.
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        min_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            min_version: min_version.into(),
        }
    }
}

/// The tools the provisioning script itself relies on.
pub fn default_prerequisites() -> Vec<Prerequisite> {
    vec![
        Prerequisite::new("Node.js", "node --version", "v14.0.0"),
        Prerequisite::new("npm", "npm --version", "6.0.0"),
        Prerequisite::new("Git", "git --version", "2.0.0"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_node_npm_and_git() {
        let names: Vec<_> = default_prerequisites()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Node.js", "npm", "Git"]);
    }

    #[test]
    fn deserializes_from_yaml() {
        let yaml = "name: Git\ncommand: git --version\nmin_version: 2.30.0\n";
        let prereq: Prerequisite = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(prereq, Prerequisite::new("Git", "git --version", "2.30.0"));
    }
}
