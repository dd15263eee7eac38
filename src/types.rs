/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Lifecycle state of a project record.
///
/// The wire vocabulary is closed: anything other than the two literal
/// spellings below is rejected wherever a status is accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectStatus {
    Ongoing,
    Completed,
}

impl ProjectStatus {
    /// Strict parse. Callers trim before calling; no other normalization.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ONGOING" => Some(ProjectStatus::Ongoing),
            "COMPLETED" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Ongoing => "ONGOING",
            ProjectStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_only_exact_spellings() {
        assert_eq!(ProjectStatus::parse("ONGOING"), Some(ProjectStatus::Ongoing));
        assert_eq!(ProjectStatus::parse("COMPLETED"), Some(ProjectStatus::Completed));
        assert_eq!(ProjectStatus::parse("ongoing"), None);
        assert_eq!(ProjectStatus::parse("Completed"), None);
        assert_eq!(ProjectStatus::parse(""), None);
        assert_eq!(ProjectStatus::parse("DONE"), None);
    }
}
