use serde::{Deserialize, Serialize};

/// A discriminated replacement rule. Regex rules compile to a
/// global-match pattern; literal rules keep their search string verbatim.
///
/// Tagged on `type` rather than expressed as subtype polymorphism, since
/// the set of variants is closed and known at compile time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplacementRule {
    Literal { search: String, replacement: String },
    Regex { search: String, replacement: String },
}

impl ReplacementRule {
    /// Canonical key used to aggregate statistics across rule
    /// applications without retaining rule objects.
    pub fn key(&self) -> String {
        match self {
            ReplacementRule::Literal { search, replacement } => {
                format!("{}->{}", search, replacement)
            }
            ReplacementRule::Regex { search, replacement } => {
                format!("r'{}'->{}", search, replacement)
            }
        }
    }
}
