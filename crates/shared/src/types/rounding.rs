//! Per-group rounding policy.

use serde::{Deserialize, Serialize};

/// How fractional share amounts are resolved to whole minor units.
///
/// This is a property of the group and is always passed explicitly into the
/// settlement engine; nothing reads it from ambient state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Round every share away from zero, then hand back the surplus.
    #[serde(alias = "up")]
    RoundUp,
    /// Truncate every share toward zero, then hand out the shortfall.
    #[serde(alias = "down")]
    RoundDown,
    /// Shares must already be whole minor units.
    #[default]
    None,
}

impl RoundingPolicy {
    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoundUp => "round_up",
            Self::RoundDown => "round_down",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoundingPolicy {
    type Err = String;

    /// Accepts both the canonical names and the stored group option
    /// spellings (`up`, `down`, `none`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "round_up" | "up" => Ok(Self::RoundUp),
            "round_down" | "down" => Ok(Self::RoundDown),
            "none" => Ok(Self::None),
            _ => Err(format!("Unknown rounding policy: {s}")),
        }
    }
}
