//! Operational state names
//!
//! Trucks move through named operational states defined per tenant. State
//! names arrive from multiple surfaces with inconsistent casing, so
//! `StateName` canonicalizes to trimmed uppercase at construction. All
//! equality and map lookups on state names are therefore case-insensitive.

use serde::{Deserialize, Serialize};

/// Default state names seeded into every tenant's workflow configuration.
pub mod states {
    pub const IDLE: &str = "IDLE";
    pub const DISPATCHED: &str = "DISPATCHED";
    pub const FUELED: &str = "FUELED";
    pub const HP1_WAIT: &str = "HP1_WAIT";
    pub const HP2_WAIT: &str = "HP2_WAIT";
    pub const LOADED: &str = "LOADED";
    pub const EXIT_TRANSIT: &str = "EXIT_TRANSIT";
    pub const DELIVERED: &str = "DELIVERED";
    pub const RETURNING: &str = "RETURNING";
    pub const MAINTENANCE: &str = "MAINTENANCE";
    pub const CARGO_LOST: &str = "CARGO_LOST";
}

/// A canonical-case operational state name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StateName(String);

impl StateName {
    /// Create a state name, normalizing to trimmed uppercase.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The initial status of every newly created truck.
    pub fn idle() -> Self {
        Self::new(states::IDLE)
    }

    pub fn is_idle(&self) -> bool {
        self.0 == states::IDLE
    }
}

impl From<String> for StateName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<StateName> for String {
    fn from(value: StateName) -> Self {
        value.0
    }
}

impl From<&str> for StateName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for StateName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
