//! Entity identifiers
//!
//! Newtype string identifiers. `generate()` produces a fresh UUID-backed id;
//! `new()` wraps an externally supplied one.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Unique identifier for a tenant organization
    TenantId
}

string_id! {
    /// Unique identifier for a truck
    TruckId
}

string_id! {
    /// Unique identifier for a mission
    MissionId
}

string_id! {
    /// Unique identifier for a driver profile
    DriverId
}

string_id! {
    /// Unique identifier for an acting user (driver, dispatcher, approver)
    ActorId
}
