//! Identifier newtypes shared by the ledgers, sessions, and the authority.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// A player account.
    PlayerId
);
string_id!(
    /// A faction (the collective that earns prestige).
    FactionId
);
string_id!(
    /// The domain a faction serves. Domain-specific actions only reward
    /// players whose faction serves the matching domain.
    DomainId
);
string_id!(
    /// An unlockable ability.
    AbilityId
);

/// Identifies one faction switch so its penalty is charged once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwitchEventId(Uuid);

impl SwitchEventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SwitchEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SwitchEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
