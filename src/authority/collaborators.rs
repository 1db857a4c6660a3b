//! Inputs the authority consumes but does not own.

use super::error::CollaboratorError;
use crate::core::ids::{DomainId, FactionId, PlayerId};
use crate::core::sync::{read, write};
use crate::rewards::MaterialTier;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Where a player currently belongs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Affiliation {
    pub faction: FactionId,
    pub domain: DomainId,
}

impl Affiliation {
    pub fn new(faction: impl Into<FactionId>, domain: impl Into<DomainId>) -> Self {
        Self {
            faction: faction.into(),
            domain: domain.into(),
        }
    }
}

/// Resolves a player's current affiliation. `Ok(None)` means unaffiliated.
pub trait AffiliationLookup: Send + Sync {
    fn affiliation(&self, player: &PlayerId) -> Result<Option<Affiliation>, CollaboratorError>;
}

/// Maps a raw content code to a material tier. Must be pure.
pub type Classifier = Arc<dyn Fn(&str) -> Option<MaterialTier> + Send + Sync>;

/// In-memory affiliation table, used by tests and the simulator.
#[derive(Debug, Default)]
pub struct StaticAffiliations {
    entries: RwLock<HashMap<PlayerId, Affiliation>>,
}

impl StaticAffiliations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, player: PlayerId, affiliation: Affiliation) {
        write(&self.entries).insert(player, affiliation);
    }

    pub fn remove(&self, player: &PlayerId) -> Option<Affiliation> {
        write(&self.entries).remove(player)
    }
}

impl AffiliationLookup for StaticAffiliations {
    fn affiliation(&self, player: &PlayerId) -> Result<Option<Affiliation>, CollaboratorError> {
        Ok(read(&self.entries).get(player).cloned())
    }
}

impl<F> AffiliationLookup for F
where
    F: Fn(&PlayerId) -> Result<Option<Affiliation>, CollaboratorError> + Send + Sync,
{
    fn affiliation(&self, player: &PlayerId) -> Result<Option<Affiliation>, CollaboratorError> {
        self(player)
    }
}
