//! Ability definitions and the catalog that holds them.

use crate::core::ids::AbilityId;
use crate::ledger::{FavorRank, PrestigeRank};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Who an ability belongs to, and the rank it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityGate {
    /// Unlocked on a player ledger once the player reaches the rank.
    Player(FavorRank),
    /// Unlocked on a faction ledger once the faction reaches the rank.
    Faction(PrestigeRank),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: AbilityId,
    pub name: String,
    pub gate: AbilityGate,
    /// Abilities that must already be unlocked on the same ledger.
    #[serde(default)]
    pub prerequisites: Vec<AbilityId>,
}

impl AbilityDef {
    pub fn player(id: &str, name: &str, rank: FavorRank, prerequisites: &[&str]) -> Self {
        Self {
            id: AbilityId::new(id),
            name: name.to_string(),
            gate: AbilityGate::Player(rank),
            prerequisites: prerequisites.iter().map(|p| AbilityId::new(*p)).collect(),
        }
    }

    pub fn faction(id: &str, name: &str, rank: PrestigeRank, prerequisites: &[&str]) -> Self {
        Self {
            id: AbilityId::new(id),
            name: name.to_string(),
            gate: AbilityGate::Faction(rank),
            prerequisites: prerequisites.iter().map(|p| AbilityId::new(*p)).collect(),
        }
    }
}

/// Why an unlock did not happen. Not an error: callers treat every variant
/// as a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockBlock {
    UnknownAbility,
    WrongScope,
    RankTooLow,
    MissingPrerequisite(AbilityId),
    AlreadyUnlocked,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<AbilityDef>", into = "Vec<AbilityDef>")]
pub struct AbilityCatalog {
    defs: BTreeMap<AbilityId, AbilityDef>,
}

impl AbilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in ability tree.
    pub fn with_defaults() -> Self {
        use FavorRank::*;
        use PrestigeRank::*;

        [
            AbilityDef::player("keen_eye", "Keen Eye", Initiate, &[]),
            AbilityDef::player("steady_hand", "Steady Hand", Disciple, &["keen_eye"]),
            AbilityDef::player("deep_vein", "Deep Vein", Zealot, &["steady_hand"]),
            AbilityDef::player("master_smith", "Master Smith", Champion, &["steady_hand"]),
            AbilityDef::player(
                "avatar_form",
                "Avatar Form",
                Avatar,
                &["deep_vein", "master_smith"],
            ),
            AbilityDef::faction("shared_hearth", "Shared Hearth", Fledgling, &[]),
            AbilityDef::faction("war_banner", "War Banner", Established, &["shared_hearth"]),
            AbilityDef::faction("sacred_grove", "Sacred Grove", Renowned, &["shared_hearth"]),
            AbilityDef::faction(
                "pantheon",
                "Pantheon",
                Legendary,
                &["war_banner", "sacred_grove"],
            ),
        ]
        .into_iter()
        .collect::<Vec<_>>()
        .into()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, def: AbilityDef) {
        self.defs.insert(def.id.clone(), def);
    }

    pub fn get(&self, id: &AbilityId) -> Option<&AbilityDef> {
        self.defs.get(id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDef> {
        self.defs.values()
    }
}

impl From<Vec<AbilityDef>> for AbilityCatalog {
    fn from(defs: Vec<AbilityDef>) -> Self {
        let mut catalog = Self::new();
        for def in defs {
            catalog.insert(def);
        }
        catalog
    }
}

impl From<AbilityCatalog> for Vec<AbilityDef> {
    fn from(catalog: AbilityCatalog) -> Self {
        catalog.defs.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prerequisites_exist() {
        let catalog = AbilityCatalog::with_defaults();
        for def in catalog.iter() {
            for prereq in &def.prerequisites {
                let parent = catalog
                    .get(prereq)
                    .unwrap_or_else(|| panic!("{} needs missing {}", def.id, prereq));
                // Prerequisites live on the same kind of ledger
                assert_eq!(
                    matches!(parent.gate, AbilityGate::Player(_)),
                    matches!(def.gate, AbilityGate::Player(_))
                );
            }
        }
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            {"id": "smite", "name": "Smite", "gate": {"Player": "Zealot"}},
            {"id": "ward", "name": "Ward", "gate": {"Faction": "Fledgling"}, "prerequisites": []}
        ]"#;
        let catalog = AbilityCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(&AbilityId::new("smite")).unwrap().gate,
            AbilityGate::Player(FavorRank::Zealot)
        );
    }
}
