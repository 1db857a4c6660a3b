//! Reward table data: activity kinds, material tiers, and combo tables.

use crate::core::constants::{
    MATERIAL_TIER_REWARDS, MINING_COMBO_TABLE, PRESTIGE_RATIO, SMITHING_COMBO_TABLE,
    TOOL_PENALTY_FACTOR,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Kinds of qualifying actions. Each kind has its own session tracker and
/// its own combo table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityKind {
    Hunting,
    /// Secondary activity on a hunting kill; rewarded from the kill's weight.
    Skinning,
    Mining,
    Smithing,
    Foraging,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::Hunting,
        ActivityKind::Skinning,
        ActivityKind::Mining,
        ActivityKind::Smithing,
        ActivityKind::Foraging,
    ];

    /// Position in [`ActivityKind::ALL`].
    pub fn index(&self) -> usize {
        match self {
            ActivityKind::Hunting => 0,
            ActivityKind::Skinning => 1,
            ActivityKind::Mining => 2,
            ActivityKind::Smithing => 3,
            ActivityKind::Foraging => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivityKind::Hunting => "Hunting",
            ActivityKind::Skinning => "Skinning",
            ActivityKind::Mining => "Mining",
            ActivityKind::Smithing => "Smithing",
            ActivityKind::Foraging => "Foraging",
        }
    }

    /// Which lookup produces this activity's base reward.
    pub fn reward_source(&self) -> RewardSource {
        match self {
            ActivityKind::Hunting => RewardSource::Magnitude,
            ActivityKind::Skinning => RewardSource::DerivedMagnitude,
            ActivityKind::Mining | ActivityKind::Smithing | ActivityKind::Foraging => {
                RewardSource::MaterialTier
            }
        }
    }

    /// How this activity's integer (prestige) reward is rounded.
    pub fn rounding(&self) -> RoundingPolicy {
        match self.reward_source() {
            RewardSource::DerivedMagnitude => RoundingPolicy::Ceiling,
            RewardSource::Magnitude | RewardSource::MaterialTier => RoundingPolicy::Truncate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardSource {
    /// Threshold table over the event's weight.
    Magnitude,
    /// Half of the magnitude reward, rounded up.
    DerivedMagnitude,
    /// Categorical lookup over a classified material tier.
    MaterialTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingPolicy {
    Truncate,
    Ceiling,
}

impl RoundingPolicy {
    // Absorbs float noise such as 3.0000000000000004 before ceiling.
    const EPSILON: f64 = 1e-9;

    pub fn apply(&self, value: f64) -> u64 {
        if !value.is_finite() || value <= 0.0 {
            return 0;
        }
        match self {
            RoundingPolicy::Truncate => (value + Self::EPSILON).floor() as u64,
            RoundingPolicy::Ceiling => (value - Self::EPSILON).ceil() as u64,
        }
    }
}

/// Discrete material tiers produced by an activity's classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialTier {
    Basic,
    Refined,
    Rare,
    Exotic,
}

impl MaterialTier {
    pub const ALL: [MaterialTier; 4] = [
        MaterialTier::Basic,
        MaterialTier::Refined,
        MaterialTier::Rare,
        MaterialTier::Exotic,
    ];

    pub fn index(&self) -> usize {
        match self {
            MaterialTier::Basic => 0,
            MaterialTier::Refined => 1,
            MaterialTier::Rare => 2,
            MaterialTier::Exotic => 3,
        }
    }
}

/// One row of a combo table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboTier {
    pub min_combo: u32,
    pub multiplier: f64,
}

/// Ascending combo thresholds. The highest row whose `min_combo` is at most
/// the current combo wins; below the first row the multiplier is 1.0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ComboTier>", into = "Vec<ComboTier>")]
pub struct ComboTable {
    tiers: Vec<ComboTier>,
}

impl ComboTable {
    pub fn new(mut tiers: Vec<ComboTier>) -> Self {
        tiers.sort_by_key(|t| t.min_combo);
        tiers.dedup_by_key(|t| t.min_combo);
        Self { tiers }
    }

    pub fn from_pairs(pairs: &[(u32, f64)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(min_combo, multiplier)| ComboTier {
                    min_combo,
                    multiplier,
                })
                .collect(),
        )
    }

    /// A table that never scales the reward.
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn tiers(&self) -> &[ComboTier] {
        &self.tiers
    }

    pub fn multiplier(&self, combo: u32) -> f64 {
        self.tiers
            .iter()
            .rev()
            .find(|t| t.min_combo <= combo)
            .map(|t| t.multiplier)
            .unwrap_or(1.0)
    }
}

impl From<Vec<ComboTier>> for ComboTable {
    fn from(tiers: Vec<ComboTier>) -> Self {
        Self::new(tiers)
    }
}

impl From<ComboTable> for Vec<ComboTier> {
    fn from(table: ComboTable) -> Self {
        table.tiers
    }
}

static FLAT_COMBO: ComboTable = ComboTable { tiers: Vec::new() };

/// Base rewards per material tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRewards {
    pub basic: u32,
    pub refined: u32,
    pub rare: u32,
    pub exotic: u32,
}

impl MaterialRewards {
    pub fn get(&self, tier: MaterialTier) -> u32 {
        match tier {
            MaterialTier::Basic => self.basic,
            MaterialTier::Refined => self.refined,
            MaterialTier::Rare => self.rare,
            MaterialTier::Exotic => self.exotic,
        }
    }
}

impl Default for MaterialRewards {
    fn default() -> Self {
        let [basic, refined, rare, exotic] = MATERIAL_TIER_REWARDS;
        Self {
            basic,
            refined,
            rare,
            exotic,
        }
    }
}

/// The tunable part of the reward model. The magnitude table is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTables {
    /// Tables named in a config file replace the built-in table for that
    /// activity only.
    #[serde(deserialize_with = "merge_combo_tables")]
    pub combo_tables: BTreeMap<ActivityKind, ComboTable>,
    pub material_rewards: MaterialRewards,
    pub tool_penalty_factor: f64,
    /// Share of an action's favor credited to the faction as prestige.
    pub prestige_ratio: f64,
}

impl RewardTables {
    /// Combo table for an activity; activities without one are flat.
    pub fn combo_table(&self, kind: ActivityKind) -> &ComboTable {
        self.combo_tables.get(&kind).unwrap_or(&FLAT_COMBO)
    }
}

fn merge_combo_tables<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<ActivityKind, ComboTable>, D::Error>
where
    D: Deserializer<'de>,
{
    let configured = BTreeMap::<ActivityKind, ComboTable>::deserialize(deserializer)?;
    let mut tables = RewardTables::default().combo_tables;
    tables.extend(configured);
    Ok(tables)
}

impl Default for RewardTables {
    fn default() -> Self {
        let mut combo_tables = BTreeMap::new();
        combo_tables.insert(
            ActivityKind::Mining,
            ComboTable::from_pairs(&MINING_COMBO_TABLE),
        );
        combo_tables.insert(
            ActivityKind::Smithing,
            ComboTable::from_pairs(&SMITHING_COMBO_TABLE),
        );
        Self {
            combo_tables,
            material_rewards: MaterialRewards::default(),
            tool_penalty_factor: TOOL_PENALTY_FACTOR,
            prestige_ratio: PRESTIGE_RATIO,
        }
    }
}
