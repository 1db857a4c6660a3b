//! Pure reward lookups.
//!
//! Every number here is a game-balance regression if it moves. The tables
//! live in [`crate::core::constants`] and [`RewardTables`]; this module only
//! selects rows and applies the rounding policy of each activity.

use super::types::{ActivityKind, ComboTable, MaterialTier, RewardSource, RewardTables};
use crate::core::constants::{MAGNITUDE_REWARD_FLOOR, MAGNITUDE_REWARD_TABLE};

/// What the base reward is looked up from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewardBasis {
    Weight(f64),
    Tier(MaterialTier),
}

/// Result of a reward computation for one accepted action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reward {
    /// Table reward before combo and modifiers.
    pub base: u32,
    pub multiplier: f64,
    /// Individual favor; fractional parts are kept by the ledger.
    pub favor: f64,
    /// Collective prestige, already rounded per the activity's policy.
    pub prestige: u64,
}

/// Base reward for an event of the given weight.
///
/// Selects the highest threshold row whose minimum is at most `weight`:
/// ≥300→15, ≥150→12, ≥75→10, ≥35→8, ≥10→5, otherwise 3.
pub fn by_magnitude(weight: f64) -> u32 {
    MAGNITUDE_REWARD_TABLE
        .iter()
        .find(|(min, _)| weight >= *min)
        .map(|(_, reward)| *reward)
        .unwrap_or(MAGNITUDE_REWARD_FLOOR)
}

/// Reward for the secondary activity on the same event: half, rounded up.
pub fn derived_reward(base: u32) -> u32 {
    base.div_ceil(2)
}

pub fn by_combo_tier(table: &ComboTable, combo: u32) -> f64 {
    table.multiplier(combo)
}

pub fn by_material_tier(tables: &RewardTables, tier: MaterialTier) -> u32 {
    tables.material_rewards.get(tier)
}

pub fn apply_modifier(base: f64, factor: f64) -> f64 {
    base * factor
}

/// Base reward for `kind`, or `None` when the basis does not fit the
/// activity (a weight for a tiered activity or the reverse).
pub fn base_reward(tables: &RewardTables, kind: ActivityKind, basis: RewardBasis) -> Option<u32> {
    match (kind.reward_source(), basis) {
        (RewardSource::Magnitude, RewardBasis::Weight(w)) => Some(by_magnitude(w)),
        (RewardSource::DerivedMagnitude, RewardBasis::Weight(w)) => {
            Some(derived_reward(by_magnitude(w)))
        }
        (RewardSource::MaterialTier, RewardBasis::Tier(tier)) => {
            Some(by_material_tier(tables, tier))
        }
        _ => None,
    }
}

/// Full reward for one accepted action at `combo`.
pub fn compute(
    tables: &RewardTables,
    kind: ActivityKind,
    combo: u32,
    basis: RewardBasis,
    tool_present: bool,
) -> Option<Reward> {
    let base = base_reward(tables, kind, basis)?;
    let multiplier = by_combo_tier(tables.combo_table(kind), combo);

    let mut favor = base as f64 * multiplier;
    if !tool_present {
        favor = apply_modifier(favor, tables.tool_penalty_factor);
    }
    let prestige = kind
        .rounding()
        .apply(apply_modifier(favor, tables.prestige_ratio));

    Some(Reward {
        base,
        multiplier,
        favor,
        prestige,
    })
}
