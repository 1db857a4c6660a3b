//! Integration test: reward tables
//!
//! These numbers are balance regressions; every boundary is pinned.

use favor::core::config::FavorConfig;
use favor::rewards::calculator::{
    apply_modifier, base_reward, by_combo_tier, by_magnitude, by_material_tier, derived_reward,
};
use favor::rewards::{compute, ActivityKind, MaterialTier, RewardBasis, RewardTables};

#[test]
fn test_magnitude_table_boundaries() {
    let cases = [
        (300.0, 15),
        (299.0, 12),
        (150.0, 12),
        (149.0, 10),
        (75.0, 10),
        (74.0, 8),
        (35.0, 8),
        (34.0, 5),
        (10.0, 5),
        (9.0, 3),
        (0.0, 3),
    ];
    for (weight, expected) in cases {
        assert_eq!(by_magnitude(weight), expected, "weight {}", weight);
    }
}

#[test]
fn test_derived_reward_is_half_rounded_up() {
    assert_eq!(derived_reward(by_magnitude(10.0)), 3);
    assert_eq!(derived_reward(by_magnitude(300.0)), 8);
    assert_eq!(derived_reward(by_magnitude(0.0)), 2);
}

#[test]
fn test_mining_combo_anchors() {
    let tables = RewardTables::default();
    let mining = tables.combo_table(ActivityKind::Mining);
    assert_eq!(by_combo_tier(mining, 1), 1.0);
    assert_eq!(by_combo_tier(mining, 2), 1.0);
    assert_eq!(by_combo_tier(mining, 3), 1.25);
    assert_eq!(by_combo_tier(mining, 5), 1.25);
    assert_eq!(by_combo_tier(mining, 6), 1.5);
    assert_eq!(by_combo_tier(mining, 20), 1.5);
    assert_eq!(by_combo_tier(mining, 21), 2.5);
    assert_eq!(by_combo_tier(mining, 500), 2.5);
}

#[test]
fn test_smithing_combo_anchors() {
    let tables = RewardTables::default();
    let smithing = tables.combo_table(ActivityKind::Smithing);
    assert_eq!(by_combo_tier(smithing, 1), 1.0);
    assert_eq!(by_combo_tier(smithing, 2), 1.15);
    assert_eq!(by_combo_tier(smithing, 4), 1.3);
    assert_eq!(by_combo_tier(smithing, 8), 1.5);
    assert_eq!(by_combo_tier(smithing, 14), 1.5);
    assert_eq!(by_combo_tier(smithing, 15), 1.75);
}

#[test]
fn test_tables_are_independent_per_activity() {
    let tables = RewardTables::default();
    assert_ne!(
        by_combo_tier(tables.combo_table(ActivityKind::Mining), 2),
        by_combo_tier(tables.combo_table(ActivityKind::Smithing), 2)
    );
    assert_eq!(
        by_combo_tier(tables.combo_table(ActivityKind::Foraging), 50),
        1.0
    );
}

#[test]
fn test_material_tiers() {
    let tables = RewardTables::default();
    let rewards: Vec<u32> = MaterialTier::ALL
        .iter()
        .map(|t| by_material_tier(&tables, *t))
        .collect();
    assert_eq!(rewards, vec![2, 4, 6, 10]);
}

#[test]
fn test_tool_penalty_factor() {
    assert!((apply_modifier(10.0, 0.65) - 6.5).abs() < 1e-12);
}

#[test]
fn test_compute_mining_with_combo_and_no_tool() {
    let tables = RewardTables::default();
    let reward = compute(
        &tables,
        ActivityKind::Mining,
        21,
        RewardBasis::Tier(MaterialTier::Exotic),
        false,
    )
    .unwrap();
    assert_eq!(reward.base, 10);
    assert_eq!(reward.multiplier, 2.5);
    assert!((reward.favor - 16.25).abs() < 1e-9);
    // Truncated for mining
    assert_eq!(reward.prestige, 16);
}

#[test]
fn test_compute_skinning_rounds_prestige_up() {
    let tables = RewardTables::default();
    let reward = compute(
        &tables,
        ActivityKind::Skinning,
        1,
        RewardBasis::Weight(10.0),
        false,
    )
    .unwrap();
    // ceil(5 / 2) = 3, then 3 * 0.65 = 1.95 rounds up
    assert_eq!(reward.base, 3);
    assert_eq!(reward.prestige, 2);
}

#[test]
fn test_mismatched_basis_has_no_reward() {
    let tables = RewardTables::default();
    assert!(base_reward(&tables, ActivityKind::Foraging, RewardBasis::Weight(50.0)).is_none());
    assert!(compute(
        &tables,
        ActivityKind::Skinning,
        1,
        RewardBasis::Tier(MaterialTier::Basic),
        true
    )
    .is_none());
}

#[test]
fn test_config_file_combo_table_keeps_mining_anchors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"rewards": {"combo_tables": {"Smithing": [
            {"min_combo": 2, "multiplier": 1.2},
            {"min_combo": 10, "multiplier": 2.0}
        ]}}}"#,
    )
    .unwrap();

    let config = FavorConfig::load_from(&path).unwrap();
    let tables = &config.rewards;
    assert_eq!(by_combo_tier(tables.combo_table(ActivityKind::Smithing), 10), 2.0);
    let mining = tables.combo_table(ActivityKind::Mining);
    assert_eq!(by_combo_tier(mining, 6), 1.5);
    assert_eq!(by_combo_tier(mining, 21), 2.5);
}
