// Session timing (seconds)
pub const ACTION_COOLDOWN_SECONDS: u64 = 3;
pub const SESSION_IDLE_TIMEOUT_SECONDS: u64 = 45;
pub const SESSION_DECAY_TIMEOUT_SECONDS: u64 = 90;
pub const DECAY_SWEEP_INTERVAL_SECONDS: u64 = 30;

// Faction switching
pub const SWITCH_PENALTY_FRACTION: f64 = 0.5;
// Switch events remembered per player for duplicate detection
pub const SWITCH_EVENT_MEMORY: usize = 32;

// Faction activity log
pub const ACTIVITY_LOG_CAPACITY: usize = 50;

// Share of an action's favor that flows to the faction as prestige
pub const PRESTIGE_RATIO: f64 = 1.0;

// Outbound notification queue depth
pub const NOTIFICATION_QUEUE_CAPACITY: usize = 256;

// Magnitude rewards (weight threshold, base reward), highest threshold first
pub const MAGNITUDE_REWARD_TABLE: [(f64, u32); 5] = [
    (300.0, 15),
    (150.0, 12),
    (75.0, 10),
    (35.0, 8),
    (10.0, 5),
];
pub const MAGNITUDE_REWARD_FLOOR: u32 = 3;

// Material tier rewards: Basic, Refined, Rare, Exotic
pub const MATERIAL_TIER_REWARDS: [u32; 4] = [2, 4, 6, 10];

// Reward multiplier when the action was performed without a proper tool
pub const TOOL_PENALTY_FACTOR: f64 = 0.65;

// Combo tables (minimum combo, multiplier), lowest threshold first
pub const MINING_COMBO_TABLE: [(u32, f64); 4] = [(1, 1.0), (3, 1.25), (6, 1.5), (21, 2.5)];
pub const SMITHING_COMBO_TABLE: [(u32, f64); 4] = [(2, 1.15), (4, 1.3), (8, 1.5), (15, 1.75)];

// Favor rank thresholds (lifetime favor)
pub const FAVOR_RANK_THRESHOLDS: [u64; 5] = [0, 500, 2_000, 5_000, 10_000];

// Prestige rank thresholds (lifetime faction prestige)
pub const PRESTIGE_RANK_THRESHOLDS: [u64; 5] = [0, 500, 1_500, 3_500, 7_500];

// Config file
pub const CONFIG_DIR_NAME: &str = ".favor";
pub const CONFIG_FILE_NAME: &str = "config.json";
