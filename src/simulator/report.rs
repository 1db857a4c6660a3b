//! Simulation report generation.

use super::config::SimConfig;
use crate::authority::{AwardReceipt, FavorAuthority};
use crate::core::ids::{FactionId, PlayerId};
use crate::ledger::FavorRank;
use crate::rewards::ActivityKind;
use crate::session::SweepStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-worker counters, merged into the report after all workers join.
#[derive(Debug, Default)]
pub struct WorkerTally {
    pub cooldown: u64,
    pub ineligible: u64,
    pub unclassified: u64,
    pub receipts: Vec<AwardReceipt>,
}

impl WorkerTally {
    pub fn record(&mut self, receipt: AwardReceipt) {
        self.receipts.push(receipt);
    }
}

/// Aggregated results of one simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub seed: u64,
    pub threads: u32,
    pub total_actions: u64,

    // Outcomes
    pub awarded: u64,
    pub cooldown: u64,
    pub ineligible: u64,
    pub unclassified: u64,

    // Payouts
    pub favor_earned: f64,
    pub favor_credited: u64,
    pub prestige_awarded: u64,
    pub awards_per_activity: BTreeMap<ActivityKind, u64>,
    pub max_combo: u32,
    pub faction_prestige: BTreeMap<FactionId, u64>,
    pub favor_ranks: BTreeMap<FavorRank, u32>,

    // Sweeper
    pub sweep_passes: u64,
    pub sessions_evicted: u64,
    pub sessions_remaining: usize,

    /// Notifications that reached the queue; the rest were dropped as full.
    pub notifications_delivered: u64,

    /// Ledger states that disagree with the receipts handed out.
    pub mismatches: Vec<String>,
}

impl SimReport {
    pub fn from_tallies(
        config: &SimConfig,
        authority: &FavorAuthority,
        tallies: Vec<WorkerTally>,
        sweep: SweepStats,
        seed: u64,
    ) -> Self {
        let mut report = Self {
            seed,
            threads: config.threads,
            total_actions: config.total_actions(),
            awarded: 0,
            cooldown: 0,
            ineligible: 0,
            unclassified: 0,
            favor_earned: 0.0,
            favor_credited: 0,
            prestige_awarded: 0,
            awards_per_activity: BTreeMap::new(),
            max_combo: 0,
            faction_prestige: BTreeMap::new(),
            favor_ranks: BTreeMap::new(),
            sweep_passes: sweep.passes,
            sessions_evicted: sweep.evicted,
            sessions_remaining: authority.sessions().session_count(),
            notifications_delivered: 0,
            mismatches: Vec::new(),
        };

        let mut credited_by_player: BTreeMap<PlayerId, u64> = BTreeMap::new();
        let mut prestige_by_faction: BTreeMap<FactionId, u64> = BTreeMap::new();

        for tally in tallies {
            report.cooldown += tally.cooldown;
            report.ineligible += tally.ineligible;
            report.unclassified += tally.unclassified;
            for receipt in tally.receipts {
                report.awarded += 1;
                report.favor_earned += receipt.reward.favor;
                report.favor_credited += receipt.favor_credited;
                report.prestige_awarded += receipt.prestige;
                report.max_combo = report.max_combo.max(receipt.combo);
                *report.awards_per_activity.entry(receipt.kind).or_insert(0) += 1;
                *credited_by_player.entry(receipt.player).or_insert(0) += receipt.favor_credited;
                *prestige_by_faction.entry(receipt.faction).or_insert(0) += receipt.prestige;
            }
        }

        report.verify_players(authority, &credited_by_player);
        report.verify_factions(authority, &prestige_by_faction);
        report
    }

    fn verify_players(&mut self, authority: &FavorAuthority, expected: &BTreeMap<PlayerId, u64>) {
        for (player, credited) in expected {
            let Some(snapshot) = authority.player_snapshot(player) else {
                self.mismatches
                    .push(format!("{}: receipts but no ledger", player));
                continue;
            };
            if snapshot.balance != *credited {
                self.mismatches.push(format!(
                    "{}: balance {} != credited {}",
                    player, snapshot.balance, credited
                ));
            }
            if !(0.0..1.0).contains(&snapshot.fractional) {
                self.mismatches.push(format!(
                    "{}: fractional accumulator {} out of range",
                    player, snapshot.fractional
                ));
            }
            *self.favor_ranks.entry(snapshot.rank).or_insert(0) += 1;
        }
    }

    fn verify_factions(&mut self, authority: &FavorAuthority, expected: &BTreeMap<FactionId, u64>) {
        for (faction, prestige) in expected {
            let Some(snapshot) = authority.faction_snapshot(faction) else {
                self.mismatches
                    .push(format!("{}: receipts but no ledger", faction));
                continue;
            };
            if snapshot.balance != *prestige || snapshot.total_earned != *prestige {
                self.mismatches.push(format!(
                    "{}: balance {} / earned {} != awarded {}",
                    faction, snapshot.balance, snapshot.total_earned, prestige
                ));
            }
            self.faction_prestige.insert(faction.clone(), snapshot.balance);
        }
    }

    /// True when every ledger matches the receipts.
    pub fn consistent(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.total_actions == 0 {
            return 0.0;
        }
        self.awarded as f64 / self.total_actions as f64
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Actions: {} across {} threads (seed {})\n\n",
            self.total_actions, self.threads, self.seed
        ));

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Awarded:       {:>8} ({:.1}%)\n",
            self.awarded,
            self.acceptance_rate() * 100.0
        ));
        report.push_str(&format!("  Cooldown:      {:>8}\n", self.cooldown));
        report.push_str(&format!("  Ineligible:    {:>8}\n", self.ineligible));
        report.push_str(&format!("  Unclassified:  {:>8}\n\n", self.unclassified));

        report.push_str("── PAYOUTS ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Favor Earned:    {:.2}\n", self.favor_earned));
        report.push_str(&format!("  Favor Credited:  {}\n", self.favor_credited));
        report.push_str(&format!("  Prestige:        {}\n", self.prestige_awarded));
        report.push_str(&format!("  Max Combo:       {}\n", self.max_combo));
        for (kind, count) in &self.awards_per_activity {
            report.push_str(&format!("  {:<10} {:>8} awards\n", kind.name(), count));
        }
        report.push('\n');

        report.push_str("── FACTIONS ─────────────────────────────────────────────────────\n");
        for (faction, prestige) in &self.faction_prestige {
            report.push_str(&format!("  {:<12} {:>8} prestige\n", faction.as_str(), prestige));
        }
        report.push('\n');

        report.push_str("── PLAYER RANKS ─────────────────────────────────────────────────\n");
        for (rank, count) in &self.favor_ranks {
            report.push_str(&format!("  {:<10} {:>4}\n", rank.name(), count));
        }
        report.push('\n');

        report.push_str("── SESSIONS ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Sweep Passes:  {}\n", self.sweep_passes));
        report.push_str(&format!("  Evicted:       {}\n", self.sessions_evicted));
        report.push_str(&format!("  Remaining:     {}\n", self.sessions_remaining));
        report.push_str(&format!(
            "  Notifications: {}\n\n",
            self.notifications_delivered
        ));

        report.push_str("── CONSISTENCY ──────────────────────────────────────────────────\n");
        if self.consistent() {
            report.push_str("  OK - every ledger matches its receipts\n");
        } else {
            for mismatch in &self.mismatches {
                report.push_str(&format!("  ⚠️  {}\n", mismatch));
            }
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
