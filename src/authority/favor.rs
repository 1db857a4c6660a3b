//! The favor authority: the single mutating entry point of the engine.
//!
//! An action flows through eligibility, classification, the session tracker,
//! the reward calculator and then the ledgers. Every early exit before the
//! session tracker leaves combo state untouched.

use super::collaborators::{Affiliation, AffiliationLookup, Classifier};
use super::notify::{Notification, NotificationSink, NullSink};
use crate::core::clock::{Millis, TimeSource};
use crate::core::config::FavorConfig;
use crate::core::ids::{AbilityId, DomainId, FactionId, PlayerId};
use crate::ledger::{
    ActivityEntry, ActivityEvent, FactionSnapshot, FavorRank, LedgerRegistry, PrestigeRank,
    ProgressionSnapshot,
};
use crate::rewards::calculator::base_reward;
use crate::rewards::{compute, ActivityKind, MaterialTier, Reward, RewardBasis, RewardTables};
use crate::session::SessionRegistry;
use std::collections::HashMap;
use std::sync::Arc;

/// The raw size of an event, before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum RawMagnitude {
    /// Numeric weight for magnitude-rewarded activities.
    Weight(f64),
    /// Content code resolved by the activity's classifier.
    Code(String),
    /// Tier already known upstream.
    Tier(MaterialTier),
}

/// One qualifying action reported upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    pub player: PlayerId,
    /// Domain the player must belong to for this action to count.
    pub required_domain: DomainId,
    pub kind: ActivityKind,
    pub magnitude: RawMagnitude,
    pub tool_present: bool,
}

impl ActionEvent {
    pub fn new(
        player: impl Into<PlayerId>,
        required_domain: impl Into<DomainId>,
        kind: ActivityKind,
        magnitude: RawMagnitude,
    ) -> Self {
        Self {
            player: player.into(),
            required_domain: required_domain.into(),
            kind,
            magnitude,
            tool_present: true,
        }
    }

    pub fn without_tool(mut self) -> Self {
        self.tool_present = false;
        self
    }
}

/// What an accepted action paid out.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardReceipt {
    pub player: PlayerId,
    pub faction: FactionId,
    pub kind: ActivityKind,
    pub combo: u32,
    pub reward: Reward,
    /// Whole favor units that reached the balance on this call.
    pub favor_credited: u64,
    pub prestige: u64,
    pub at: Millis,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AwardOutcome {
    /// Wrong or unknown affiliation, or the lookup failed.
    Ineligible,
    /// The magnitude could not be turned into a reward basis.
    Unclassified,
    /// Rejected by the session cooldown.
    Cooldown,
    Awarded(AwardReceipt),
}

impl AwardOutcome {
    pub fn receipt(&self) -> Option<&AwardReceipt> {
        match self {
            AwardOutcome::Awarded(receipt) => Some(receipt),
            _ => None,
        }
    }

    pub fn is_awarded(&self) -> bool {
        self.receipt().is_some()
    }
}

pub struct FavorAuthority {
    ledgers: Arc<LedgerRegistry>,
    sessions: Arc<SessionRegistry>,
    tables: RewardTables,
    affiliations: Arc<dyn AffiliationLookup>,
    clock: Arc<dyn TimeSource>,
    sink: Arc<dyn NotificationSink>,
    classifiers: HashMap<ActivityKind, Classifier>,
}

impl FavorAuthority {
    /// An authority with default reward tables and no notification sink.
    pub fn new(
        ledgers: Arc<LedgerRegistry>,
        sessions: Arc<SessionRegistry>,
        affiliations: Arc<dyn AffiliationLookup>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            ledgers,
            sessions,
            tables: RewardTables::default(),
            affiliations,
            clock,
            sink: Arc::new(NullSink),
            classifiers: HashMap::new(),
        }
    }

    /// Builds fresh registries from `config` and wires them together.
    pub fn from_config(
        config: &FavorConfig,
        affiliations: Arc<dyn AffiliationLookup>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self::new(
            Arc::new(LedgerRegistry::from_config(config)),
            Arc::new(SessionRegistry::from_config(config)),
            affiliations,
            clock,
        )
        .with_rewards(config.rewards.clone())
    }

    pub fn with_rewards(mut self, tables: RewardTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_classifier<F>(mut self, kind: ActivityKind, classify: F) -> Self
    where
        F: Fn(&str) -> Option<MaterialTier> + Send + Sync + 'static,
    {
        self.classifiers.insert(kind, Arc::new(classify));
        self
    }

    pub fn ledgers(&self) -> &Arc<LedgerRegistry> {
        &self.ledgers
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn tables(&self) -> &RewardTables {
        &self.tables
    }

    /// Processes one action. Never fails: every rejection is an outcome.
    pub fn award_for_action(&self, event: &ActionEvent) -> AwardOutcome {
        let Some(affiliation) = self.eligible_affiliation(event) else {
            return AwardOutcome::Ineligible;
        };
        let Some(basis) = self.classify(event) else {
            log::trace!(
                "{}: unclassifiable {} magnitude {:?}",
                event.player,
                event.kind.name(),
                event.magnitude
            );
            return AwardOutcome::Unclassified;
        };

        let now = self.clock.now_millis();
        let session = self.sessions.record_action(event.kind, &event.player, now);
        if !session.accepted {
            log::trace!(
                "{}: {} action on cooldown (combo {})",
                event.player,
                event.kind.name(),
                session.combo
            );
            return AwardOutcome::Cooldown;
        }

        let Some(reward) = compute(
            &self.tables,
            event.kind,
            session.combo,
            basis,
            event.tool_present,
        ) else {
            return AwardOutcome::Unclassified;
        };

        let receipt = self.apply(event, &affiliation, session.combo, reward, now);
        log::debug!(
            "{}: {} x{} -> {:.2} favor, {} prestige to {}",
            receipt.player,
            receipt.kind.name(),
            receipt.combo,
            receipt.reward.favor,
            receipt.prestige,
            receipt.faction
        );
        AwardOutcome::Awarded(receipt)
    }

    fn eligible_affiliation(&self, event: &ActionEvent) -> Option<Affiliation> {
        match self.affiliations.affiliation(&event.player) {
            Ok(Some(affiliation)) if affiliation.domain == event.required_domain => {
                Some(affiliation)
            }
            Ok(_) => {
                log::trace!(
                    "{}: not affiliated with {}",
                    event.player,
                    event.required_domain
                );
                None
            }
            Err(e) => {
                log::warn!("{}: treating as ineligible: {}", event.player, e);
                None
            }
        }
    }

    fn classify(&self, event: &ActionEvent) -> Option<RewardBasis> {
        let basis = match &event.magnitude {
            RawMagnitude::Weight(weight) => RewardBasis::Weight(*weight),
            RawMagnitude::Tier(tier) => RewardBasis::Tier(*tier),
            RawMagnitude::Code(code) => {
                let classify = self.classifiers.get(&event.kind)?;
                RewardBasis::Tier(classify(code)?)
            }
        };
        // A basis the activity cannot price counts as unclassified too.
        base_reward(&self.tables, event.kind, basis).map(|_| basis)
    }

    fn apply(
        &self,
        event: &ActionEvent,
        affiliation: &Affiliation,
        combo: u32,
        reward: Reward,
        now: Millis,
    ) -> AwardReceipt {
        let mut notifications = Vec::with_capacity(4);

        let player_ledger = self.ledgers.player(&event.player);
        let favor = player_ledger.add_fractional(reward.favor);
        notifications.push(Notification::FavorAwarded {
            player: event.player.clone(),
            activity: event.kind,
            combo,
            favor: reward.favor,
            balance: favor.balance,
        });
        let before = FavorRank::from_total(favor.total_before);
        let after = FavorRank::from_total(favor.total_after);
        if after > before {
            notifications.push(Notification::FavorRankUp {
                player: event.player.clone(),
                rank: after,
            });
        }

        if reward.prestige > 0 {
            let faction_ledger = self.ledgers.faction(&affiliation.faction);
            let prestige = faction_ledger.award(
                reward.prestige,
                ActivityEntry {
                    at: now,
                    player: event.player.clone(),
                    event: ActivityEvent::Earned {
                        activity: event.kind,
                        amount: reward.prestige,
                    },
                },
            );
            notifications.push(Notification::PrestigeAwarded {
                faction: affiliation.faction.clone(),
                player: event.player.clone(),
                amount: reward.prestige,
                balance: prestige.balance,
            });
            let before = PrestigeRank::from_total(prestige.total_before);
            let after = PrestigeRank::from_total(prestige.total_after);
            if after > before {
                notifications.push(Notification::PrestigeRankUp {
                    faction: affiliation.faction.clone(),
                    rank: after,
                });
            }
        }

        // Sinks only run once both ledgers hold the award.
        for notification in notifications {
            self.notify(notification);
        }

        AwardReceipt {
            player: event.player.clone(),
            faction: affiliation.faction.clone(),
            kind: event.kind,
            combo,
            reward,
            favor_credited: favor.credited,
            prestige: reward.prestige,
            at: now,
        }
    }

    fn notify(&self, notification: Notification) {
        if let Err(e) = self.sink.notify(notification) {
            log::warn!("Dropped notification: {}", e);
        }
    }

    pub fn player_snapshot(&self, player: &PlayerId) -> Option<ProgressionSnapshot> {
        self.ledgers.find_player(player).map(|l| l.snapshot())
    }

    pub fn faction_snapshot(&self, faction: &FactionId) -> Option<FactionSnapshot> {
        self.ledgers.find_faction(faction).map(|l| l.snapshot())
    }

    pub fn player_abilities(&self, player: &PlayerId) -> Vec<AbilityId> {
        self.ledgers
            .find_player(player)
            .map(|l| l.abilities())
            .unwrap_or_default()
    }

    pub fn player_balance(&self, player: &PlayerId) -> u64 {
        self.ledgers
            .find_player(player)
            .map_or(0, |l| l.balance())
    }
}
