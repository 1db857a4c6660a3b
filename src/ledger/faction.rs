//! Per-faction prestige account, membership, and activity log.

use super::rank::PrestigeRank;
use super::Credit;
use crate::core::clock::Millis;
use crate::core::ids::{AbilityId, FactionId, PlayerId};
use crate::core::sync::lock;
use crate::rewards::ActivityKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactionRole {
    Founder,
    Officer,
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ActivityEvent {
    Earned { activity: ActivityKind, amount: u64 },
    Joined,
    Left,
    AbilityUnlocked(AbilityId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub at: Millis,
    pub player: PlayerId,
    pub event: ActivityEvent,
}

#[derive(Debug, Default)]
struct FactionState {
    balance: u64,
    total_earned: u64,
    members: BTreeSet<PlayerId>,
    roles: BTreeMap<PlayerId, FactionRole>,
    abilities: BTreeSet<AbilityId>,
    /// Newest first.
    activity: VecDeque<ActivityEntry>,
}

impl FactionState {
    fn push_activity(&mut self, entry: ActivityEntry, capacity: usize) {
        self.activity.push_front(entry);
        self.activity.truncate(capacity);
    }
}

/// A copy of a faction's account for display or serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactionSnapshot {
    pub faction_id: FactionId,
    pub balance: u64,
    pub total_earned: u64,
    pub rank: PrestigeRank,
    pub members: Vec<PlayerId>,
    pub roles: BTreeMap<PlayerId, FactionRole>,
    pub abilities: Vec<AbilityId>,
    pub activity: Vec<ActivityEntry>,
}

#[derive(Debug)]
pub struct FactionLedger {
    faction_id: FactionId,
    log_capacity: usize,
    state: Mutex<FactionState>,
}

impl FactionLedger {
    pub fn new(faction_id: FactionId, log_capacity: usize) -> Self {
        Self {
            faction_id,
            log_capacity: log_capacity.max(1),
            state: Mutex::new(FactionState::default()),
        }
    }

    pub fn faction_id(&self) -> &FactionId {
        &self.faction_id
    }

    pub fn add(&self, amount: u64) -> Credit {
        let mut state = lock(&self.state);
        let total_before = state.total_earned;
        state.balance = state.balance.saturating_add(amount);
        state.total_earned = state.total_earned.saturating_add(amount);
        Credit {
            credited: amount,
            balance: state.balance,
            total_before,
            total_after: state.total_earned,
        }
    }

    /// Adds prestige and records who earned it in one step, so the log never
    /// disagrees with the balance.
    pub fn award(&self, amount: u64, entry: ActivityEntry) -> Credit {
        let mut state = lock(&self.state);
        let total_before = state.total_earned;
        state.balance = state.balance.saturating_add(amount);
        state.total_earned = state.total_earned.saturating_add(amount);
        state.push_activity(entry, self.log_capacity);
        Credit {
            credited: amount,
            balance: state.balance,
            total_before,
            total_after: state.total_earned,
        }
    }

    /// Removes up to `amount`, clamping at zero. Returns what was removed.
    pub fn remove(&self, amount: u64) -> u64 {
        let mut state = lock(&self.state);
        let removed = amount.min(state.balance);
        state.balance -= removed;
        removed
    }

    pub fn record_activity(&self, entry: ActivityEntry) {
        lock(&self.state).push_activity(entry, self.log_capacity);
    }

    /// Adds a member. The first member of an empty faction becomes its
    /// founder regardless of `role`. Returns false if already a member.
    pub fn add_member(&self, player: PlayerId, role: FactionRole) -> bool {
        let mut state = lock(&self.state);
        if state.members.contains(&player) {
            return false;
        }
        let role = if state.members.is_empty() {
            FactionRole::Founder
        } else {
            role
        };
        state.members.insert(player.clone());
        state.roles.insert(player, role);
        true
    }

    /// Removes a member and their role. Returns false if not a member.
    pub fn remove_member(&self, player: &PlayerId) -> bool {
        let mut state = lock(&self.state);
        state.roles.remove(player);
        state.members.remove(player)
    }

    /// Changes a member's role. Non-members are ignored.
    pub fn set_role(&self, player: &PlayerId, role: FactionRole) -> bool {
        let mut state = lock(&self.state);
        if !state.members.contains(player) {
            return false;
        }
        state.roles.insert(player.clone(), role);
        true
    }

    pub fn role_of(&self, player: &PlayerId) -> Option<FactionRole> {
        lock(&self.state).roles.get(player).copied()
    }

    pub fn is_member(&self, player: &PlayerId) -> bool {
        lock(&self.state).members.contains(player)
    }

    pub fn members(&self) -> Vec<PlayerId> {
        lock(&self.state).members.iter().cloned().collect()
    }

    pub fn member_count(&self) -> usize {
        lock(&self.state).members.len()
    }

    pub fn unlock_ability(&self, id: AbilityId) -> bool {
        lock(&self.state).abilities.insert(id)
    }

    pub fn lock_ability(&self, id: &AbilityId) -> bool {
        lock(&self.state).abilities.remove(id)
    }

    pub fn clear_abilities(&self) -> usize {
        let mut state = lock(&self.state);
        let removed = state.abilities.len();
        state.abilities.clear();
        removed
    }

    pub fn has_ability(&self, id: &AbilityId) -> bool {
        lock(&self.state).abilities.contains(id)
    }

    pub fn abilities(&self) -> Vec<AbilityId> {
        lock(&self.state).abilities.iter().cloned().collect()
    }

    pub fn balance(&self) -> u64 {
        lock(&self.state).balance
    }

    pub fn total_earned(&self) -> u64 {
        lock(&self.state).total_earned
    }

    pub fn rank(&self) -> PrestigeRank {
        PrestigeRank::from_total(self.total_earned())
    }

    /// Activity entries, newest first.
    pub fn activity(&self) -> Vec<ActivityEntry> {
        lock(&self.state).activity.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> FactionSnapshot {
        let state = lock(&self.state);
        FactionSnapshot {
            faction_id: self.faction_id.clone(),
            balance: state.balance,
            total_earned: state.total_earned,
            rank: PrestigeRank::from_total(state.total_earned),
            members: state.members.iter().cloned().collect(),
            roles: state.roles.clone(),
            abilities: state.abilities.iter().cloned().collect(),
            activity: state.activity.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(at: Millis, amount: u64) -> ActivityEntry {
        ActivityEntry {
            at,
            player: PlayerId::new("alice"),
            event: ActivityEvent::Earned {
                activity: ActivityKind::Mining,
                amount,
            },
        }
    }

    #[test]
    fn test_activity_log_is_bounded_newest_first() {
        let faction = FactionLedger::new(FactionId::new("forge"), 3);
        for i in 0..5 {
            faction.award(1, entry(i, 1));
        }
        let log = faction.activity();
        assert_eq!(log.len(), 3);
        let times: Vec<Millis> = log.iter().map(|e| e.at).collect();
        assert_eq!(times, vec![4, 3, 2]);
        assert_eq!(faction.balance(), 5);
    }

    #[test]
    fn test_first_member_is_founder() {
        let faction = FactionLedger::new(FactionId::new("forge"), 10);
        assert!(faction.add_member(PlayerId::new("alice"), FactionRole::Member));
        assert!(faction.add_member(PlayerId::new("bob"), FactionRole::Member));
        assert!(!faction.add_member(PlayerId::new("bob"), FactionRole::Officer));
        assert_eq!(
            faction.role_of(&PlayerId::new("alice")),
            Some(FactionRole::Founder)
        );
        assert_eq!(
            faction.role_of(&PlayerId::new("bob")),
            Some(FactionRole::Member)
        );
    }

    #[test]
    fn test_remove_member_drops_role() {
        let faction = FactionLedger::new(FactionId::new("forge"), 10);
        faction.add_member(PlayerId::new("alice"), FactionRole::Member);
        assert!(faction.remove_member(&PlayerId::new("alice")));
        assert!(!faction.remove_member(&PlayerId::new("alice")));
        assert_eq!(faction.role_of(&PlayerId::new("alice")), None);
        assert_eq!(faction.member_count(), 0);
    }

    #[test]
    fn test_set_role_requires_membership() {
        let faction = FactionLedger::new(FactionId::new("forge"), 10);
        assert!(!faction.set_role(&PlayerId::new("ghost"), FactionRole::Officer));
        faction.add_member(PlayerId::new("alice"), FactionRole::Member);
        assert!(faction.set_role(&PlayerId::new("alice"), FactionRole::Officer));
        assert_eq!(
            faction.role_of(&PlayerId::new("alice")),
            Some(FactionRole::Officer)
        );
    }

    #[test]
    fn test_remove_clamps_at_zero() {
        let faction = FactionLedger::new(FactionId::new("forge"), 10);
        faction.add(5);
        assert_eq!(faction.remove(9), 5);
        assert_eq!(faction.balance(), 0);
        assert_eq!(faction.total_earned(), 5);
    }

    #[test]
    fn test_faction_abilities() {
        let faction = FactionLedger::new(FactionId::new("forge"), 10);
        assert!(faction.unlock_ability(AbilityId::new("bulwark")));
        assert!(!faction.unlock_ability(AbilityId::new("bulwark")));
        assert!(faction.has_ability(&AbilityId::new("bulwark")));
        assert_eq!(faction.clear_abilities(), 1);
        assert!(faction.abilities().is_empty());
    }
}
