//! Faction membership changes.

use super::faction::{ActivityEntry, ActivityEvent, FactionRole};
use super::registry::LedgerRegistry;
use crate::core::clock::Millis;
use crate::core::ids::{FactionId, PlayerId, SwitchEventId};

/// What a faction switch cost the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchOutcome {
    /// Favor removed by the switch penalty (0 if this event was already charged).
    pub penalty: u64,
    pub abilities_cleared: usize,
}

/// Adds `player` to `faction`. Returns false if already a member.
pub fn join_faction(
    registry: &LedgerRegistry,
    player: &PlayerId,
    faction: &FactionId,
    role: FactionRole,
    now: Millis,
) -> bool {
    let ledger = registry.faction(faction);
    if !ledger.add_member(player.clone(), role) {
        return false;
    }
    ledger.record_activity(ActivityEntry {
        at: now,
        player: player.clone(),
        event: ActivityEvent::Joined,
    });
    true
}

/// Removes `player` from `faction`. Returns false if not a member.
pub fn leave_faction(
    registry: &LedgerRegistry,
    player: &PlayerId,
    faction: &FactionId,
    now: Millis,
) -> bool {
    let Some(ledger) = registry.find_faction(faction) else {
        return false;
    };
    if !ledger.remove_member(player) {
        return false;
    }
    ledger.record_activity(ActivityEntry {
        at: now,
        player: player.clone(),
        event: ActivityEvent::Left,
    });
    true
}

pub fn assign_role(
    registry: &LedgerRegistry,
    faction: &FactionId,
    player: &PlayerId,
    role: FactionRole,
) -> bool {
    registry
        .find_faction(faction)
        .is_some_and(|ledger| ledger.set_role(player, role))
}

/// Moves `player` from `from` to `to`, charging the switch penalty once for
/// `event` and clearing the player's abilities.
///
/// Returns `None` without changes if `from == to` or the player is not a
/// member of `from`.
pub fn switch_faction(
    registry: &LedgerRegistry,
    player: &PlayerId,
    from: &FactionId,
    to: &FactionId,
    event: SwitchEventId,
    now: Millis,
) -> Option<SwitchOutcome> {
    if from == to {
        return None;
    }
    if !leave_faction(registry, player, from, now) {
        return None;
    }
    join_faction(registry, player, to, FactionRole::Member, now);

    let ledger = registry.player(player);
    let penalty = ledger.apply_switch_penalty(event).unwrap_or(0);
    let abilities_cleared = ledger.clear_abilities();

    log::info!(
        "{} switched from {} to {} (event {}, lost {} favor, {} abilities cleared)",
        player,
        from,
        to,
        event,
        penalty,
        abilities_cleared
    );

    Some(SwitchOutcome {
        penalty,
        abilities_cleared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::AbilityId;

    #[test]
    fn test_join_and_leave_are_logged() {
        let registry = LedgerRegistry::default();
        let alice = PlayerId::new("alice");
        let forge = FactionId::new("forge");

        assert!(join_faction(&registry, &alice, &forge, FactionRole::Member, 10));
        assert!(!join_faction(&registry, &alice, &forge, FactionRole::Member, 11));
        assert!(leave_faction(&registry, &alice, &forge, 12));
        assert!(!leave_faction(&registry, &alice, &forge, 13));

        let log = registry.faction(&forge).activity();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].event, ActivityEvent::Left);
        assert_eq!(log[1].event, ActivityEvent::Joined);
    }

    #[test]
    fn test_leave_unknown_faction() {
        let registry = LedgerRegistry::default();
        assert!(!leave_faction(
            &registry,
            &PlayerId::new("alice"),
            &FactionId::new("nowhere"),
            0
        ));
    }

    #[test]
    fn test_assign_role() {
        let registry = LedgerRegistry::default();
        let forge = FactionId::new("forge");
        join_faction(&registry, &PlayerId::new("alice"), &forge, FactionRole::Member, 0);
        join_faction(&registry, &PlayerId::new("bob"), &forge, FactionRole::Member, 0);
        assert!(assign_role(&registry, &forge, &PlayerId::new("bob"), FactionRole::Officer));
        assert!(!assign_role(&registry, &forge, &PlayerId::new("carol"), FactionRole::Officer));
        assert_eq!(
            registry.faction(&forge).role_of(&PlayerId::new("bob")),
            Some(FactionRole::Officer)
        );
    }

    #[test]
    fn test_switch_charges_penalty_once() {
        let registry = LedgerRegistry::new(0.5, 10);
        let alice = PlayerId::new("alice");
        let forge = FactionId::new("forge");
        let grove = FactionId::new("grove");

        join_faction(&registry, &alice, &forge, FactionRole::Member, 0);
        registry.player(&alice).add(100);
        registry.player(&alice).unlock_ability(AbilityId::new("smite"));

        let event = SwitchEventId::new();
        let outcome = switch_faction(&registry, &alice, &forge, &grove, event, 5).unwrap();
        assert_eq!(outcome.penalty, 50);
        assert_eq!(outcome.abilities_cleared, 1);
        assert!(registry.faction(&grove).is_member(&alice));
        assert!(!registry.faction(&forge).is_member(&alice));

        // Replaying the same switch does nothing
        assert!(switch_faction(&registry, &alice, &forge, &grove, event, 6).is_none());
        assert_eq!(registry.player(&alice).balance(), 50);
    }

    #[test]
    fn test_switch_to_same_faction_is_ignored() {
        let registry = LedgerRegistry::default();
        let alice = PlayerId::new("alice");
        let forge = FactionId::new("forge");
        join_faction(&registry, &alice, &forge, FactionRole::Member, 0);
        registry.player(&alice).add(10);
        assert!(
            switch_faction(&registry, &alice, &forge, &forge, SwitchEventId::new(), 1).is_none()
        );
        assert_eq!(registry.player(&alice).balance(), 10);
    }
}
