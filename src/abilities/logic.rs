//! Rank- and prerequisite-gated unlocks.

use super::types::{AbilityCatalog, AbilityGate, UnlockBlock};
use crate::core::clock::Millis;
use crate::core::ids::{AbilityId, PlayerId};
use crate::ledger::{ActivityEntry, ActivityEvent, FactionLedger, ProgressionLedger};

/// Whether `id` could be unlocked on this player's ledger right now.
pub fn player_unlock_status(
    catalog: &AbilityCatalog,
    ledger: &ProgressionLedger,
    id: &AbilityId,
) -> Result<(), UnlockBlock> {
    let def = catalog.get(id).ok_or(UnlockBlock::UnknownAbility)?;
    let AbilityGate::Player(required) = def.gate else {
        return Err(UnlockBlock::WrongScope);
    };
    if ledger.has_ability(id) {
        return Err(UnlockBlock::AlreadyUnlocked);
    }
    if ledger.rank() < required {
        return Err(UnlockBlock::RankTooLow);
    }
    if let Some(missing) = def.prerequisites.iter().find(|p| !ledger.has_ability(p)) {
        return Err(UnlockBlock::MissingPrerequisite(missing.clone()));
    }
    Ok(())
}

/// Whether `id` could be unlocked on this faction's ledger right now.
pub fn faction_unlock_status(
    catalog: &AbilityCatalog,
    ledger: &FactionLedger,
    id: &AbilityId,
) -> Result<(), UnlockBlock> {
    let def = catalog.get(id).ok_or(UnlockBlock::UnknownAbility)?;
    let AbilityGate::Faction(required) = def.gate else {
        return Err(UnlockBlock::WrongScope);
    };
    if ledger.has_ability(id) {
        return Err(UnlockBlock::AlreadyUnlocked);
    }
    if ledger.rank() < required {
        return Err(UnlockBlock::RankTooLow);
    }
    if let Some(missing) = def.prerequisites.iter().find(|p| !ledger.has_ability(p)) {
        return Err(UnlockBlock::MissingPrerequisite(missing.clone()));
    }
    Ok(())
}

/// Unlock a player ability. Returns true if newly unlocked; every rejection
/// is a silent no-op.
pub fn try_unlock_player_ability(
    catalog: &AbilityCatalog,
    ledger: &ProgressionLedger,
    id: &AbilityId,
) -> bool {
    match player_unlock_status(catalog, ledger, id) {
        Ok(()) => {
            let unlocked = ledger.unlock_ability(id.clone());
            if unlocked {
                log::debug!("{} unlocked {}", ledger.player_id(), id);
            }
            unlocked
        }
        Err(reason) => {
            log::trace!("{} cannot unlock {}: {:?}", ledger.player_id(), id, reason);
            false
        }
    }
}

/// Unlock a faction ability on behalf of `by`, recording it in the
/// faction's activity log.
pub fn try_unlock_faction_ability(
    catalog: &AbilityCatalog,
    ledger: &FactionLedger,
    id: &AbilityId,
    by: &PlayerId,
    now: Millis,
) -> bool {
    if let Err(reason) = faction_unlock_status(catalog, ledger, id) {
        log::trace!("{} cannot unlock {}: {:?}", ledger.faction_id(), id, reason);
        return false;
    }
    if !ledger.unlock_ability(id.clone()) {
        return false;
    }
    ledger.record_activity(ActivityEntry {
        at: now,
        player: by.clone(),
        event: ActivityEvent::AbilityUnlocked(id.clone()),
    });
    log::debug!("{} unlocked {}", ledger.faction_id(), id);
    true
}
