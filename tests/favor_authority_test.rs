//! Integration test: the award pipeline end to end
//!
//! eligibility → session → reward → ledgers → notifications, driven by a
//! manual clock.

use favor::abilities::{try_unlock_faction_ability, try_unlock_player_ability, AbilityCatalog};
use favor::authority::{
    ActionEvent, Affiliation, AwardOutcome, ChannelSink, CollaboratorError, FavorAuthority,
    Notification, RawMagnitude, StaticAffiliations,
};
use favor::core::config::FavorConfig;
use favor::core::ids::{AbilityId, FactionId, PlayerId};
use favor::core::{ManualClock, TimeSource};
use favor::ledger::{ActivityEvent, FavorRank, PrestigeRank};
use favor::rewards::{ActivityKind, MaterialTier};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

struct World {
    authority: FavorAuthority,
    clock: Arc<ManualClock>,
    affiliations: Arc<StaticAffiliations>,
}

fn world() -> World {
    let clock = Arc::new(ManualClock::new(1_000_000));
    let affiliations = Arc::new(StaticAffiliations::new());
    affiliations.set(PlayerId::new("alice"), Affiliation::new("forge", "earth"));
    affiliations.set(PlayerId::new("bob"), Affiliation::new("forge", "earth"));
    affiliations.set(PlayerId::new("cleo"), Affiliation::new("grove", "wild"));
    let authority =
        FavorAuthority::from_config(&FavorConfig::default(), affiliations.clone(), clock.clone())
            .with_classifier(ActivityKind::Mining, |code| {
                code.strip_prefix("ore_").and_then(|rest| match rest {
                    "tin" => Some(MaterialTier::Basic),
                    "iron" => Some(MaterialTier::Refined),
                    "gold" => Some(MaterialTier::Rare),
                    "star" => Some(MaterialTier::Exotic),
                    _ => None,
                })
            });
    World {
        authority,
        clock,
        affiliations,
    }
}

fn mine(player: &str, domain: &str, code: &str) -> ActionEvent {
    ActionEvent::new(
        player,
        domain,
        ActivityKind::Mining,
        RawMagnitude::Code(code.to_string()),
    )
}

#[test]
fn test_ineligible_call_does_not_start_combo() {
    let w = world();
    let wrong = mine("alice", "wild", "ore_iron");
    assert_eq!(w.authority.award_for_action(&wrong), AwardOutcome::Ineligible);

    // Immediately afterwards: no cooldown, combo starts at 1
    let outcome = w.authority.award_for_action(&mine("alice", "earth", "ore_iron"));
    assert_eq!(outcome.receipt().unwrap().combo, 1);
}

#[test]
fn test_combo_scales_mining_rewards() {
    let w = world();
    let alice = PlayerId::new("alice");
    let mut favors = Vec::new();
    for _ in 0..6 {
        let outcome = w.authority.award_for_action(&mine("alice", "earth", "ore_star"));
        favors.push(outcome.receipt().unwrap().reward.favor);
        w.clock.advance_secs(5);
    }
    // 10 x [1.0, 1.0, 1.25, 1.25, 1.25, 1.5]
    assert_eq!(favors, vec![10.0, 10.0, 12.5, 12.5, 12.5, 15.0]);
    assert_eq!(w.authority.player_balance(&alice), 72);

    let snapshot = w.authority.player_snapshot(&alice).unwrap();
    assert!((snapshot.fractional - 0.5).abs() < 1e-9);
}

#[test]
fn test_idle_gap_resets_combo_through_authority() {
    let w = world();
    w.authority.award_for_action(&mine("alice", "earth", "ore_tin"));
    w.clock.advance_secs(10);
    w.authority.award_for_action(&mine("alice", "earth", "ore_tin"));
    w.clock.advance_secs(10);
    let third = w.authority.award_for_action(&mine("alice", "earth", "ore_tin"));
    assert_eq!(third.receipt().unwrap().combo, 3);

    w.clock.advance_secs(46);
    let fresh = w.authority.award_for_action(&mine("alice", "earth", "ore_tin"));
    assert_eq!(fresh.receipt().unwrap().combo, 1);
}

#[test]
fn test_prestige_goes_to_the_players_faction() {
    let w = world();
    w.authority.award_for_action(&mine("alice", "earth", "ore_gold"));
    w.authority.award_for_action(&mine("bob", "earth", "ore_gold"));
    w.authority.award_for_action(&ActionEvent::new(
        "cleo",
        "wild",
        ActivityKind::Hunting,
        RawMagnitude::Weight(80.0),
    ));

    let forge = w
        .authority
        .faction_snapshot(&FactionId::new("forge"))
        .unwrap();
    assert_eq!(forge.balance, 12);
    assert_eq!(forge.activity.len(), 2);
    assert!(matches!(
        forge.activity[0].event,
        ActivityEvent::Earned {
            activity: ActivityKind::Mining,
            amount: 6
        }
    ));

    let grove = w
        .authority
        .faction_snapshot(&FactionId::new("grove"))
        .unwrap();
    assert_eq!(grove.balance, 10);
}

#[test]
fn test_affiliation_change_takes_effect_immediately() {
    let w = world();
    assert!(w
        .authority
        .award_for_action(&mine("alice", "earth", "ore_tin"))
        .is_awarded());

    w.affiliations
        .set(PlayerId::new("alice"), Affiliation::new("grove", "wild"));
    w.clock.advance_secs(5);
    assert_eq!(
        w.authority
            .award_for_action(&mine("alice", "earth", "ore_tin")),
        AwardOutcome::Ineligible
    );
}

#[test]
fn test_lookup_fault_awards_nothing() {
    let clock = Arc::new(ManualClock::new(0));
    let flaky = |player: &PlayerId| -> Result<Option<Affiliation>, CollaboratorError> {
        if player.as_str() == "alice" {
            Err(CollaboratorError::LookupFailed("timeout".to_string()))
        } else {
            Ok(Some(Affiliation::new("forge", "earth")))
        }
    };
    let authority = FavorAuthority::from_config(&FavorConfig::default(), Arc::new(flaky), clock);

    assert_eq!(
        authority.award_for_action(&mine("alice", "earth", "ore_tin")),
        AwardOutcome::Ineligible
    );
    assert!(authority
        .sessions()
        .session(ActivityKind::Mining, &PlayerId::new("alice"))
        .is_none());
}

#[test]
fn test_notifications_are_sent_and_full_sink_never_blocks() {
    let w = world();
    let (sink, rx) = ChannelSink::bounded(2);
    let authority = w.authority.with_sink(Arc::new(sink));

    // Each award sends two notifications; the second award overflows
    for _ in 0..2 {
        let outcome = authority.award_for_action(&mine("alice", "earth", "ore_iron"));
        assert!(outcome.is_awarded());
        w.clock.advance_secs(5);
    }

    let received: Vec<Notification> = rx.try_iter().collect();
    assert_eq!(received.len(), 2);
    assert!(matches!(received[0], Notification::FavorAwarded { .. }));
    assert!(matches!(received[1], Notification::PrestigeAwarded { .. }));
    // The dropped notifications did not undo the second award
    assert_eq!(authority.player_balance(&PlayerId::new("alice")), 8);
}

#[test]
fn test_disconnected_sink_is_ignored() {
    let w = world();
    let (sink, rx) = ChannelSink::bounded(4);
    drop(rx);
    let authority = w.authority.with_sink(Arc::new(sink));
    assert!(authority
        .award_for_action(&mine("alice", "earth", "ore_iron"))
        .is_awarded());
}

#[test]
fn test_rank_up_notifications() {
    let w = world();
    let (sink, rx) = ChannelSink::bounded(1024);
    let authority = w.authority.with_sink(Arc::new(sink));

    let mut combo_awards = 0;
    while authority.player_snapshot(&PlayerId::new("cleo")).map_or(0, |s| s.total_earned)
        < FavorRank::Disciple.threshold()
    {
        let outcome = authority.award_for_action(&ActionEvent::new(
            "cleo",
            "wild",
            ActivityKind::Hunting,
            RawMagnitude::Weight(300.0),
        ));
        assert!(outcome.is_awarded());
        w.clock.advance_secs(5);
        combo_awards += 1;
    }
    assert_eq!(combo_awards, 34);

    let notes: Vec<Notification> = rx.try_iter().collect();
    assert!(notes.contains(&Notification::FavorRankUp {
        player: PlayerId::new("cleo"),
        rank: FavorRank::Disciple,
    }));
    assert!(notes.contains(&Notification::PrestigeRankUp {
        faction: FactionId::new("grove"),
        rank: PrestigeRank::Established,
    }));
}

#[test]
fn test_earned_favor_unlocks_abilities() {
    let w = world();
    let catalog = AbilityCatalog::with_defaults();
    let alice = PlayerId::new("alice");

    w.authority.award_for_action(&mine("alice", "earth", "ore_tin"));
    let ledger = w.authority.ledgers().player(&alice);

    assert!(try_unlock_player_ability(&catalog, &ledger, &AbilityId::new("keen_eye")));
    assert!(!try_unlock_player_ability(&catalog, &ledger, &AbilityId::new("keen_eye")));
    // Disciple rank not reached yet
    assert!(!try_unlock_player_ability(&catalog, &ledger, &AbilityId::new("steady_hand")));
    assert_eq!(w.authority.player_abilities(&alice), vec![AbilityId::new("keen_eye")]);

    let forge = w.authority.ledgers().faction(&FactionId::new("forge"));
    assert!(try_unlock_faction_ability(
        &catalog,
        &forge,
        &AbilityId::new("shared_hearth"),
        &alice,
        w.clock.now_millis()
    ));
}

#[test]
fn test_concurrent_awards_match_ledgers() {
    let w = world();
    let total_favor = AtomicU32::new(0);

    thread::scope(|s| {
        for name in ["alice", "bob"] {
            let authority = &w.authority;
            let total_favor = &total_favor;
            s.spawn(move || {
                for _ in 0..50 {
                    if let AwardOutcome::Awarded(receipt) =
                        authority.award_for_action(&mine(name, "earth", "ore_tin"))
                    {
                        total_favor.fetch_add(receipt.favor_credited as u32, Ordering::Relaxed);
                    }
                }
            });
        }
        for _ in 0..50 {
            w.clock.advance_secs(1);
            thread::yield_now();
        }
    });

    let alice = w.authority.player_balance(&PlayerId::new("alice"));
    let bob = w.authority.player_balance(&PlayerId::new("bob"));
    assert_eq!(alice + bob, total_favor.load(Ordering::Relaxed) as u64);

    let forge = w
        .authority
        .faction_snapshot(&FactionId::new("forge"))
        .unwrap();
    assert_eq!(forge.balance, forge.total_earned);
}
