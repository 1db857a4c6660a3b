//! Multi-threaded simulation runner.
//!
//! Workers share one `FavorAuthority` and one manual clock. Each worker
//! advances the clock by a random step after every action, so cooldowns,
//! combo resets and decay evictions all occur while the sweeper runs.

use super::config::SimConfig;
use super::report::{SimReport, WorkerTally};
use crate::authority::{
    ActionEvent, Affiliation, AwardOutcome, ChannelSink, FavorAuthority, Notification,
    RawMagnitude, StaticAffiliations,
};
use crate::core::clock::ManualClock;
use crate::core::ids::{DomainId, FactionId, PlayerId};
use crate::rewards::{ActivityKind, MaterialTier};
use crate::session::DecaySweeper;
use crossbeam_channel::{bounded, select, Receiver};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Content codes the simulated classifiers understand. The last one is
/// deliberately unknown.
const MATERIAL_CODES: [&str; 5] = ["basic", "refined", "rare", "exotic", "rubble"];

fn classify_material(code: &str) -> Option<MaterialTier> {
    match code {
        "basic" => Some(MaterialTier::Basic),
        "refined" => Some(MaterialTier::Refined),
        "rare" => Some(MaterialTier::Rare),
        "exotic" => Some(MaterialTier::Exotic),
        _ => None,
    }
}

fn player_id(index: u32) -> PlayerId {
    PlayerId::new(format!("player-{}", index))
}

fn faction_of(index: u32, config: &SimConfig) -> (FactionId, DomainId) {
    let f = index % config.factions.max(1);
    (
        FactionId::new(format!("faction-{}", f)),
        DomainId::new(format!("domain-{}", f)),
    )
}

/// Run the simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let base_seed = config.seed.unwrap_or_else(rand::random);

    let affiliations = Arc::new(StaticAffiliations::new());
    for i in 0..config.players {
        let (faction, domain) = faction_of(i, config);
        affiliations.set(player_id(i), Affiliation { faction, domain });
    }

    let clock = Arc::new(ManualClock::new(0));
    let (sink, notifications) = ChannelSink::from_config(&config.engine);
    let authority = FavorAuthority::from_config(&config.engine, affiliations, clock.clone())
        .with_sink(Arc::new(sink))
        .with_classifier(ActivityKind::Mining, classify_material)
        .with_classifier(ActivityKind::Smithing, classify_material)
        .with_classifier(ActivityKind::Foraging, classify_material);

    let sessions = Arc::clone(authority.sessions());
    let spawned = match config.sweep_interval {
        Some(interval) => DecaySweeper::spawn(sessions, clock.clone(), interval),
        None => DecaySweeper::from_config(sessions, clock.clone(), &config.engine),
    };
    let sweeper = match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("Running without decay sweeper: {}", e);
            None
        }
    };

    let (done_tx, done_rx) = bounded::<()>(0);
    let (tallies, delivered) = thread::scope(|scope| {
        let drain = scope.spawn(|| drain_notifications(&notifications, &done_rx));
        let workers: Vec<_> = (0..config.threads)
            .map(|worker| {
                let authority = &authority;
                let clock = &clock;
                let seed = base_seed.wrapping_add(worker as u64);
                scope.spawn(move || run_worker(config, authority, clock, seed))
            })
            .collect();
        let tallies: Vec<WorkerTally> = workers
            .into_iter()
            .filter_map(|w| w.join().ok())
            .collect();
        drop(done_tx);
        (tallies, drain.join().unwrap_or(0))
    });

    let sweep_stats = sweeper.map(|s| s.stop()).unwrap_or_default();

    let mut report =
        SimReport::from_tallies(config, &authority, tallies, sweep_stats, base_seed);
    report.notifications_delivered = delivered;
    if config.verbosity >= 1 {
        log::info!(
            "Simulation finished: {} awarded, {} on cooldown, consistent = {}",
            report.awarded,
            report.cooldown,
            report.consistent()
        );
    }
    report
}

/// Counts notifications until `done` disconnects, then empties the queue.
fn drain_notifications(rx: &Receiver<Notification>, done: &Receiver<()>) -> u64 {
    let mut delivered = 0;
    loop {
        select! {
            recv(rx) -> msg => match msg {
                Ok(_) => delivered += 1,
                Err(_) => break,
            },
            recv(done) -> _ => break,
        }
    }
    delivered + rx.try_iter().count() as u64
}

fn run_worker(
    config: &SimConfig,
    authority: &FavorAuthority,
    clock: &ManualClock,
    seed: u64,
) -> WorkerTally {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tally = WorkerTally::default();

    for _ in 0..config.actions_per_thread {
        let event = random_event(config, &mut rng);
        match authority.award_for_action(&event) {
            AwardOutcome::Awarded(receipt) => tally.record(receipt),
            AwardOutcome::Cooldown => tally.cooldown += 1,
            AwardOutcome::Ineligible => tally.ineligible += 1,
            AwardOutcome::Unclassified => tally.unclassified += 1,
        }
        if config.max_step_millis > 0 {
            clock.advance(Duration::from_millis(
                rng.gen_range(0..=config.max_step_millis),
            ));
        }
    }

    if config.verbosity >= 2 {
        log::debug!(
            "Worker (seed {}) done: {} awarded, {} cooldown",
            seed,
            tally.receipts.len(),
            tally.cooldown
        );
    }
    tally
}

fn random_event(config: &SimConfig, rng: &mut ChaCha8Rng) -> ActionEvent {
    let index = rng.gen_range(0..config.players.max(1));
    let (_, own_domain) = faction_of(index, config);
    let domain = if rng.gen_bool(config.eligible_rate.clamp(0.0, 1.0)) {
        own_domain
    } else {
        DomainId::new("elsewhere")
    };

    let kind = ActivityKind::ALL[rng.gen_range(0..ActivityKind::ALL.len())];
    let magnitude = match kind {
        ActivityKind::Hunting | ActivityKind::Skinning => {
            RawMagnitude::Weight(rng.gen_range(0.0..400.0))
        }
        _ => RawMagnitude::Code(
            MATERIAL_CODES[rng.gen_range(0..MATERIAL_CODES.len())].to_string(),
        ),
    };

    let event = ActionEvent::new(player_id(index), domain, kind, magnitude);
    if rng.gen_bool(config.tool_rate.clamp(0.0, 1.0)) {
        event
    } else {
        event.without_tool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FavorConfig;

    #[test]
    fn test_quick_run_is_consistent() {
        let config = SimConfig {
            seed: Some(7),
            verbosity: 0,
            ..SimConfig::quick()
        };
        let report = run_simulation(&config);
        assert_eq!(report.total_actions, config.total_actions());
        assert_eq!(
            report.awarded + report.cooldown + report.ineligible + report.unclassified,
            report.total_actions
        );
        assert!(report.awarded > 0);
        assert!(report.consistent(), "{:?}", report.mismatches);
        assert!(report.notifications_delivered > 0);
    }

    #[test]
    fn test_engine_config_drives_the_run() {
        let mut engine = FavorConfig::default();
        engine.session.cooldown_secs = 10;
        engine.session.idle_timeout_secs = 60;
        engine.session.decay_timeout_secs = 120;
        engine.notification_capacity = 1;
        let config = SimConfig {
            threads: 2,
            actions_per_thread: 200,
            players: 2,
            max_step_millis: 100,
            seed: Some(3),
            verbosity: 0,
            sweep_interval: None,
            engine,
            ..SimConfig::quick()
        };
        let report = run_simulation(&config);
        assert!(report.consistent(), "{:?}", report.mismatches);
        // 400 actions over at most 40s of simulated time, 10s cooldown
        assert!(report.awarded <= 2 * 5 * 5);
        assert!(report.cooldown > 0);
    }

    #[test]
    fn test_classifier() {
        assert_eq!(classify_material("rare"), Some(MaterialTier::Rare));
        assert_eq!(classify_material("rubble"), None);
    }
}
