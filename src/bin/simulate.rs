//! Favor engine load simulator CLI.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                     # Default: 8 threads x 10,000 actions
//!   cargo run --bin simulate -- -t 16 -p 4       # Heavy same-player contention
//!   cargo run --bin simulate -- --seed 42        # Reproducible run
//!
//! Set `RUST_LOG=debug` to see individual awards.

use favor::build_info::version_line;
use favor::core::config::{config_path, FavorConfig};
use favor::simulator::{run_simulation, SimConfig};
use std::env;
use std::process;
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let mut config = parse_args(&args);
    config.engine = FavorConfig::load();

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              FAVOR ENGINE SIMULATOR                           ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Threads:        {}", config.threads);
    println!("  Actions/Thread: {}", config.actions_per_thread);
    println!("  Players:        {}", config.players);
    println!("  Factions:       {}", config.factions);
    println!("  Max Step:       {}ms", config.max_step_millis);
    match config.sweep_interval {
        Some(interval) => println!("  Sweep Every:    {:?}", interval),
        None => println!("  Sweep Every:    {:?} (config)", config.engine.sweep_interval()),
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    if let Ok(path) = config_path() {
        if path.exists() {
            println!("  Engine Config:  {}", path.display());
        }
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);

    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let json = report.to_json();
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, json) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => eprintln!("Failed to write {}: {}", filename, e),
        }
    }

    if !report.consistent() {
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-t" | "--threads" => {
                if i + 1 < args.len() {
                    config.threads = args[i + 1].parse().unwrap_or(8);
                    i += 1;
                }
            }
            "-n" | "--actions" => {
                if i + 1 < args.len() {
                    config.actions_per_thread = args[i + 1].parse().unwrap_or(10_000);
                    i += 1;
                }
            }
            "-p" | "--players" => {
                if i + 1 < args.len() {
                    config.players = args[i + 1].parse().unwrap_or(64);
                    i += 1;
                }
            }
            "-f" | "--factions" => {
                if i + 1 < args.len() {
                    config.factions = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "--step" => {
                if i + 1 < args.len() {
                    config.max_step_millis = args[i + 1].parse().unwrap_or(1_500);
                    i += 1;
                }
            }
            "--sweep-ms" => {
                if i + 1 < args.len() {
                    if let Ok(ms) = args[i + 1].parse::<u64>() {
                        config.sweep_interval = Some(Duration::from_millis(ms));
                        i += 1;
                    }
                }
            }
            "--config-sweep" => {
                config.sweep_interval = None;
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "--quick" => {
                config = SimConfig::quick();
            }
            "--contention" => {
                config = SimConfig::contention();
            }
            "--version" => {
                println!("{}", version_line());
                process::exit(0);
            }
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Favor Engine Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -t, --threads <N>   Worker threads (default: 8)");
    println!("    -n, --actions <N>   Actions per thread (default: 10,000)");
    println!("    -p, --players <N>   Distinct players (default: 64)");
    println!("    -f, --factions <N>  Factions (default: 4)");
    println!("    --step <MS>         Max simulated millis per action (default: 1,500)");
    println!("    --sweep-ms <MS>     Real-time decay sweep interval (default: 5)");
    println!("    --config-sweep      Sweep at sweep_interval_secs from ~/.favor/config.json");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    -v, --verbose       Per-worker summaries (with RUST_LOG=debug)");
    println!("    --json              Save JSON report");
    println!("    --quick             Quick run (4 threads x 500 actions)");
    println!("    --contention        16 threads over 4 players");
    println!("    --version           Show version, build commit, date and profile");
    println!("    -h, --help          Show this help");
}
