//! Rageborn - headless enemy and boss combat simulator
//!
//! Loads an encounter, runs it to completion on a fixed clock and prints
//! the outcome.

use bevy::log::Level;
use std::path::Path;
use std::process::ExitCode;

use rageborn::cli::{parse_args, Args};
use rageborn::enemy::roster::{load_default_roster, EnemyRoster};
use rageborn::headless::{run_encounter, EncounterConfig, EncounterResult};

fn main() -> ExitCode {
    let args = parse_args();
    match run(&args) {
        Ok(result) => {
            print_result(&result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<EncounterResult, String> {
    let mut config = EncounterConfig::load_from_file(&args.encounter)?;
    if let Some(output) = &args.output {
        config.output_path = Some(output.display().to_string());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    config.validate()?;

    let roster = match (&args.roster, &config.roster_path) {
        (Some(path), _) => EnemyRoster::load_from_file(path)?,
        (None, Some(path)) => EnemyRoster::load_from_file(Path::new(path))?,
        (None, None) => load_default_roster(),
    };

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    run_encounter(&config, roster, Some(level))
}

fn print_result(result: &EncounterResult) {
    println!("Outcome: {} after {:.1}s", result.outcome.name(), result.elapsed_secs);
    println!(
        "Player: {}/{} HP, {} coins collected",
        result.player_final_health, result.player_max_health, result.coins_collected
    );
    for enemy in &result.enemies {
        let status = match enemy.death_time {
            Some(at) => format!("died at {:.1}s", at),
            None => "survived".to_string(),
        };
        println!(
            "  {:<12} {}/{} HP, {} damage taken, phase {}, {}",
            enemy.name, enemy.final_health, enemy.max_health, enemy.damage_taken, enemy.final_phase, status
        );
    }
    if let Some(seed) = result.random_seed {
        println!("Seed: {}", seed);
    }
}
