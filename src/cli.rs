//! Command-line interface for Rageborn
//!
//! Runs one headless encounter described by a JSON file.

use clap::Parser;
use std::path::PathBuf;

/// Enemy and boss combat simulator
#[derive(Parser, Debug)]
#[command(name = "rageborn")]
#[command(about = "Headless enemy and boss combat simulator")]
#[command(version)]
pub struct Args {
    /// JSON encounter file to run
    #[arg(long, value_name = "CONFIG_FILE")]
    pub encounter: PathBuf,

    /// Enemy roster RON file (overrides the encounter's roster_path)
    #[arg(long, value_name = "ROSTER_FILE")]
    pub roster: Option<PathBuf>,

    /// Output path for the combat log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum encounter duration in seconds (overrides the encounter file)
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Random seed (overrides the encounter file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log every state change and status tick
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encounter_flag_required() {
        assert!(Args::try_parse_from(["rageborn"]).is_err());
    }

    #[test]
    fn test_overrides_parse() {
        let args = Args::try_parse_from([
            "rageborn",
            "--encounter",
            "boss.json",
            "--seed",
            "7",
            "--max-duration",
            "30",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.encounter, PathBuf::from("boss.json"));
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.max_duration, Some(30.0));
        assert!(args.verbose);
        assert!(args.roster.is_none());
    }
}
