//! hitmap-gen command line entry point
//!
//! The timeline is a JSON array of 0/1 frame flags, the transition table a
//! JSON object mapping area keys to candidate areas. The prediction is
//! printed to stdout as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use hitmap_gen::{Difficulty, Predictor, Timeline, TransitionTable};

    #[derive(Parser, Debug)]
    #[command(name = "hitmap-gen")]
    #[command(about = "Place hit objects along a rhythm timeline")]
    pub struct Args {
        /// JSON array of per-frame 0/1 hit flags
        pub timeline: PathBuf,

        /// JSON transition table of area keys to candidate areas
        pub transitions: PathBuf,

        /// Song tempo in beats per minute
        #[arg(short, long, default_value_t = 120.0)]
        pub bpm: f64,

        /// Difficulty preset (medium or hard)
        #[arg(short, long, default_value = "medium", value_parser = parse_difficulty)]
        pub difficulty: Difficulty,

        /// Seed for a reproducible prediction
        #[arg(short, long)]
        pub seed: Option<u64>,
    }

    fn parse_difficulty(s: &str) -> std::result::Result<Difficulty, String> {
        Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty `{s}`"))
    }

    pub fn run(args: Args) -> Result<()> {
        let timeline_json = fs::read_to_string(&args.timeline)
            .with_context(|| format!("failed to read timeline {}", args.timeline.display()))?;
        let values: Vec<u8> =
            serde_json::from_str(&timeline_json).context("timeline is not a JSON array of 0/1")?;
        let timeline = Timeline::from_binary(&values)?;

        let table_json = fs::read_to_string(&args.transitions).with_context(|| {
            format!("failed to read transition table {}", args.transitions.display())
        })?;
        let table = TransitionTable::from_json(&table_json)?;

        log::info!(
            "{} frames, {} transition keys, {} difficulty",
            timeline.len(),
            table.len(),
            args.difficulty.as_str()
        );

        let predictor = Predictor::for_difficulty(&table, args.difficulty, args.bpm, args.seed)?;
        let prediction = predictor.predict(&timeline)?;
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let args = Args::try_parse_from(["hitmap-gen", "t.json", "m.json"]).unwrap();
            assert_eq!(args.timeline, PathBuf::from("t.json"));
            assert_eq!(args.transitions, PathBuf::from("m.json"));
            assert_eq!(args.bpm, 120.0);
            assert_eq!(args.difficulty, Difficulty::Medium);
            assert_eq!(args.seed, None);
        }

        #[test]
        fn test_all_options() {
            let args = Args::try_parse_from([
                "hitmap-gen", "t.json", "m.json", "--bpm", "174", "-d", "HARD", "-s", "9",
            ])
            .unwrap();
            assert_eq!(args.bpm, 174.0);
            assert_eq!(args.difficulty, Difficulty::Hard);
            assert_eq!(args.seed, Some(9));
        }

        #[test]
        fn test_rejects_bad_input() {
            assert!(Args::try_parse_from(["hitmap-gen", "t.json"]).is_err());
            assert!(Args::try_parse_from(["hitmap-gen", "t.json", "m.json", "--bpm", "fast"]).is_err());
            assert!(Args::try_parse_from(["hitmap-gen", "t.json", "m.json", "-d", "expert"]).is_err());
        }

        #[test]
        fn test_run_reports_missing_file() {
            let args = Args::try_parse_from(["hitmap-gen", "/nonexistent/t.json", "m.json"]).unwrap();
            let err = run(args).unwrap_err();
            assert!(err.to_string().contains("failed to read timeline"));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    cli::run(cli::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm
}
