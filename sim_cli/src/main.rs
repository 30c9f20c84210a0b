//! Headless Pong runner
//!
//! Plays computer-only matches at a fixed 60 Hz step and prints the
//! history record the browser would submit, one JSON document per line.

use game_core::{
    play_match, run_elimination, run_tournament, Bracket, CancelToken, Config, EliminationRound,
    FixedStep, GameRng, MatchSetup, Outcome, Params, SizeTier, TournamentOutcome,
};
use proto::ResultRecord;
use std::env;
use std::fs;
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Match,
    Tournament,
    Elimination,
}

impl Mode {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "match" => Some(Mode::Match),
            "tournament" => Some(Mode::Tournament),
            "elimination" => Some(Mode::Elimination),
            _ => None,
        }
    }

    fn default_names(self) -> Vec<String> {
        let count = match self {
            Mode::Match => 2,
            Mode::Tournament => Params::BRACKET_SIZE,
            Mode::Elimination => Params::MAX_CONTESTANTS,
        };
        (1..=count).map(|i| format!("CPU {}", i)).collect()
    }
}

#[derive(Debug)]
struct Options {
    mode: Mode,
    tier: SizeTier,
    seed: u64,
    names: Vec<String>,
    config: Option<String>,
    creator: String,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <match|tournament|elimination> [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tier <xs|s|m|l>     Settings bundle (default l)");
    eprintln!("  --seed <n>            First match seed (default 0)");
    eprintln!("  --names <a,b,...>     Contestant names");
    eprintln!("  --config <file>       JSON config overriding the tier settings");
    eprintln!("  --creator <name>      Creator recorded for tournaments (default sim)");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mode = args
        .get(1)
        .and_then(|m| Mode::parse(m))
        .ok_or_else(|| "missing or unknown mode".to_string())?;

    let mut options = Options {
        mode,
        tier: SizeTier::L,
        seed: 0,
        names: mode.default_names(),
        config: None,
        creator: "sim".to_string(),
    };

    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .ok_or_else(|| format!("{} requires a value", flag))?;
        match flag.as_str() {
            "--tier" => {
                options.tier =
                    SizeTier::parse(value).ok_or_else(|| format!("unknown tier {}", value))?
            }
            "--seed" => {
                options.seed = value
                    .parse()
                    .map_err(|_| format!("seed must be a number, got {}", value))?
            }
            "--names" => {
                options.names = value.split(',').map(|n| n.trim().to_string()).collect()
            }
            "--config" => options.config = Some(value.clone()),
            "--creator" => options.creator = value.clone(),
            other => return Err(format!("unknown option {}", other)),
        }
    }
    Ok(options)
}

fn load_config(options: &Options) -> Result<Config, String> {
    match &options.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            Config::from_json(&json).map_err(|e| format!("{}: {}", path, e))
        }
        None => Ok(Config::for_tier(options.tier)),
    }
}

fn emit(record: ResultRecord) {
    match record.to_json_body() {
        Ok(body) => println!("{}", body),
        Err(e) => tracing::error!(error = %e, "could not encode record"),
    }
}

/// Plays matches with consecutive seeds
struct Runner {
    config: Config,
    seed: u64,
    cancel: CancelToken,
}

impl Runner {
    fn play(&mut self, names: &[String], in_tournament: bool) -> Outcome {
        let setup = MatchSetup::computers(names.iter().cloned())
            .in_tournament(in_tournament)
            .seeded(self.seed);
        self.seed = self.seed.wrapping_add(1);

        let surface = (self.config.arena_width, self.config.arena_height);
        let outcome = play_match(
            setup,
            self.config.clone(),
            surface,
            &mut FixedStep::new(),
            &self.cancel,
        );
        if let Some(result) = outcome.result() {
            let line: Vec<String> = result
                .standings
                .iter()
                .map(|s| format!("{} {}", s.name, s.score))
                .collect();
            tracing::info!(
                goals = result.goals.len(),
                "{} ({} knocked out)",
                line.join(" - "),
                result.loser()
            );
        }
        outcome
    }
}

fn run(options: Options, cancel: CancelToken) -> Result<(), String> {
    let config = load_config(&options)?;
    let mut rng = GameRng::new(options.seed);
    let mut runner = Runner {
        config,
        seed: options.seed,
        cancel: cancel.clone(),
    };

    match options.mode {
        Mode::Match => match runner.play(&options.names, false) {
            Outcome::Decided(result) => {
                if let Some(record) = result.record() {
                    emit(record.into());
                }
            }
            Outcome::Void => tracing::warn!("match ended without a result"),
        },
        Mode::Tournament => {
            let mut bracket =
                Bracket::new(options.names.clone(), &mut rng.0).map_err(|e| e.to_string())?;
            let outcome = run_tournament(&mut bracket, &cancel, |pairing| {
                tracing::info!(
                    round = pairing.round,
                    number = pairing.number,
                    "{} vs {}",
                    pairing.left,
                    pairing.right
                );
                runner.play(&[pairing.left.clone(), pairing.right.clone()], true)
            })
            .map_err(|e| e.to_string())?;
            if let TournamentOutcome::Champion(champion) = outcome {
                tracing::info!(matches = bracket.matches_played(), "{} wins the bracket", champion);
            }
            if let Some(record) = bracket.record(&options.creator) {
                emit(record.into());
            }
        }
        Mode::Elimination => {
            let mut round =
                EliminationRound::new(options.names.clone()).map_err(|e| e.to_string())?;
            let outcome = run_elimination(&mut round, &cancel, |roster| runner.play(roster, true))
                .map_err(|e| e.to_string())?;
            if let TournamentOutcome::Champion(champion) = outcome {
                tracing::info!(matches = round.matches_played(), "{} survives", champion);
            }
            if let Some(record) = round.record_for(&options.creator) {
                emit(record.into());
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(args.first().map(String::as_str).unwrap_or("sim_cli"));
            process::exit(2);
        }
    };

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!(error = %e, "Ctrl-C will not stop the run cleanly");
    }

    if let Err(e) = run(options, cancel) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_per_mode() {
        let options = parse_args(&args(&["sim", "tournament"])).unwrap();
        assert_eq!(options.mode, Mode::Tournament);
        assert_eq!(options.names.len(), 8);
        assert_eq!(options.tier, SizeTier::L);

        let options = parse_args(&args(&["sim", "elimination"])).unwrap();
        assert_eq!(options.names.len(), 4);
    }

    #[test]
    fn test_flags_are_applied() {
        let options = parse_args(&args(&[
            "sim", "match", "--tier", "xs", "--seed", "9", "--names", "Ann, Bob",
        ]))
        .unwrap();
        assert_eq!(options.tier, SizeTier::Xs);
        assert_eq!(options.seed, 9);
        assert_eq!(options.names, vec!["Ann".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_bad_arguments_are_reported() {
        assert!(parse_args(&args(&["sim"])).is_err());
        assert!(parse_args(&args(&["sim", "league"])).is_err());
        assert!(parse_args(&args(&["sim", "match", "--seed"])).is_err());
        assert!(parse_args(&args(&["sim", "match", "--tier", "xl"])).is_err());
        assert!(parse_args(&args(&["sim", "match", "--speed", "3"])).is_err());
    }

    #[test]
    fn test_runner_advances_seed() {
        let mut runner = Runner {
            config: Config::for_tier(SizeTier::Xs),
            seed: 4,
            cancel: CancelToken::new(),
        };
        let outcome = runner.play(&args(&["A", "B"]), false);
        assert!(outcome.result().is_some(), "computers should finish a match");
        assert_eq!(runner.seed, 5);
    }

    #[test]
    fn test_cancelled_runner_plays_nothing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut runner = Runner {
            config: Config::new(),
            seed: 0,
            cancel,
        };
        assert_eq!(runner.play(&args(&["A", "B"]), false), Outcome::Void);
    }
}
