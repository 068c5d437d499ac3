//! Magma Rise headless runner
//!
//! Plays seeded autopilot runs at a fixed 60 Hz and manages the leaderboard
//! file. Rendering front ends drive the same `sim::tick`.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::{Parser, Subcommand};
    use magma_rise::consts::FRAME_DT;
    use magma_rise::sim::{GamePhase, GameState, TickInput, tick};
    use magma_rise::{GameConfig, Leaderboard};

    #[derive(Parser)]
    #[command(name = "magma-rise")]
    #[command(about = "Magma Rise - guide magma through the crust to erupt", long_about = None)]
    pub struct Cli {
        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Play one autopilot run and report the result
        Run {
            /// RNG seed for the level layout
            #[arg(long, default_value_t = 1)]
            seed: u64,
            /// Give up after this many simulated seconds
            #[arg(long, default_value_t = 300.0)]
            seconds: f32,
            /// JSON tuning file (defaults apply to missing fields)
            #[arg(long)]
            config: Option<PathBuf>,
            /// Leaderboard file to record the result in
            #[arg(long)]
            leaderboard: Option<PathBuf>,
            /// Player name for the leaderboard entry
            #[arg(long, default_value = "Autopilot")]
            name: String,
        },
        /// Print the leaderboard stored in a file
        Scores {
            /// Leaderboard file
            file: PathBuf,
        },
        /// Print the default tuning as JSON
        DefaultConfig,
    }

    pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
        match cli.command {
            Commands::Run {
                seed,
                seconds,
                config,
                leaderboard,
                name,
            } => {
                let config = match config {
                    Some(path) => GameConfig::load(&path)?,
                    None => GameConfig::default(),
                };
                play(seed, seconds, &config, leaderboard.as_deref(), &name)
            }
            Commands::Scores { file } => {
                print_scores(&Leaderboard::load(&file)?);
                Ok(())
            }
            Commands::DefaultConfig => {
                println!("{}", GameConfig::default().to_json()?);
                Ok(())
            }
        }
    }

    fn play(
        seed: u64,
        seconds: f32,
        config: &GameConfig,
        leaderboard: Option<&Path>,
        name: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut state = GameState::new(seed, config);
        state.start_run(config);

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let max_frames = (seconds.max(0.0) / FRAME_DT).ceil() as u64;
        for _ in 0..max_frames {
            tick(&mut state, &input, config, FRAME_DT);
            if state.phase != GamePhase::Playing {
                break;
            }
        }

        let Some(summary) = state.last_summary else {
            println!(
                "Run still going after {:.0}s at altitude {:.0}",
                state.elapsed,
                state.magma.altitude(config)
            );
            return Ok(());
        };

        println!(
            "{:?}: score {} | altitude {:.0} | {:.1}s",
            summary.outcome, summary.score, summary.altitude, summary.elapsed
        );

        if let Some(path) = leaderboard {
            let mut board = Leaderboard::load_or_default(path);
            match board.submit(name, &summary, &today())? {
                Some(rank) => println!("New leaderboard entry at #{}", rank),
                None => println!("Not a top-{} score", magma_rise::leaderboard::MAX_ENTRIES),
            }
            board.save(path)?;
        }
        Ok(())
    }

    fn print_scores(board: &Leaderboard) {
        if board.is_empty() {
            println!("No scores yet");
            return;
        }
        for (i, e) in board.entries.iter().enumerate() {
            println!(
                "{:>2}. {:<16} {:>7} pts  {:>5.0} m  {:>6.1}s  {}",
                i + 1,
                e.name,
                e.score,
                e.altitude,
                e.time_secs,
                e.date
            );
        }
    }

    /// Current UTC date as YYYY-MM-DD
    fn today() -> String {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let (y, m, d) = civil_from_days((secs / 86_400) as i64);
        format!("{y:04}-{m:02}-{d:02}")
    }

    /// Days since 1970-01-01 to a proleptic Gregorian date
    fn civil_from_days(days: i64) -> (i64, u32, u32) {
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
        let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
        let y = yoe + era * 400 + i64::from(m <= 2);
        (y, m, d)
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Magma Rise (headless) starting...");

    if let Err(e) = cli::run(cli::Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser front ends link the library directly
}
