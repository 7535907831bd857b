//! Terminal host for the suit race.
//!
//! Usage: cargo run --bin suit-race -- [--seed 42] [--preset long] [--autoplay]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use suit_race::display::{describe_record, render_board, BOLD, DIM, RESET};
use suit_race::{BoardConfig, GameRng, GameState, Intent, RaceEngine, TriggerMode};

/// Play the suit race in the terminal
#[derive(Parser, Debug)]
#[command(name = "suit-race")]
#[command(about = "Four suits race to the goal row", long_about = None)]
struct Args {
    /// Random seed (defaults to entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Board preset: short or long
    #[arg(long, default_value = "short")]
    preset: String,

    /// TOML board configuration (overrides --preset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fire action tiles automatically after each draw
    #[arg(long)]
    auto_trigger: bool,

    /// Play the whole game without input
    #[arg(long)]
    autoplay: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Log engine events at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<BoardConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading board config {}", path.display()))?;
            toml::from_str::<BoardConfig>(&text)
                .with_context(|| format!("parsing board config {}", path.display()))?
        }
        None => match BoardConfig::preset(&args.preset) {
            Some(config) => config,
            None => bail!("unknown preset '{}' (expected short or long)", args.preset),
        },
    };

    if args.auto_trigger {
        config.trigger = TriggerMode::Automatic;
    }
    Ok(config)
}

fn show(state: &GameState, color: bool) {
    println!("{}", render_board(state, color));
}

fn autoplay(engine: &RaceEngine, state: &GameState, rng: &mut GameRng, color: bool) {
    let done = engine.play_out(state, rng);
    for record in done.log() {
        println!("{}", describe_record(record));
    }
    println!();
    show(&done, color);
}

fn interactive(
    engine: &RaceEngine,
    mut state: GameState,
    rng: &mut GameRng,
    color: bool,
) -> Result<()> {
    let stdin = io::stdin();
    let (dim, bold, reset) = if color { (DIM, BOLD, RESET) } else { ("", "", "") };

    show(&state, color);
    loop {
        print!(
            "{bold}d{reset}raw, {bold}a{reset} <row> activate, \
             {bold}r{reset}eset, {bold}q{reset}uit> "
        );
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "q" || line == "quit" {
            return Ok(());
        }

        let intent: Intent = match line.parse() {
            Ok(intent) => intent,
            Err(msg) => {
                println!("{dim}{msg}{reset}");
                continue;
            }
        };

        let transition = engine.apply(&state, intent, rng);
        if let Some(reason) = transition.rejected {
            println!("{dim}{reason}{reset}");
            continue;
        }
        state = transition.state;

        if let Some(record) = state.log().last() {
            println!("{}", describe_record(record));
        }
        show(&state, color);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let engine = RaceEngine::new(config).context("invalid board configuration")?;

    let mut rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    debug!(seed = rng.seed(), "session seeded");

    let color = !args.no_color;
    let state = engine.initialize(&mut rng);

    if args.autoplay {
        autoplay(&engine, &state, &mut rng, color);
        return Ok(());
    }

    if let Err(err) = interactive(&engine, state, &mut rng, color) {
        warn!(error = %err, "terminal session ended");
        return Err(err);
    }
    Ok(())
}
