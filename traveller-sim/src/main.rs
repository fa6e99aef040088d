mod report;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{self, BufWriter, Stdout, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use report::{RunRecord, generate_console_report, generate_json_report, summarize};
use traveller_game::{AgentKind, Game, MapDefinition, Road, Settings, parse_map};

/// Roads a smart player can chain per decision before the exhaustive search
/// gets noticeably slow.
const DEEP_SEARCH_ROADS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Coloured standings for a terminal
    Console,
    /// Machine-readable runs and per-agent summary
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "traveller-sim", version)]
#[command(about = "Plays seeded Nordic Traveller games headlessly and reports the standings")]
struct Args {
    /// Map file describing countries, cities and roads
    #[arg(long)]
    map: PathBuf,

    /// Seed of the first run (defaults to the map's `game` line, then 0)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of runs; the game is reset with a fresh seed between runs
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// Steps per run
    #[arg(long)]
    steps: Option<u32>,

    /// JSON settings file; flags below override its fields
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Toll withheld by border cities from foreigners, in percent
    #[arg(long)]
    toll: Option<u8>,

    /// Robbery chance in mafia countries, in percent
    #[arg(long)]
    risk: Option<u8>,

    /// Smallest robbery loss
    #[arg(long)]
    min_loss: Option<u32>,

    /// Largest robbery loss
    #[arg(long)]
    max_loss: Option<u32>,

    /// Look-ahead of the smart agent, in steps
    #[arg(long)]
    horizon: Option<u32>,

    /// Agents taking part (comma-separated: smart,greedy,random)
    #[arg(long, default_value = "smart,greedy,random")]
    agents: String,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log arrivals and robberies (RUST_LOG still takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = load_settings(&args)?;
    let map = load_map(&args.map)?;
    let agents = parse_agents(&args.agents)?;

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let records = play_runs(map, settings, &agents, args.seed, args.runs)?;
    write_report(&args, &records, start_time)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner() {
    println!("{}", "🧭 Nordic Traveller Simulator".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings {}", path.display()))?;
            Settings::from_json_str(&json)
                .with_context(|| format!("invalid settings in {}", path.display()))?
        }
        None => Settings::default(),
    };
    apply_overrides(&mut settings, args);
    settings
        .validate()
        .context("settings rejected after applying command-line overrides")?;
    Ok(settings)
}

fn apply_overrides(settings: &mut Settings, args: &Args) {
    if let Some(steps) = args.steps {
        settings.total_steps = steps;
    }
    if let Some(toll) = args.toll {
        settings.toll_percent = toll;
    }
    if let Some(risk) = args.risk {
        settings.robbery_risk = risk;
    }
    if let Some(min_loss) = args.min_loss {
        settings.min_loss = min_loss;
    }
    if let Some(max_loss) = args.max_loss {
        settings.max_loss = max_loss;
    }
    if let Some(horizon) = args.horizon {
        settings.search_horizon = horizon;
    }
}

fn load_map(path: &Path) -> Result<MapDefinition> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read map {}", path.display()))?;
    let map = parse_map(&text).with_context(|| format!("invalid map {}", path.display()))?;
    info!(
        "loaded {} with {} countries and {} cities",
        path.display(),
        map.network.country_count(),
        map.network.cities().len()
    );
    Ok(map)
}

fn parse_agents(list: &str) -> Result<Vec<AgentKind>> {
    let mut agents = Vec::new();
    for word in list.split(',').map(str::trim).filter(|word| !word.is_empty()) {
        let Some(kind) = AgentKind::parse(word) else {
            bail!("unknown agent `{word}` (expected smart, greedy or random)");
        };
        if kind == AgentKind::Manual {
            warn!("manual players are never steered here and will not move");
        }
        agents.push(kind);
    }
    if agents.is_empty() {
        bail!("no agents selected");
    }
    Ok(agents)
}

fn play_runs(
    map: MapDefinition,
    settings: Settings,
    agents: &[AgentKind],
    seed: Option<u64>,
    runs: u32,
) -> Result<Vec<RunRecord>> {
    let mut game = map.into_game(settings, seed);
    for kind in agents {
        if !game.add_player(*kind) {
            bail!("the map has no cities to start from");
        }
    }
    match search_depth(&game) {
        Some(depth) if depth > DEEP_SEARCH_ROADS && agents.contains(&AgentKind::Smart) => warn!(
            "the smart agent may chain {depth} roads per decision; lower --horizon if runs stall"
        ),
        Some(depth) => debug!("smart search chains at most {depth} roads"),
        None => {}
    }

    let mut records = Vec::new();
    for run in 1..=runs {
        if run > 1 {
            game.reset();
        }
        let seed = game.seed();
        let steps = game.run();
        debug!("run {run} with seed {seed} finished after {steps} steps");
        records.push(RunRecord {
            run,
            seed,
            steps,
            standings: game.leaderboard(),
        });
    }
    Ok(records)
}

/// Most roads a smart player's search can chain: the horizon over the
/// shortest road on the map.
fn search_depth(game: &Game) -> Option<u32> {
    let network = game.network();
    let shortest = network
        .city_ids()
        .flat_map(|city| network.roads_from(city))
        .map(Road::length)
        .min()?;
    Some(game.search().horizon() / shortest.max(1))
}

fn write_report(args: &Args, records: &[RunRecord], start_time: Instant) -> Result<()> {
    let mut out = OutputTarget::open(args.output.as_deref())?;
    let summaries = summarize(records);

    match args.report {
        ReportFormat::Json => generate_json_report(&mut out, records, &summaries)
            .context("failed to write JSON report")?,
        ReportFormat::Console => {
            generate_console_report(&mut out, records, &summaries, start_time.elapsed())?;
        }
    }

    out.flush().context("failed to flush the report")
}

/// Where the report goes: a file when `--output` is given, stdout otherwise.
enum OutputTarget {
    Stdout(BufWriter<Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn open(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(BufWriter::new(stdout())));
        };
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self::File(BufWriter::new(file)))
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(out) => out.write(buf),
            Self::File(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(out) => out.flush(),
            Self::File(out) => out.flush(),
        }
    }
}
