use anyhow::{Context, Result};
use clap::Parser;
use fitcore::*;
use fitlog::*;
use tracing::info;

/// Simulates contiguous memory allocation over discrete time.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to process records (`name arrival memory duration` per line)
    #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
    input:      PathBuf,

    /// Placement policy
    #[arg(short, long, value_enum, default_value_t = Fit::Best)]
    fit:        Fit,

    /// Total memory, in units
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size:       ByteSteps,

    /// Where the per-tick text log goes
    #[arg(short, long, default_value = "result.txt")]
    log:        PathBuf,

    /// Also write a JSON-lines log here
    #[arg(short, long)]
    json:       Option<PathBuf>,

    /// Give up after this many ticks
    #[arg(short, long)]
    max_ticks:  Option<ByteSteps>,

    /// Skip the per-process table, print the summary only
    #[arg(long)]
    quiet:      bool,
}

fn open(path: &PathBuf) -> Result<BufWriter<File>> {
    let fd = File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;

    Ok(BufWriter::new(fd))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Args::parse();

    let parser = TextParser::new(cli.input.clone());
    let processes = parser.read_processes()
        .and_then(init)
        .with_context(|| format!("Bad process records in {}", cli.input.display()))?;
    info!(processes = processes.len(), fit = ?cli.fit, size = cli.size, "starting");

    anyhow::ensure!(cli.size > 0, "Memory size must be positive");
    let config = SimConfig::new()
        .with_size(cli.size)
        .with_fit(cli.fit);
    let json = match &cli.json {
        Some(p) => { Some(JsonLog::new(open(p)?)) },
        None    => { None }
    };
    let sink = Tee(Ledger::new(), Tee(TextLog::new(open(&cli.log)?), json));

    let mut sim = Simulation::new(
        Timeline::from_config(&config, sink),
        processes.into_iter().collect::<Schedule>(),
    );
    if let Some(limit) = cli.max_ticks {
        sim = sim.with_max_ticks(limit);
    }
    let outcome = sim.run()
        .with_context(|| format!("Cannot write tick log {}", cli.log.display()))?;
    let (timeline, schedule) = sim.into_parts();

    let time = timeline.time();
    let Tee(ledger, _) = timeline.into_sink();

    if cli.quiet {
        print!("{}", ledger.summary());
    } else {
        print!("{}", ledger);
    }
    if !outcome.finished {
        println!("Stopped early:\t{} still to arrive at time {}", schedule.pending(), time);
    }

    Ok(())
}
