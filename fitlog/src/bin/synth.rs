use anyhow::{Context, Result};
use clap::Parser;
use fitcore::*;
use fitlog::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Generates random process records for `memsim`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// How many processes
    #[arg(short, long, default_value_t = 100)]
    count:          usize,

    /// Same seed, same records
    #[arg(short, long, default_value_t = 0)]
    seed:           u64,

    /// Latest arrival time
    #[arg(long, default_value_t = 50)]
    max_arrival:    ByteSteps,

    /// Largest memory demand
    #[arg(long, default_value_t = 400)]
    max_memory:     ByteSteps,

    /// Longest duration
    #[arg(long, default_value_t = 10)]
    max_duration:   ByteSteps,

    /// Where records go; standard output if absent
    #[arg(short, long)]
    output:         Option<PathBuf>,
}

/// `count` valid processes named `P1`, `P2`... sorted by arrival.
fn synthesize(cli: &Args) -> Vec<Process> {
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let mut res: Vec<Process> = (1..=cli.count)
        .map(|i| Process::new(
            &format!("P{}", i),
            rng.gen_range(0..=cli.max_arrival),
            rng.gen_range(1..=cli.max_memory),
            rng.gen_range(1..=cli.max_duration),
        ))
        .collect();
    // Stable: names stay in order within each arrival time.
    res.sort_by_key(|p| p.arrival);

    res
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Args::parse();
    anyhow::ensure!(cli.max_memory > 0 && cli.max_duration > 0,
        "Memory demands and durations must be allowed to be positive");

    let processes = synthesize(&cli);
    let mut out: Box<dyn Write> = match &cli.output {
        Some(p) => {
            Box::new(BufWriter::new(File::create(p)
                .with_context(|| format!("Cannot create {}", p.display()))?))
        },
        None    => { Box::new(BufWriter::new(std::io::stdout().lock())) }
    };
    writeln!(out, "# name arrival memory duration (seed {})", cli.seed)?;
    for p in &processes {
        writeln!(out, "{} {} {} {}", p.name, p.arrival, p.size, p.remaining())?;
    }
    out.flush()?;

    Ok(())
}
