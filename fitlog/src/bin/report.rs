use anyhow::{ensure, Context, Result};
use clap::Parser;
use fitcore::*;
use fitlog::*;
use itertools::Itertools;

/// Summarizes a JSON-lines tick log written by `memsim --json`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the JSON-lines log
    #[arg(value_parser = clap::value_parser!(PathBuf))]
    log:        PathBuf,

    /// Skip the per-process table, print the summary only
    #[arg(long)]
    quiet:      bool,
}

/// Refuses logs that no run could have produced.
fn check(records: &[TickRecord]) -> Result<()> {
    ensure!(!records.is_empty(), "Empty log");
    let size = records[0].layout.iter().map(|e| e.size).sum::<ByteSteps>();
    for r in records {
        ensure!(r.layout.first().is_some_and(|e| e.start == 0),
            "Tick {}: layout does not start at 0", r.time);
        ensure!(r.layout.iter().map(|e| e.size).sum::<ByteSteps>() == size,
            "Tick {}: layout does not cover {} units", r.time, size);
        ensure!(r.layout.iter().tuple_windows().all(|(a, b)| a.start + a.size == b.start),
            "Tick {}: layout has gaps or overlaps", r.time);
    }
    ensure!(records.iter().tuple_windows().all(|(a, b)| a.time + 1 == b.time),
        "Ticks are not consecutive");

    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Args::parse();

    let fd = File::open(&cli.log)
        .with_context(|| format!("Cannot open {}", cli.log.display()))?;
    let records = read_records(BufReader::new(fd))
        .with_context(|| format!("Cannot parse {}", cli.log.display()))?;
    check(&records)?;

    let mut ledger = Ledger::new();
    for r in records {
        ledger.record(&TickReport::from(r));
    }
    if cli.quiet {
        print!("{}", ledger.summary());
    } else {
        print!("{}", ledger);
    }

    Ok(())
}
