//! Everything that happens *around* a `fitcore` run: tick logs on disk,
//! the per-process ledger, fragmentation statistics.
pub use std::fs::File;
pub use std::io::{BufRead, BufReader, BufWriter, Write};
pub use serde::{Deserialize, Serialize};
pub use indexmap::IndexMap;

mod records;
mod sinks;
mod ledger;
mod stats;

pub use crate::records::*;
pub use crate::sinks::*;
pub use crate::ledger::*;
pub use crate::stats::*;

/// Installs a `tracing` subscriber driven by `RUST_LOG`, warnings
/// and up by default. Meant for the binaries.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
