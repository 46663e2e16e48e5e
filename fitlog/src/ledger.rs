use std::fmt;
use std::io;
use fitcore::{ByteSteps, TickEvent, TickReport, TickSink};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::stats::FragStats;

/// Everything that happened to one process, in ticks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Lifecycle {
    pub size:           ByteSteps,
    /// Tick during which the process first showed up.
    pub first_seen:     ByteSteps,
    pub admitted:       Option<ByteSteps>,
    pub start:          Option<ByteSteps>,
    pub departed:       Option<ByteSteps>,
    pub dropped:        bool,
    pub times_buffered: usize,
}

impl Lifecycle {
    /// Ticks spent in the overflow buffer before admission.
    pub fn waited(&self) -> Option<ByteSteps> {
        self.admitted.map(|t| t - self.first_seen)
    }

    /// Still buffered when the log ended.
    pub fn is_waiting(&self) -> bool {
        !self.dropped && self.admitted.is_none()
    }
}

/// Per-process lifecycles plus per-tick fragmentation, built by
/// listening to a run (or replaying its log).
#[derive(Clone, Debug, Default, Serialize)]
pub struct Ledger {
    // In order of first appearance.
    pub processes:  IndexMap<String, Lifecycle>,
    pub ticks:      Vec<FragStats>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for one tick. Reports must come in time order.
    pub fn record(&mut self, report: &TickReport) {
        let time = report.time;
        for evt in &report.events {
            let entry = self.processes
                .entry(evt.name().to_string())
                .or_insert_with(|| Lifecycle {
                    first_seen: time,
                    ..Default::default()
                });
            match evt {
                TickEvent::Placed { start, size, .. }   => {
                    entry.size = *size;
                    entry.admitted = Some(time);
                    entry.start = Some(*start);
                },
                TickEvent::Buffered { size, .. }        => {
                    entry.size = *size;
                    entry.times_buffered += 1;
                },
                TickEvent::Dropped { size, .. }         => {
                    entry.size = *size;
                    entry.dropped = true;
                },
                TickEvent::Departed { name, .. }        => {
                    if entry.admitted.is_none() {
                        warn!(time, process = %name, "departure without admission");
                    }
                    entry.departed = Some(time);
                }
            }
        }
        self.ticks.push(FragStats::from_report(report));
    }

    pub fn get(&self, name: &str) -> Option<&Lifecycle> {
        self.processes.get(name)
    }

    /// Tick with the most memory in use. Earliest one on ties.
    pub fn peak_usage(&self) -> Option<&FragStats> {
        self.ticks.iter()
            .rev()
            .max_by_key(|s| s.used)
    }

    /// Tick with the worst external fragmentation. Earliest one on ties.
    pub fn worst_fragmentation(&self) -> Option<&FragStats> {
        self.ticks.iter()
            .rev()
            .max_by(|a, b| a.external().total_cmp(&b.external()))
    }

    /// The process that waited the most. First to arrive on ties.
    pub fn longest_wait(&self) -> Option<(&str, ByteSteps)> {
        self.processes.iter()
            .rev()
            .filter_map(|(n, l)| l.waited().map(|w| (n.as_str(), w)))
            .max_by_key(|(_, w)| *w)
    }

    pub fn dropped(&self) -> impl Iterator<Item = &str> {
        self.processes.iter()
            .filter(|(_, l)| l.dropped)
            .map(|(n, _)| n.as_str())
    }

    pub fn still_waiting(&self) -> impl Iterator<Item = &str> {
        self.processes.iter()
            .filter(|(_, l)| l.is_waiting())
            .map(|(n, _)| n.as_str())
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary(self)
    }
}

impl TickSink for Ledger {
    fn end_tick(&mut self, report: &TickReport) -> io::Result<()> {
        self.record(report);

        Ok(())
    }
}

fn or_dash(v: Option<ByteSteps>) -> String {
    v.map_or_else(|| "-".to_string(), |x| x.to_string())
}

/// The closing lines of a [`Ledger`] table, on their own.
pub struct Summary<'a>(&'a Ledger);

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12}{:>8}{:>8}{:>10}{:>8}{:>10}{:>8}",
            "process", "size", "seen", "admitted", "start", "departed", "waited")?;
        for (name, l) in &self.processes {
            let admitted = if l.dropped { "dropped".to_string() } else { or_dash(l.admitted) };
            writeln!(f, "{:<12}{:>8}{:>8}{:>10}{:>8}{:>10}{:>8}",
                name,
                l.size,
                l.first_seen,
                admitted,
                or_dash(l.start),
                or_dash(l.departed),
                or_dash(l.waited()),
            )?;
        }
        writeln!(f)?;

        write!(f, "{}", self.summary())
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ledger = self.0;
        writeln!(f, "Ticks:\t\t{}", ledger.ticks.len())?;
        if let Some(s) = ledger.peak_usage() {
            writeln!(f, "Peak usage:\t{} units at tick {} ({:.2}%)", s.used, s.time, s.occupancy() * 100.0)?;
        }
        if let Some(s) = ledger.worst_fragmentation() {
            writeln!(f, "Fragmentation:\t{:.2}% at tick {} ({} holes)", s.external() * 100.0, s.time, s.holes)?;
        }
        if let Some((name, w)) = ledger.longest_wait() {
            writeln!(f, "Longest wait:\t{} ticks ({})", w, name)?;
        }
        let dropped = ledger.dropped().collect::<Vec<_>>();
        if !dropped.is_empty() {
            writeln!(f, "Dropped:\t{}", dropped.join(", "))?;
        }
        let waiting = ledger.still_waiting().collect::<Vec<_>>();
        if !waiting.is_empty() {
            writeln!(f, "Still waiting:\t{}", waiting.join(", "))?;
        }

        Ok(())
    }
}
