use std::io::{self, Write};
use fitcore::{ByteSteps, TickReport, TickSink};
use tracing::debug;

use crate::records::TickRecord;

/// Marker written in place of a name for holes.
pub const FREE_MARKER: &str = "free";

/// Plain-text tick log, one line per tick:
///
/// ```text
/// 1 [0 A 30] [30 B 50] [80 free 20]
/// ```
///
/// Every bracket is `[start name size]` for one fragment, in address
/// order, as it was right before residents were aged.
pub struct TextLog<W: Write> {
    out: W,
}

impl<W: Write> TextLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Renders one line of a [`TextLog`], without the trailing newline.
pub fn text_line(report: &TickReport) -> String {
    let mut line = report.time.to_string();
    for e in &report.layout {
        let who = match &e.occupant {
            Some(o) => { o.name.as_str() },
            None    => { FREE_MARKER },
        };
        line.push_str(&format!(" [{} {} {}]", e.start, who, e.size));
    }

    line
}

impl<W: Write> TickSink for TextLog<W> {
    fn begin_tick(&mut self, from: ByteSteps, to: ByteSteps) {
        debug!("{} -> {}", from, to);
    }

    fn end_tick(&mut self, report: &TickReport) -> io::Result<()> {
        writeln!(self.out, "{}", text_line(report))?;
        // Observers may be tailing the file.
        self.out.flush()
    }
}

/// JSON-lines tick log: one [`TickRecord`] per line.
pub struct JsonLog<W: Write> {
    out: W,
}

impl<W: Write> JsonLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TickSink for JsonLog<W> {
    fn end_tick(&mut self, report: &TickReport) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &TickRecord::from(report))?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Feeds two sinks, left first. Stops at the first failure.
pub struct Tee<A: TickSink, B: TickSink>(pub A, pub B);

impl<A: TickSink, B: TickSink> TickSink for Tee<A, B> {
    fn begin_tick(&mut self, from: ByteSteps, to: ByteSteps) {
        self.0.begin_tick(from, to);
        self.1.begin_tick(from, to);
    }

    fn end_tick(&mut self, report: &TickReport) -> io::Result<()> {
        self.0.end_tick(report)?;
        self.1.end_tick(report)
    }
}
