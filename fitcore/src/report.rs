//! What a [`Timeline`] tells the outside world after every tick.
use crate::helpe::*;

/// The resident of an [`Extent`], as seen when the tick was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    pub name:       String,
    // Ticks left *before* this tick's ageing.
    pub remaining:  ByteSteps,
}

/// Snapshot of one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extent {
    pub start:      ByteSteps,
    pub size:       ByteSteps,
    pub occupant:   Option<Occupant>,
}

impl Extent {
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

impl From<&Fragment> for Extent {
    fn from(f: &Fragment) -> Self {
        Self {
            start:      f.start(),
            size:       f.size(),
            occupant:   f.occupant().map(|p| Occupant {
                name:       p.name.clone(),
                remaining:  p.remaining(),
            }),
        }
    }
}

/// Things that happen to processes during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    /// Got a fragment starting at `start`.
    Placed { name: String, start: ByteSteps, size: ByteSteps },
    /// Did not fit anywhere and went to the overflow buffer.
    Buffered { name: String, size: ByteSteps },
    /// Bigger than the whole memory; gone for good.
    Dropped { name: String, size: ByteSteps },
    /// Ran out of time and left its fragment.
    Departed { name: String, start: ByteSteps, size: ByteSteps },
}

impl TickEvent {
    pub fn name(&self) -> &str {
        match self {
            TickEvent::Placed { name, .. }      => { name },
            TickEvent::Buffered { name, .. }    => { name },
            TickEvent::Dropped { name, .. }     => { name },
            TickEvent::Departed { name, .. }    => { name },
        }
    }
}

/// Everything that happened during tick `time` (that is, while the
/// clock moved from `time` to `time + 1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub time:       ByteSteps,
    // In order of occurence.
    pub events:     Vec<TickEvent>,
    // Fragment layout, in address order, taken right before residents
    // were aged. Processes departing this tick still show up here.
    pub layout:     Vec<Extent>,
    // How many processes were left waiting when the tick ended.
    pub buffered:   usize,
}

/// Receives the outcome of every tick.
///
/// Sinks are handed to the [`Timeline`] at construction and live as long
/// as the simulation run does.
pub trait TickSink {
    /// Called before anything else happens in a tick.
    fn begin_tick(&mut self, _from: ByteSteps, _to: ByteSteps) {}
    /// Called once the tick is over and the layout has been coalesced.
    fn end_tick(&mut self, report: &TickReport) -> io::Result<()>;
}

/// Forgets everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TickSink for NullSink {
    fn end_tick(&mut self, _report: &TickReport) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every report. Handy for observers reading the run afterwards.
impl TickSink for Vec<TickReport> {
    fn end_tick(&mut self, report: &TickReport) -> io::Result<()> {
        self.push(report.clone());

        Ok(())
    }
}

impl<S: TickSink + ?Sized> TickSink for &mut S {
    fn begin_tick(&mut self, from: ByteSteps, to: ByteSteps) {
        (**self).begin_tick(from, to)
    }

    fn end_tick(&mut self, report: &TickReport) -> io::Result<()> {
        (**self).end_tick(report)
    }
}

impl<S: TickSink + ?Sized> TickSink for Box<S> {
    fn begin_tick(&mut self, from: ByteSteps, to: ByteSteps) {
        (**self).begin_tick(from, to)
    }

    fn end_tick(&mut self, report: &TickReport) -> io::Result<()> {
        (**self).end_tick(report)
    }
}

/// An absent sink forgets everything, like [`NullSink`].
impl<S: TickSink> TickSink for Option<S> {
    fn begin_tick(&mut self, from: ByteSteps, to: ByteSteps) {
        if let Some(s) = self {
            s.begin_tick(from, to);
        }
    }

    fn end_tick(&mut self, report: &TickReport) -> io::Result<()> {
        match self {
            Some(s) => { s.end_tick(report) },
            None    => { Ok(()) }
        }
    }
}
