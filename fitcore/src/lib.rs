//! Welcome to `fitcore`!
//!
//! A discrete-time simulator of contiguous (variable-partition) memory
//! allocation. Processes arrive at scheduled times, get placed into one
//! fixed-size memory region by a [`Fit`] policy, stay resident for a fixed
//! number of ticks and then vacate their space. Adjacent free fragments are
//! coalesced at the end of every tick.

mod process;
mod fragment;
mod fit;
mod buffer;
mod timeline;
mod sim;

pub mod report;
pub mod procset;
pub mod helpe;

pub use crate::helpe::*;

/// A unit of work asking for memory.
///
/// Everything about a [`Process`] is fixed at creation, except for its
/// [`remaining`](Process::remaining) duration: the [`Timeline`] decrements
/// it exactly once per tick while the process is resident. A process whose
/// duration reaches zero departs, and its space is freed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub name:       String,
    // Logical time at which the process shows up.
    pub arrival:    ByteSteps,
    // Memory demand. Never zero for a process that passed `init`.
    pub size:       ByteSteps,
    // Ticks left in memory.
    pub(crate) remaining:  ByteSteps,
}

/// A contiguous span `[start, end]` of the memory region, either free
/// or holding exactly one [`Process`].
///
/// > ***ATTENTION:*** the [`Timeline`] keeps its fragments sorted by
/// > [`start`](Fragment::start), without gaps or overlaps, covering the
/// > whole region, and never leaves two free fragments next to each other
/// > at a tick boundary. Zero-sized fragments never exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    start:      ByteSteps,
    size:       ByteSteps,
    occupant:   Option<Process>,
}

/// Placement policy. Given the current fragment list and a memory demand,
/// picks which free fragment is to host the process.
///
/// Both variants break ties in favor of the fragment that comes first in
/// address order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, ValueEnum)]
pub enum Fit {
    /// Smallest free fragment that fits
    #[default]
    Best,
    /// Largest free fragment that fits
    Worst,
}

/// Processes that could not be placed on their first attempt.
///
/// Insertion order is kept, but retrieval is driven by what fits: a process
/// too big for any hole is skipped over and never blocks smaller ones.
#[derive(Debug, Default)]
pub struct OverflowBuffer {
    waiting: VecDeque<Process>,
}

/// The orchestrator. Owns the memory layout, the [`OverflowBuffer`] and
/// the logical clock, and is the only thing that ever mutates them.
///
/// Each call to [`advance_tick`](Timeline::advance_tick) is atomic from the
/// caller's point of view, and its outcome is handed to the [`TickSink`]
/// the timeline was built with.
pub struct Timeline<S: TickSink> {
    fragments:  Vec<Fragment>,
    overflow:   OverflowBuffer,
    time:       ByteSteps,
    fit:        Fit,
    size:       ByteSteps,
    sink:       S,
    // Events of the tick in progress (or of explicit inserts made
    // between ticks), flushed into the next report.
    events:     Vec<TickEvent>,
}

/// Couples a [`Timeline`] with an [`ArrivalSource`] and keeps ticking
/// until everything has arrived, run and departed.
pub struct Simulation<A: ArrivalSource, S: TickSink> {
    timeline:   Timeline<S>,
    source:     A,
    max_ticks:  Option<ByteSteps>,
}
