use crate::helpe::*;
use tracing::{debug, trace, warn};

/// Memory size used when nobody says otherwise.
pub const DEFAULT_SIZE: ByteSteps = 2000;

/// What a simulation run needs to know before it starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Total memory, in units.
    pub size:   ByteSteps,
    /// Placement policy.
    pub fit:    Fit,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            size:   DEFAULT_SIZE,
            fit:    Fit::default(),
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: ByteSteps) -> Self {
        self.size = size;
        self
    }

    pub fn with_fit(mut self, fit: Fit) -> Self {
        self.fit = fit;
        self
    }
}

impl<S: TickSink> Timeline<S> {
    /// A memory of `size` units, entirely free, at time 1.
    pub fn new(fit: Fit, size: ByteSteps, sink: S) -> Self {
        assert!(size > 0, "Memory of zero size");
        Self {
            fragments:  vec![Fragment::free(0, size)],
            overflow:   OverflowBuffer::new(),
            time:       1,
            fit,
            size,
            sink,
            events:     vec![],
        }
    }

    pub fn from_config(config: &SimConfig, sink: S) -> Self {
        Self::new(config.fit, config.size, sink)
    }

    /// Current logical time.
    pub fn time(&self) -> ByteSteps {
        self.time
    }

    pub fn size(&self) -> ByteSteps {
        self.size
    }

    pub fn fit(&self) -> Fit {
        self.fit
    }

    /// The memory layout, in address order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn overflow(&self) -> &OverflowBuffer {
        &self.overflow
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Ends the run, handing back the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Size of the biggest hole, or zero if memory is full.
    pub fn largest_free(&self) -> ByteSteps {
        self.fragments.iter()
            .filter(|f| f.is_free())
            .map(|f| f.size())
            .max()
            .unwrap_or(0)
    }

    /// Nobody is waiting and nobody is resident.
    pub fn is_idle(&self) -> bool {
        self.overflow.is_empty() && self.fragments.iter().all(|f| f.is_free())
    }

    /// Places `process` according to the configured [`Fit`] and returns
    /// the start of its fragment.
    ///
    /// - [`FitError::NoSpaceEver`]: the process is bigger than the whole
    ///   memory. It is *not* kept anywhere.
    /// - [`FitError::InsufficientSpace`]: placement refused it right now
    ///   (see [`Fit::select_fragment`]). The process has already been
    ///   queued at the back of the overflow buffer.
    pub fn insert(&mut self, process: Process) -> Result<ByteSteps, FitError> {
        assert!(process.size > 0, "Process {} asks for no memory", process.name);
        if process.size > self.size {
            return Err(FitError::NoSpaceEver {
                name:       process.name,
                demand:     process.size,
                capacity:   self.size,
            });
        }
        match self.fit.select_fragment(&self.fragments, process.size) {
            Ok(idx)     => {
                match self.fragments[idx].split(process) {
                    Ok(leftover)    => {
                        // Right behind its parent, so that address
                        // order is preserved.
                        if let Some(l) = leftover {
                            self.fragments.insert(idx + 1, l);
                        }
                        let host = &self.fragments[idx];
                        let start = host.start();
                        if let Some(p) = host.occupant() {
                            debug!(time = self.time, process = %p.name, start, size = p.size, "placed");
                            self.events.push(TickEvent::Placed {
                                name:   p.name.clone(),
                                start,
                                size:   p.size,
                            });
                        }

                        Ok(start)
                    },
                    Err(Refused { reason, process })  => {
                        self.buffer(process);
                        Err(reason)
                    }
                }
            },
            Err(e)      => {
                self.buffer(process);
                Err(e)
            }
        }
    }

    fn buffer(&mut self, process: Process) {
        debug!(time = self.time, process = %process.name, size = process.size, "buffered");
        self.events.push(TickEvent::Buffered {
            name:   process.name.clone(),
            size:   process.size,
        });
        self.overflow.push(process);
    }

    /// Inserts every process. Those that do not fit stay buffered, those
    /// that can never fit are logged and dropped.
    pub fn insert_batch<I>(&mut self, processes: I)
    where I: IntoIterator<Item = Process> {
        for process in processes {
            match self.insert(process) {
                Ok(_) | Err(FitError::InsufficientSpace { .. })   => {},
                Err(FitError::NoSpaceEver { name, demand, capacity })   => {
                    warn!(time = self.time, process = %name, demand, capacity, "dropped: larger than memory");
                    self.events.push(TickEvent::Dropped {
                        name,
                        size:   demand,
                    });
                }
            }
        }
    }

    /// Runs one tick:
    ///
    /// 1. admit `arrivals`,
    /// 2. give every buffered process (as counted when the tick started
    ///    retrying) one more chance,
    /// 3. snapshot the layout and age residents, evicting those whose
    ///    time is up,
    /// 4. move the clock,
    /// 5. coalesce neighboring holes,
    /// 6. hand the [`TickReport`] to the sink.
    ///
    /// An error means the sink failed; the tick itself has happened.
    pub fn advance_tick<I>(&mut self, arrivals: I) -> io::Result<()>
    where I: IntoIterator<Item = Process> {
        assert!(self.layout_is_valid(), "Corrupted layout before tick {}", self.time);
        let from = self.time;
        self.sink.begin_tick(from, from + 1);

        self.insert_batch(arrivals);
        self.retry_overflow();
        let layout = self.age_residents();
        self.time += 1;
        self.coalesce();

        assert!(self.layout_is_valid(), "Corrupted layout after tick {}", from);
        let report = TickReport {
            time:       from,
            events:     std::mem::take(&mut self.events),
            layout,
            buffered:   self.overflow.len(),
        };

        self.sink.end_tick(&report)
    }

    fn retry_overflow(&mut self) {
        // Successful retries shrink the buffer, failed ones push back
        // onto it (a process can fit the largest hole and still be
        // refused). Counting up front bounds the work to one pass.
        let backlog = self.overflow.len();
        for _ in 0..backlog {
            let max_size = self.largest_free();
            match self.overflow.pop_first_fitting(max_size) {
                Some(p) => { self.insert_batch(std::iter::once(p)); },
                // Nothing will change until someone departs.
                None    => { break; }
            }
        }
    }

    fn age_residents(&mut self) -> Vec<Extent> {
        let mut layout = Vec::with_capacity(self.fragments.len());
        for f in self.fragments.iter_mut() {
            layout.push(Extent::from(&*f));
            let done = match f.occupant_mut() {
                Some(p) => { p.age() },
                None    => { false },
            };
            if done {
                if let Some(p) = f.evict() {
                    debug!(time = self.time, process = %p.name, start = f.start(), "departed");
                    self.events.push(TickEvent::Departed {
                        name:   p.name,
                        start:  f.start(),
                        size:   f.size(),
                    });
                }
            }
        }

        layout
    }

    /// Merges every run of consecutive free fragments into one.
    /// Calling it twice in a row changes nothing the second time.
    pub fn coalesce(&mut self) {
        let mut idx = 0;
        while idx + 1 < self.fragments.len() {
            if self.fragments[idx].is_free() && self.fragments[idx + 1].is_free() {
                let next = self.fragments.remove(idx + 1);
                trace!(at = self.fragments[idx].start(), absorbed = next.size(), "coalescing");
                self.fragments[idx].absorb(next);
            } else {
                // Only move on once nothing more can be merged here.
                idx += 1;
            }
        }
        // Removal keeps the order as is; sorting is a backstop.
        self.fragments.sort_by_key(|f| f.start());
    }

    /// Checks that fragments are sorted, contiguous, non-empty, cover
    /// `[0, size - 1]` exactly, and that no two holes are adjacent.
    pub fn layout_is_valid(&self) -> bool {
        let (first, last) = match (self.fragments.first(), self.fragments.last()) {
            (Some(f), Some(l))  => { (f, l) },
            _                   => { return false; }
        };

        first.start() == 0
            && last.next_avail_addr() == self.size
            && self.fragments.iter().all(|f| f.size() > 0)
            && self.fragments.iter()
                .tuple_windows()
                .all(|(a, b)| {
                    a.next_avail_addr() == b.start() && !(a.is_free() && b.is_free())
                })
    }
}
