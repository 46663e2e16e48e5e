use crate::helpe::*;
use tracing::info;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Ticks advanced during this call.
    pub ticks:      ByteSteps,
    /// `true` if everything arrived, ran and departed; `false` if the run
    /// was stopped early (tick limit or caller's request).
    pub finished:   bool,
}

impl<A: ArrivalSource, S: TickSink> Simulation<A, S> {
    pub fn new(timeline: Timeline<S>, source: A) -> Self {
        Self {
            timeline,
            source,
            max_ticks: None,
        }
    }

    /// Stops runs after `limit` ticks in total, whatever their state.
    pub fn with_max_ticks(mut self, limit: ByteSteps) -> Self {
        self.max_ticks = Some(limit);
        self
    }

    pub fn timeline(&self) -> &Timeline<S> {
        &self.timeline
    }

    pub fn source(&self) -> &A {
        &self.source
    }

    pub fn into_parts(self) -> (Timeline<S>, A) {
        (self.timeline, self.source)
    }

    /// Nothing left to arrive, nothing waiting, nothing resident.
    pub fn is_finished(&self) -> bool {
        self.source.pending() == 0 && self.timeline.is_idle()
    }

    /// Advances exactly one tick, feeding it whatever arrives now.
    pub fn step(&mut self) -> io::Result<()> {
        let arrivals = self.source.arrivals_at(self.timeline.time());

        self.timeline.advance_tick(arrivals)
    }

    /// Ticks until [`is_finished`](Simulation::is_finished).
    pub fn run(&mut self) -> io::Result<RunOutcome> {
        self.run_while(|_| true)
    }

    /// Ticks until finished, or until `keep_going` says otherwise. The
    /// predicate is only consulted between ticks, never in the middle
    /// of one.
    pub fn run_while<F>(&mut self, mut keep_going: F) -> io::Result<RunOutcome>
    where F: FnMut(&Timeline<S>) -> bool {
        let mut ticks = 0;
        while !self.is_finished() {
            let out_of_ticks = self.max_ticks
                // The clock starts at 1.
                .is_some_and(|limit| self.timeline.time() > limit);
            if out_of_ticks || !keep_going(&self.timeline) {
                info!(time = self.timeline.time(), pending = self.source.pending(), "run halted");
                return Ok(RunOutcome { ticks, finished: false });
            }
            self.step()?;
            ticks += 1;
        }
        info!(time = self.timeline.time(), ticks, fit = ?self.timeline.fit(), "run finished");

        Ok(RunOutcome { ticks, finished: true })
    }
}
