use crate::helpe::*;

impl Process {
    pub fn new(
        name:       &str,
        arrival:    ByteSteps,
        size:       ByteSteps,
        duration:   ByteSteps,
    ) -> Self {
        Self {
            name:       name.to_string(),
            arrival,
            size,
            remaining:  duration,
        }
    }

    /// Ticks this process still has to spend in memory.
    pub fn remaining(&self) -> ByteSteps {
        self.remaining
    }

    /// Consumes one tick of residency. Returns `true` once
    /// the process is done and must leave.
    pub(crate) fn age(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);

        self.remaining == 0
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (memory {}, arrival {}, duration {})",
            self.name,
            self.size,
            self.arrival,
            self.remaining
        )
    }
}
