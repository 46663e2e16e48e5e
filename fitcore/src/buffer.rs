use crate::helpe::*;

impl OverflowBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a process at the back.
    pub fn push(&mut self, process: Process) {
        self.waiting.push_back(process);
    }

    /// Removes and returns the oldest process that needs no more than
    /// `max_size`. Bigger ones keep their place in the queue.
    pub fn pop_first_fitting(&mut self, max_size: ByteSteps) -> Option<Process> {
        let idx = self.waiting
            .iter()
            .position(|p| p.size <= max_size)?;

        self.waiting.remove(idx)
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Waiting processes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.waiting.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.waiting.iter().any(|p| p.name == name)
    }
}
