use crate::helpe::*;

impl Fragment {
    /// An empty span of `size` units starting at `start`.
    pub fn free(start: ByteSteps, size: ByteSteps) -> Self {
        assert!(size > 0, "Zero-sized fragment at {}", start);
        Self {
            start,
            size,
            occupant: None,
        }
    }

    /// A span starting at `start` that is exactly as big as `process`.
    pub fn occupied(start: ByteSteps, process: Process) -> Self {
        assert!(process.size > 0, "Zero-sized process {}", process.name);
        Self {
            start,
            size:       process.size,
            occupant:   Some(process),
        }
    }

    pub fn start(&self) -> ByteSteps {
        self.start
    }

    pub fn size(&self) -> ByteSteps {
        self.size
    }

    /// Last position covered, inclusive.
    pub fn end(&self) -> ByteSteps {
        debug_assert!(self.size > 0, "Zero-sized fragment at {}", self.start);
        self.start + self.size - 1
    }

    /// First position *after* the fragment.
    pub fn next_avail_addr(&self) -> ByteSteps {
        self.start + self.size
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn occupant(&self) -> Option<&Process> {
        self.occupant.as_ref()
    }

    pub(crate) fn occupant_mut(&mut self) -> Option<&mut Process> {
        self.occupant.as_mut()
    }

    /// Empties the fragment, returning whoever was in it.
    pub(crate) fn evict(&mut self) -> Option<Process> {
        self.occupant.take()
    }

    /// Installs `process` at the fragment's start and shrinks the fragment
    /// to exactly the process' size. Whatever is left over comes back as a
    /// new free fragment right after it. A perfect fit leaves nothing over,
    /// hence the `None`.
    ///
    /// The fragment must be free and big enough; otherwise the process is
    /// handed back inside the error.
    pub fn split(&mut self, process: Process) -> Result<Option<Fragment>, Refused> {
        if !self.is_free() || process.size > self.size {
            return Err(Refused {
                reason: FitError::InsufficientSpace { demand: process.size },
                process,
            });
        }
        let leftover = self.size - process.size;
        self.size = process.size;
        self.occupant = Some(process);

        Ok(if leftover > 0 {
            Some(Fragment::free(self.next_avail_addr(), leftover))
        } else { None })
    }

    /// Merges the free fragment that immediately follows into this one.
    pub(crate) fn absorb(&mut self, next: Fragment) {
        debug_assert!(self.is_free() && next.is_free(), "Absorbing an occupied fragment");
        debug_assert_eq!(self.next_avail_addr(), next.start, "Absorbing a non-adjacent fragment");
        self.size += next.size;
    }
}
