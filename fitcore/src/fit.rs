use crate::helpe::*;

impl Fit {
    /// Returns the index of the fragment that should host a process of
    /// size `demand`.
    ///
    /// Both policies refuse with [`FitError::InsufficientSpace`] unless
    /// the *smallest* free fragment can take `demand` on its own, even
    /// when a bigger hole elsewhere could.
    pub fn select_fragment(
        &self,
        fragments:  &[Fragment],
        demand:     ByteSteps,
    ) -> Result<usize, FitError> {
        debug_assert!(!fragments.is_empty(), "Memory without fragments");
        debug_assert!(demand > 0, "Zero demand");
        let smallest_hole = fragments.iter()
            .filter(|f| f.is_free())
            .map(|f| f.size())
            .min();
        match smallest_hole {
            Some(size) if size >= demand    => {},
            _                               => { return Err(FitError::InsufficientSpace { demand }); }
        }
        // A lone free fragment is the whole region.
        if fragments.len() == 1 {
            return Ok(0);
        }

        match self {
            Fit::Best   => { best_fit(fragments, demand) },
            Fit::Worst  => { worst_fit(fragments, demand) },
        }
    }
}

fn candidates(
    fragments:  &[Fragment],
    demand:     ByteSteps,
) -> impl Iterator<Item = (usize, &Fragment)> {
    fragments.iter()
        .enumerate()
        .filter(move |(_, f)| f.is_free() && f.size() >= demand)
}

/// The smallest free fragment that can take `demand`. Among equally small
/// ones, the one with the lowest index wins.
pub fn best_fit(fragments: &[Fragment], demand: ByteSteps) -> Result<usize, FitError> {
    candidates(fragments, demand)
        // `min_by_key` keeps the first of equal minima.
        .min_by_key(|(_, f)| f.size())
        .map(|(idx, _)| idx)
        .ok_or(FitError::InsufficientSpace { demand })
}

/// The largest free fragment that can take `demand`. Among equally large
/// ones, the one with the lowest index wins.
pub fn worst_fit(fragments: &[Fragment], demand: ByteSteps) -> Result<usize, FitError> {
    candidates(fragments, demand)
        // `max_by_key` would keep the *last* of equal maxima, so
        // the index has to take part in the comparison.
        .max_by(|(a_idx, a), (b_idx, b)| {
            a.size()
                .cmp(&b.size())
                .then_with(|| b_idx.cmp(a_idx))
        })
        .map(|(idx, _)| idx)
        .ok_or(FitError::InsufficientSpace { demand })
}
