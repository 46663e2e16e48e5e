use fitcore::{ByteSteps, Extent, TickReport};
use serde::Serialize;

/// How cut up memory was during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FragStats {
    pub time:           ByteSteps,
    pub used:           ByteSteps,
    pub free:           ByteSteps,
    pub holes:          usize,
    pub largest_hole:   ByteSteps,
}

impl FragStats {
    pub fn from_layout(time: ByteSteps, layout: &[Extent]) -> Self {
        let (holes, occupied): (Vec<&Extent>, Vec<&Extent>) = layout.iter()
            .partition(|e| e.is_free());

        Self {
            time,
            used:           occupied.iter().map(|e| e.size).sum(),
            free:           holes.iter().map(|e| e.size).sum(),
            holes:          holes.len(),
            largest_hole:   holes.iter().map(|e| e.size).max().unwrap_or(0),
        }
    }

    pub fn from_report(report: &TickReport) -> Self {
        Self::from_layout(report.time, &report.layout)
    }

    /// External fragmentation: the share of free memory that the
    /// largest hole cannot serve. 0 for no free memory or a single hole.
    pub fn external(&self) -> f64 {
        if self.free == 0 {
            return 0.0;
        }

        1.0 - self.largest_hole as f64 / self.free as f64
    }

    /// Fraction of memory in use.
    pub fn occupancy(&self) -> f64 {
        let total = self.used + self.free;
        if total == 0 {
            return 0.0;
        }

        self.used as f64 / total as f64
    }
}
