use crate::helpe::*;

/// Validates a set of processes before it goes anywhere near a
/// [`Timeline`]. Successfully returned processes are guaranteed to have:
/// - a non-empty name, unique across the set
/// - a non-zero memory demand
/// - a non-zero duration
///
/// This function is the gatekeeper to the rest of the library. Order is
/// preserved, since it decides who gets served first among processes
/// arriving together.
pub fn init(processes: Vec<Process>) -> Result<Vec<Process>, ProcessError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut culprit = None;
    for (idx, p) in processes.iter().enumerate() {
        let message = if p.name.is_empty() {
            "Process without a name found!"
        } else if p.size == 0 {
            "Process with 0 memory found!"
        } else if p.remaining == 0 {
            "Process with 0 duration found!"
        } else if !seen.insert(p.name.as_str()) {
            "Two processes with same name found!"
        } else { continue; };
        culprit = Some((idx, message));
        break;
    }

    match culprit {
        Some((idx, message))    => {
            let mut processes = processes;
            Err(ProcessError::Invalid {
                message: String::from(message),
                culprit: processes.swap_remove(idx),
            })
        },
        None    => { Ok(processes) }
    }
}

/// Supplies the processes that show up at a given moment.
pub trait ArrivalSource {
    /// Hands over (and forgets) every process arriving at `time`.
    fn arrivals_at(&mut self, time: ByteSteps) -> Vec<Process>;
    /// How many processes have yet to arrive.
    fn pending(&self) -> usize;
}

/// Processes that have not arrived yet, grouped by arrival time.
///
/// Within the same arrival time, processes come out in the order they
/// went in.
#[derive(Debug, Default, Clone)]
pub struct Schedule {
    by_time: BTreeMap<ByteSteps, Vec<Process>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, process: Process) {
        self.by_time
            .entry(process.arrival)
            .or_default()
            .push(process);
    }

    /// Arrival time of the next batch, if any.
    pub fn next_arrival(&self) -> Option<ByteSteps> {
        self.by_time.keys().next().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_time.is_empty()
    }
}

impl ArrivalSource for Schedule {
    /// Processes due *before* `time` are released too. The clock starts
    /// at 1, so without this anything arriving at 0 would never show up.
    fn arrivals_at(&mut self, time: ByteSteps) -> Vec<Process> {
        let later = self.by_time.split_off(&(time + 1));
        let due = std::mem::replace(&mut self.by_time, later);

        due.into_values()
            .flatten()
            .collect()
    }

    fn pending(&self) -> usize {
        self.by_time.values()
            .map(|batch| batch.len())
            .sum()
    }
}

impl FromIterator<Process> for Schedule {
    fn from_iter<T: IntoIterator<Item = Process>>(iter: T) -> Self {
        let mut res = Self::new();
        for p in iter {
            res.push(p);
        }

        res
    }
}
