pub use std::{
    collections::{BTreeMap, HashSet, VecDeque},
    fmt,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};
pub use thiserror::Error;
pub use itertools::Itertools;
pub use clap::ValueEnum;

pub use crate::{Fit, Fragment, OverflowBuffer, Process, Simulation, Timeline,
    report::*,
    procset::*,
    timeline::{SimConfig, DEFAULT_SIZE},
    sim::RunOutcome,
    fit::{best_fit, worst_fit},
};

/// The unit for measuring both memory and logical time. A process asks
/// for some [`ByteSteps`] of memory and stays for some [`ByteSteps`] of
/// ticks.
pub type ByteSteps = usize;

/// Why a process could not be placed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    /// The smallest free fragment is too small right now, or there is no
    /// free fragment at all. Recoverable: the process waits in the
    /// [`OverflowBuffer`].
    #[error("Insufficient space for a demand of {demand}")]
    InsufficientSpace { demand: ByteSteps },
    /// The process is bigger than the whole memory and will never fit.
    #[error("{name} needs {demand} but the whole memory is {capacity}")]
    NoSpaceEver {
        name:       String,
        demand:     ByteSteps,
        capacity:   ByteSteps,
    },
}

/// A split that did not happen. The process is handed back untouched.
#[derive(Error, Debug)]
#[error("{reason} ({process})")]
pub struct Refused {
    pub reason:     FitError,
    pub process:    Process,
}

/// Appears while reading process records or validating them.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Cannot read process records: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: {message}")]
    Malformed {
        line:       usize,
        message:    String,
    },
    #[error("{message}\n{culprit:?}")]
    Invalid {
        message:    String,
        culprit:    Process,
    },
}

/// Defines the interface for reading processes.
///
/// [`TextParser`] reads the plain `name arrival memory duration` format.
/// Other sources only need to satisfy this trait.
pub trait ProcessGen {
    fn new(path: PathBuf) -> Self;
    /// Either every record is successfully returned, or the first
    /// problem encountered.
    fn read_processes(&self) -> Result<Vec<Process>, ProcessError>;
    /// Spawns one [`Process`] out of one record.
    fn gen_single(&self, record: &str, line: usize) -> Result<Process, ProcessError>;
}

//---START EXTERNAL INTERFACES

/// Number of whitespace-separated fields in a process record.
pub const RECORD_FIELDS_NUM: usize = 4;

/// Reads one process per line: `name arrival memory duration`.
/// Blank lines and lines starting with `#` are skipped.
pub struct TextParser {
    pub path: PathBuf,
}

impl TextParser {
    /// Same as [`read_processes`](ProcessGen::read_processes), for any
    /// buffered reader.
    pub fn read_from<R: BufRead>(&self, reader: R) -> Result<Vec<Process>, ProcessError> {
        let mut res = vec![];
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let record = line.trim();
            if record.is_empty() || record.starts_with('#') {
                continue;
            }
            // Humans count lines from 1.
            res.push(self.gen_single(record, idx + 1)?);
        }

        Ok(res)
    }
}

impl ProcessGen for TextParser {
    fn new(path: PathBuf) -> Self {
        Self {
            path
        }
    }

    fn read_processes(&self) -> Result<Vec<Process>, ProcessError> {
        let fd = std::fs::File::open(self.path.as_path())?;

        self.read_from(BufReader::new(fd))
    }

    fn gen_single(&self, record: &str, line: usize) -> Result<Process, ProcessError> {
        let fields: Vec<&str> = record.split_whitespace().collect();
        if fields.len() != RECORD_FIELDS_NUM {
            return Err(ProcessError::Malformed {
                line,
                message: format!("expected {} fields, found {}", RECORD_FIELDS_NUM, fields.len()),
            });
        }
        let mut data_buf: [ByteSteps; 3] = [0; 3];
        // First column is the name!
        for (idx, field) in fields[1..].iter().enumerate() {
            data_buf[idx] = field.parse().map_err(|_| ProcessError::Malformed {
                line,
                message: format!("{:?} is not a non-negative integer", field),
            })?;
        }

        Ok(Process::new(fields[0], data_buf[0], data_buf[1], data_buf[2]))
    }
}

//---END EXTERNAL INTERFACES
