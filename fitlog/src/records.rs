use std::io::{self, BufRead};
use fitcore::{ByteSteps, Extent, Occupant, TickEvent, TickReport};
use serde::{Deserialize, Serialize};

/// On-disk form of a [`TickReport`]: one JSON object per tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRecord {
    pub time:       ByteSteps,
    pub layout:     Vec<ExtentRecord>,
    pub events:     Vec<EventRecord>,
    pub buffered:   usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtentRecord {
    pub start:      ByteSteps,
    pub size:       ByteSteps,
    // Both absent for holes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process:    Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining:  Option<ByteSteps>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventRecord {
    Placed      { name: String, start: ByteSteps, size: ByteSteps },
    Buffered    { name: String, size: ByteSteps },
    Dropped     { name: String, size: ByteSteps },
    Departed    { name: String, start: ByteSteps, size: ByteSteps },
}

impl From<&Extent> for ExtentRecord {
    fn from(e: &Extent) -> Self {
        Self {
            start:      e.start,
            size:       e.size,
            process:    e.occupant.as_ref().map(|o| o.name.clone()),
            remaining:  e.occupant.as_ref().map(|o| o.remaining),
        }
    }
}

impl From<ExtentRecord> for Extent {
    fn from(r: ExtentRecord) -> Self {
        Self {
            start:      r.start,
            size:       r.size,
            occupant:   r.process.map(|name| Occupant {
                name,
                remaining:  r.remaining.unwrap_or(0),
            }),
        }
    }
}

impl From<&TickEvent> for EventRecord {
    fn from(e: &TickEvent) -> Self {
        match e.clone() {
            TickEvent::Placed { name, start, size }     => { EventRecord::Placed { name, start, size } },
            TickEvent::Buffered { name, size }          => { EventRecord::Buffered { name, size } },
            TickEvent::Dropped { name, size }           => { EventRecord::Dropped { name, size } },
            TickEvent::Departed { name, start, size }   => { EventRecord::Departed { name, start, size } },
        }
    }
}

impl From<EventRecord> for TickEvent {
    fn from(r: EventRecord) -> Self {
        match r {
            EventRecord::Placed { name, start, size }   => { TickEvent::Placed { name, start, size } },
            EventRecord::Buffered { name, size }        => { TickEvent::Buffered { name, size } },
            EventRecord::Dropped { name, size }         => { TickEvent::Dropped { name, size } },
            EventRecord::Departed { name, start, size } => { TickEvent::Departed { name, start, size } },
        }
    }
}

impl From<&TickReport> for TickRecord {
    fn from(r: &TickReport) -> Self {
        Self {
            time:       r.time,
            layout:     r.layout.iter().map(ExtentRecord::from).collect(),
            events:     r.events.iter().map(EventRecord::from).collect(),
            buffered:   r.buffered,
        }
    }
}

impl From<TickRecord> for TickReport {
    fn from(r: TickRecord) -> Self {
        Self {
            time:       r.time,
            layout:     r.layout.into_iter().map(Extent::from).collect(),
            events:     r.events.into_iter().map(TickEvent::from).collect(),
            buffered:   r.buffered,
        }
    }
}

/// Reads a JSON-lines tick log back. Blank lines are skipped.
pub fn read_records<R: BufRead>(reader: R) -> io::Result<Vec<TickRecord>> {
    let mut res = vec![];
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        res.push(serde_json::from_str(&line)?);
    }

    Ok(res)
}
