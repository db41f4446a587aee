use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{UniqueIDs, WorkerID};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Evening,
}

impl Shift {
    pub fn all() -> [Self; 2] {
        [Shift::Morning, Shift::Evening]
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Shift::Morning => write!(f, "morning"),
            Shift::Evening => write!(f, "evening"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub worker_id: WorkerID,
    pub name: String,
    pub shift: Shift,
}

impl Worker {
    pub fn new(worker_id: impl Into<String>, name: impl Into<String>, shift: Shift) -> Self {
        Self {
            worker_id: WorkerID::new(worker_id),
            name: name.into(),
            shift,
        }
    }
}

/// Reads `id,name,shift` records, preserving file order.
pub fn load<R: std::io::Read>(reader: R) -> Result<Vec<Worker>> {
    let mut workers = Vec::new();
    let mut ids = UniqueIDs::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        ids.insert_new(&rec.id)?;
        workers.push(Worker {
            worker_id: rec.id,
            name: rec.name,
            shift: rec.shift,
        });
    }
    debug!("Loaded {} workers", workers.len());
    Ok(workers)
}

#[derive(Deserialize)]
struct Record {
    id: WorkerID,
    name: String,
    shift: Shift,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_workers() {
        let input = "id,name,shift\nw1,Ana,morning\nw2,Bo,evening\n";
        let workers = load(input.as_bytes()).unwrap();
        assert_eq!(
            workers,
            vec![
                Worker::new("w1", "Ana", Shift::Morning),
                Worker::new("w2", "Bo", Shift::Evening),
            ]
        );
    }

    #[test]
    fn unknown_shift_fails() {
        let input = "id,name,shift\nw1,Ana,night\n";
        assert!(load(input.as_bytes()).is_err());
    }

    #[test]
    fn duplicate_worker_fails() {
        let input = "id,name,shift\nw1,Ana,morning\nw1,Bo,evening\n";
        assert!(load(input.as_bytes()).is_err());
    }
}
