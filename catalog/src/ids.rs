use std::collections::BTreeSet;
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteID(String);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerID(String);

impl RouteID {
    pub fn new(x: impl Into<String>) -> Self {
        Self(x.into())
    }
}

impl WorkerID {
    pub fn new(x: impl Into<String>) -> Self {
        Self(x.into())
    }
}

impl fmt::Display for RouteID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for WorkerID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remembers every ID inserted so far, failing on the first repeat.
pub struct UniqueIDs<K: Ord> {
    seen: BTreeSet<K>,
}

impl<K: Clone + fmt::Debug + Ord> UniqueIDs<K> {
    pub fn new() -> Self {
        Self {
            seen: BTreeSet::new(),
        }
    }

    pub fn insert_new(&mut self, id: &K) -> Result<()> {
        if !self.seen.insert(id.clone()) {
            bail!("Duplicate {:?}", id);
        }
        Ok(())
    }
}
