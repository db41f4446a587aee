#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod ids;
mod routes;
mod workers;

use std::path::{Path, PathBuf};

use anyhow::Result;
use fs_err::File;

pub use ids::{RouteID, UniqueIDs, WorkerID};
pub use routes::{check_unique_routes, normalize_priority, Route, DEFAULT_PRIORITY};
pub use workers::{Shift, Worker};

/// Something that can hand out the routes to schedule.
pub trait RouteCatalog {
    fn list_routes(&self) -> Result<Vec<Route>>;
}

/// Routes already in memory. Repeated IDs are rejected, like in a CSV catalog.
impl RouteCatalog for Vec<Route> {
    fn list_routes(&self) -> Result<Vec<Route>> {
        check_unique_routes(self)?;
        Ok(self.clone())
    }
}

/// A route table exported to CSV, with columns `id,name,duration,avg_priority`.
pub struct CsvCatalog {
    path: PathBuf,
}

impl CsvCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RouteCatalog for CsvCatalog {
    fn list_routes(&self) -> Result<Vec<Route>> {
        let routes = routes::load(open(&self.path)?)
            .map_err(|err| anyhow!("{}: {err}", self.path.display()))?;
        info!("{} routes in {}", routes.len(), self.path.display());
        Ok(routes)
    }
}

pub fn load_routes<R: std::io::Read>(reader: R) -> Result<Vec<Route>> {
    routes::load(reader)
}

pub fn load_workers<R: std::io::Read>(reader: R) -> Result<Vec<Worker>> {
    workers::load(reader)
}

/// Reads a worker roster with columns `id,name,shift`.
pub fn load_workers_from_file(path: &Path) -> Result<Vec<Worker>> {
    let workers =
        workers::load(open(path)?).map_err(|err| anyhow!("{}: {err}", path.display()))?;
    info!("{} workers in {}", workers.len(), path.display());
    Ok(workers)
}

// fs_err already puts the path in the error message
fn open(path: &Path) -> Result<File> {
    Ok(File::open(path)?)
}
