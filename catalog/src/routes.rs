use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{RouteID, UniqueIDs};

/// Priority used when the catalog doesn't give a usable one.
pub const DEFAULT_PRIORITY: f64 = 5.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub route_id: RouteID,
    pub name: Option<String>,
    /// Trip duration in minutes. Always positive.
    pub estimated_time: u32,
    /// Nominally in [1, 10]. Consumers clamp before using it.
    pub priority: f64,
}

impl Route {
    /// A zero or non-finite `priority` becomes the default, as when loading a catalog.
    pub fn new(route_id: impl Into<String>, estimated_time: u32, priority: f64) -> Self {
        Self {
            route_id: RouteID::new(route_id),
            name: None,
            estimated_time,
            priority: normalize_priority(Some(priority)),
        }
    }

    pub fn describe(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.route_id.to_string())
    }
}

/// Absent, zero, and non-finite priorities all mean "use the default".
pub fn normalize_priority(priority: Option<f64>) -> f64 {
    match priority {
        Some(x) if x.is_finite() && x != 0.0 => x,
        _ => DEFAULT_PRIORITY,
    }
}

/// Every route in a catalog must have its own ID.
pub fn check_unique_routes(routes: &[Route]) -> Result<()> {
    let mut ids = UniqueIDs::new();
    for route in routes {
        ids.insert_new(&route.route_id)?;
    }
    Ok(())
}

/// Reads `id,name,duration,avg_priority` records, preserving file order.
pub fn load<R: std::io::Read>(reader: R) -> Result<Vec<Route>> {
    let mut routes = Vec::new();
    let mut ids = UniqueIDs::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        ids.insert_new(&rec.id)?;
        let estimated_time = match rec.duration {
            Some(0) => bail!("{:?} has a zero duration", rec.id),
            Some(x) => x,
            None => bail!("{:?} has no duration", rec.id),
        };
        routes.push(Route {
            route_id: rec.id,
            name: rec.name.filter(|x| !x.is_empty()),
            estimated_time,
            priority: normalize_priority(rec.avg_priority),
        });
    }
    debug!("Loaded {} routes", routes.len());
    Ok(routes)
}

#[derive(Deserialize)]
struct Record {
    id: RouteID,
    name: Option<String>,
    duration: Option<u32>,
    avg_priority: Option<f64>,
}
