use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use catalog::{check_unique_routes, Route, RouteID};

use crate::{ClockTime, ScheduleEntry, StaffingResult};

/// One stored row per route, the way schedules are kept between runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub route_id: RouteID,
    pub display_id: String,
    pub departures: Vec<ClockTime>,
    pub departures_with_end_times: Vec<TripTimes>,
    pub frequency: u32,
    pub priority: f64,
    pub estimated_time: u32,
    pub morning_staff: u32,
    pub evening_staff: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripTimes {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl ScheduleRecord {
    /// Pairs each entry with its route. Every entry must belong to one of `routes`.
    pub fn build(
        entries: &[ScheduleEntry],
        routes: &[Route],
        staffing: &StaffingResult,
    ) -> Result<Vec<Self>> {
        check_unique_routes(routes)?;
        let mut records = Vec::new();
        for entry in entries {
            let route = match routes.iter().find(|r| r.route_id == entry.route_id) {
                Some(r) => r,
                None => bail!("No route for schedule {:?}", entry.route_id),
            };
            records.push(ScheduleRecord {
                route_id: entry.route_id.clone(),
                display_id: route.describe(),
                departures: entry.departures.clone(),
                departures_with_end_times: entry
                    .departures
                    .iter()
                    .map(|start| TripTimes {
                        start_time: *start,
                        end_time: start.plus_minutes(route.estimated_time),
                    })
                    .collect(),
                frequency: entry.frequency_minutes,
                priority: route.priority,
                estimated_time: route.estimated_time,
                morning_staff: staffing.morning_staff,
                evening_staff: staffing.evening_staff,
            });
        }
        Ok(records)
    }

    pub fn to_entry(&self) -> ScheduleEntry {
        ScheduleEntry {
            route_id: self.route_id.clone(),
            departures: self.departures.clone(),
            frequency_minutes: self.frequency,
        }
    }
}

/// Somewhere generated schedules are kept. Saving replaces whatever was stored before.
pub trait ScheduleSink {
    fn save_schedules(&mut self, records: &[ScheduleRecord]) -> Result<()>;
}

impl ScheduleSink for Vec<ScheduleRecord> {
    fn save_schedules(&mut self, records: &[ScheduleRecord]) -> Result<()> {
        self.clear();
        self.extend_from_slice(records);
        Ok(())
    }
}

/// Writes all records as one pretty-printed JSON array.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScheduleSink for JsonFileSink {
    fn save_schedules(&mut self, records: &[ScheduleRecord]) -> Result<()> {
        fs_err::write(&self.path, serde_json::to_string_pretty(records)?)?;
        info!(
            "Wrote {} route schedules to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

pub fn load_records(path: &Path) -> Result<Vec<ScheduleRecord>> {
    let bytes = fs_err::read(path)?;
    let records =
        serde_json::from_slice(&bytes).map_err(|err| anyhow!("{}: {err}", path.display()))?;
    Ok(records)
}
