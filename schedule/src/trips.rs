use anyhow::Result;
use serde::{Deserialize, Serialize};

use catalog::{Route, RouteID, Shift};

use crate::staffing::{durations_by_route, lookup_duration};
use crate::{ClockTime, ScheduleEntry, ShiftSplit};

/// One departure of a route, with the time the vehicle gets back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub route_id: RouteID,
    pub start: ClockTime,
    /// May be earlier than `start` when the trip runs past midnight.
    pub end: ClockTime,
    pub duration_minutes: u32,
    pub shift: Shift,
}

/// Expands every departure into a trip, in entry order and then departure order.
pub fn expand_trips(
    entries: &[ScheduleEntry],
    routes: &[Route],
    shifts: &ShiftSplit,
) -> Result<Vec<Trip>> {
    let durations = durations_by_route(routes)?;
    let mut trips = Vec::new();
    for entry in entries {
        let duration_minutes = lookup_duration(&durations, &entry.route_id)?;
        for start in &entry.departures {
            trips.push(Trip {
                route_id: entry.route_id.clone(),
                start: *start,
                end: start.plus_minutes(duration_minutes),
                duration_minutes,
                shift: shifts.classify(*start),
            });
        }
    }
    Ok(trips)
}
