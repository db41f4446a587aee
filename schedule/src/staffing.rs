//! Minimum headcount per shift, from the minutes of driving a day of departures generates.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use catalog::{Route, RouteID, Shift, UniqueIDs};

use crate::config::{validate_required_work_minutes, ShiftWindow};
use crate::{ClockTime, ScheduleEntry};

/// Employees are planned at 90% of their required work time.
pub const UTILIZATION_BUFFER: f64 = 0.9;

/// Decides which shift a departure belongs to.
///
/// Hours before the start of the operating day are moved past 24, so a 00:30 departure in a day
/// starting at 06:00 lands on hour 24. Anything outside of the morning window counts as evening;
/// the evening window is only validated, never consulted.
#[derive(Clone, Debug, PartialEq)]
pub struct ShiftSplit {
    morning: ShiftWindow,
    work_start_hour: u32,
}

impl ShiftSplit {
    pub fn new(morning: ShiftWindow, evening: ShiftWindow, work_start_hour: u32) -> Result<Self> {
        morning.validate("morning")?;
        evening.validate("evening")?;
        if work_start_hour > 23 {
            bail!("The operating day can't start at hour {work_start_hour}");
        }
        if morning.end_hour != evening.start_hour {
            warn!(
                "The evening shift {}-{} doesn't start where the morning shift {}-{} ends. \
                 Everything outside the morning shift still counts as evening.",
                evening.start_hour, evening.end_hour, morning.start_hour, morning.end_hour
            );
        }
        Ok(Self {
            morning,
            work_start_hour,
        })
    }

    pub fn from_config(config: &crate::ScheduleConfig) -> Result<Self> {
        Self::new(
            config.morning_shift.clone(),
            config.evening_shift.clone(),
            config.work_start.hour(),
        )
    }

    pub fn normalized_hour(&self, time: ClockTime) -> u32 {
        if time.hour() < self.work_start_hour {
            time.hour() + 24
        } else {
            time.hour()
        }
    }

    /// Minutes on the same axis as `normalized_hour`, for ordering within an operating day.
    pub fn normalized_minutes(&self, time: ClockTime) -> u32 {
        self.normalized_hour(time) * 60 + time.minute()
    }

    pub fn classify(&self, time: ClockTime) -> Shift {
        if self.morning.contains(self.normalized_hour(time)) {
            Shift::Morning
        } else {
            Shift::Evening
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingResult {
    pub morning_staff: u32,
    pub evening_staff: u32,
    pub morning_minutes: u64,
    pub evening_minutes: u64,
}

impl StaffingResult {
    pub fn staff(&self, shift: Shift) -> u32 {
        match shift {
            Shift::Morning => self.morning_staff,
            Shift::Evening => self.evening_staff,
        }
    }

    pub fn minutes(&self, shift: Shift) -> u64 {
        match shift {
            Shift::Morning => self.morning_minutes,
            Shift::Evening => self.evening_minutes,
        }
    }

    pub fn total_minutes(&self) -> u64 {
        self.morning_minutes + self.evening_minutes
    }
}

/// Fails when two routes share an ID, since they'd disagree about the duration.
pub(crate) fn durations_by_route(routes: &[Route]) -> Result<HashMap<&RouteID, u32>> {
    let mut ids = UniqueIDs::new();
    let mut durations = HashMap::new();
    for route in routes {
        ids.insert_new(&route.route_id)?;
        durations.insert(&route.route_id, route.estimated_time);
    }
    Ok(durations)
}

/// A departure for a route missing from the catalog is an error, never a guessed duration.
pub(crate) fn lookup_duration(
    durations: &HashMap<&RouteID, u32>,
    route_id: &RouteID,
) -> Result<u32> {
    match durations.get(route_id) {
        Some(x) if *x > 0 => Ok(*x),
        Some(_) => bail!("{:?} has a zero estimated time", route_id),
        None => bail!("No estimated time for {:?}", route_id),
    }
}

pub fn staff_needed(minutes: u64, required_work_minutes: f64) -> u32 {
    let adjusted = required_work_minutes * UTILIZATION_BUFFER;
    (minutes as f64 / adjusted).ceil() as u32
}

/// Every departure contributes its route's trip duration to the shift it falls in.
pub fn estimate(
    entries: &[ScheduleEntry],
    routes: &[Route],
    shifts: &ShiftSplit,
    required_work_minutes: f64,
) -> Result<StaffingResult> {
    validate_required_work_minutes(required_work_minutes)?;
    let durations = durations_by_route(routes)?;

    let mut result = StaffingResult::default();
    for entry in entries {
        let duration = u64::from(lookup_duration(&durations, &entry.route_id)?);
        for departure in &entry.departures {
            match shifts.classify(*departure) {
                Shift::Morning => result.morning_minutes += duration,
                Shift::Evening => result.evening_minutes += duration,
            }
        }
    }
    result.morning_staff = staff_needed(result.morning_minutes, required_work_minutes);
    result.evening_staff = staff_needed(result.evening_minutes, required_work_minutes);

    info!(
        "{} morning minutes need {} staff, {} evening minutes need {} staff",
        result.morning_minutes, result.morning_staff, result.evening_minutes, result.evening_staff
    );
    Ok(result)
}
