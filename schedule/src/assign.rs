//! Hands generated trips to the workers of each shift.
//!
//! Within a shift, trips are taken in operating-day order and each goes to whoever has the
//! fewest minutes assigned so far. Trips don't need to be disjoint in time; the roster is only
//! balanced by workload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use catalog::{Shift, Worker, WorkerID};

use crate::{ShiftSplit, Trip};

/// Rough number of trips one worker covers in a day.
pub const TRIPS_PER_WORKER_TARGET: usize = 8;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkerSchedule {
    pub worker_id: WorkerID,
    pub name: String,
    pub shift: Shift,
    /// In the order they were assigned, which is operating-day order.
    pub assignments: Vec<Trip>,
    pub total_work_minutes: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    /// One per input worker, in roster order.
    pub workers: Vec<WorkerSchedule>,
    pub unassigned: Vec<Trip>,
}

pub fn assign_trips(
    trips: Vec<Trip>,
    workers: &[Worker],
    shifts: &ShiftSplit,
) -> AssignmentOutcome {
    let mut schedules: Vec<WorkerSchedule> = workers
        .iter()
        .map(|w| WorkerSchedule {
            worker_id: w.worker_id.clone(),
            name: w.name.clone(),
            shift: w.shift,
            assignments: Vec::new(),
            total_work_minutes: 0,
        })
        .collect();

    let mut trips_per_shift: BTreeMap<Shift, Vec<Trip>> = BTreeMap::new();
    for trip in trips {
        trips_per_shift
            .entry(trip.shift)
            .or_insert_with(Vec::new)
            .push(trip);
    }

    let mut unassigned = Vec::new();
    for (shift, mut demand) in trips_per_shift {
        let supply: Vec<usize> = schedules
            .iter()
            .enumerate()
            .filter(|(_, w)| w.shift == shift)
            .map(|(idx, _)| idx)
            .collect();
        if supply.is_empty() {
            warn!(
                "No workers for the {shift} shift, leaving {} trips unassigned",
                demand.len()
            );
            unassigned.extend(demand);
            continue;
        }
        info!(
            "{} {shift} trips to assign to {} workers",
            demand.len(),
            supply.len()
        );

        // Stable, so departures at the same time keep their route order
        demand.sort_by_key(|trip| shifts.normalized_minutes(trip.start));
        for trip in demand {
            // min_by_key keeps the first of several equally loaded workers
            let idx = supply
                .iter()
                .copied()
                .min_by_key(|idx| schedules[*idx].total_work_minutes);
            if let Some(idx) = idx {
                let worker = &mut schedules[idx];
                worker.total_work_minutes += u64::from(trip.duration_minutes);
                worker.assignments.push(trip);
            }
        }
    }

    AssignmentOutcome {
        workers: schedules,
        unassigned,
    }
}

/// Compares the roster size against a rule-of-thumb demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentStats {
    pub total_trips: usize,
    pub total_workers: usize,
    pub workers_needed: usize,
    pub trips_per_worker: usize,
    pub sufficient: bool,
}

impl AssignmentStats {
    pub fn calculate(total_trips: usize, total_workers: usize) -> Self {
        let workers_needed = total_trips.div_ceil(TRIPS_PER_WORKER_TARGET);
        let trips_per_worker = if total_workers == 0 {
            0
        } else {
            total_trips.div_ceil(total_workers)
        };
        Self {
            total_trips,
            total_workers,
            workers_needed,
            trips_per_worker,
            sufficient: total_workers >= workers_needed,
        }
    }
}
