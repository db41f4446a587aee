//! Departure schedules and staffing for a day of transit service.
//!
//! `generate` turns a route catalog and operating hours into departures per route, `estimate`
//! derives how many staff each shift needs, and `assign_trips` balances the resulting trips over
//! a roster. Nothing here reads the system clock or touches the network; the date of the
//! operating day is always passed in.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod assign;
mod config;
mod generate;
mod plan;
mod staffing;
mod store;
mod time;
mod trips;

pub use catalog::{Route, RouteCatalog, RouteID, Shift, Worker, WorkerID};

pub use self::assign::{
    assign_trips, AssignmentOutcome, AssignmentStats, WorkerSchedule, TRIPS_PER_WORKER_TARGET,
};
pub use self::config::{matching_peak, OperatingDay, PeakWindow, ScheduleConfig, ShiftWindow};
pub use self::generate::{
    adjusted_frequency, base_frequency, generate, ScheduleEntry, DEFAULT_INTERVAL_MINUTES,
    MIN_FREQUENCY_MINUTES, PEAK_FACTOR,
};
pub use self::plan::DayPlan;
pub use self::staffing::{estimate, staff_needed, ShiftSplit, StaffingResult, UTILIZATION_BUFFER};
pub use self::store::{load_records, JsonFileSink, ScheduleRecord, ScheduleSink, TripTimes};
pub use self::time::ClockTime;
pub use self::trips::{expand_trips, Trip};
