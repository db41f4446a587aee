#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use structopt::StructOpt;

use catalog::{CsvCatalog, RouteCatalog, Shift};
use schedule::{
    assign_trips, expand_trips, load_records, AssignmentOutcome, AssignmentStats, DayPlan,
    JsonFileSink, ScheduleConfig, ShiftSplit, StaffingResult,
};

#[derive(StructOpt)]
#[structopt(about = "Plans a day of route departures and the staff to drive them")]
enum Args {
    /// Generate departures for every route, estimate staffing, and optionally store the result
    Generate {
        /// A CSV file with columns id,name,duration,avg_priority
        #[structopt(long)]
        routes: PathBuf,
        /// A JSON file with scheduling settings. Missing fields use defaults.
        #[structopt(long)]
        config: Option<PathBuf>,
        /// The operating day, as YYYY-MM-DD
        #[structopt(long)]
        date: NaiveDate,
        /// Where to write the route schedules as JSON
        #[structopt(long)]
        output: Option<PathBuf>,
    },
    /// Recompute staffing from previously stored schedules
    Staff {
        #[structopt(long)]
        routes: PathBuf,
        /// A JSON file written by `generate`
        #[structopt(long)]
        schedules: PathBuf,
        #[structopt(long)]
        config: Option<PathBuf>,
    },
    /// Balance the trips of stored schedules over a roster of workers
    Assign {
        #[structopt(long)]
        routes: PathBuf,
        #[structopt(long)]
        schedules: PathBuf,
        /// A CSV file with columns id,name,shift
        #[structopt(long)]
        workers: PathBuf,
        #[structopt(long)]
        config: Option<PathBuf>,
        /// Where to write each worker's assignments as JSON
        #[structopt(long)]
        output: Option<PathBuf>,
    },
    /// Write the default settings, as a starting point for editing
    DefaultConfig {
        #[structopt(long)]
        output: PathBuf,
    },
}

impl Args {
    fn run(self) -> Result<()> {
        match self {
            Args::Generate {
                routes,
                config,
                date,
                output,
            } => {
                let config = load_config(config.as_deref())?;
                let plan = DayPlan::from_catalog(&CsvCatalog::new(routes), &config, date)?;
                info!(
                    "{} departures across {} routes on {}",
                    plan.total_departures(),
                    plan.entries.len(),
                    plan.date
                );
                let day = config.operating_day(plan.date);
                if day.crosses_midnight() {
                    info!(
                        "The operating day runs past midnight, from {} until {}",
                        day.start(),
                        day.end()
                    );
                }
                describe_staffing(&plan.staffing);
                if let Some(path) = output {
                    plan.save(&mut JsonFileSink::new(path))?;
                }
                Ok(())
            }
            Args::Staff {
                routes,
                schedules,
                config,
            } => {
                let config = load_config(config.as_deref())?;
                let routes = CsvCatalog::new(routes).list_routes()?;
                let entries: Vec<_> = load_records(&schedules)?
                    .iter()
                    .map(|r| r.to_entry())
                    .collect();
                let staffing = schedule::estimate(
                    &entries,
                    &routes,
                    &ShiftSplit::from_config(&config)?,
                    config.required_work_minutes,
                )?;
                describe_staffing(&staffing);
                Ok(())
            }
            Args::Assign {
                routes,
                schedules,
                workers,
                config,
                output,
            } => {
                let config = load_config(config.as_deref())?;
                let shifts = ShiftSplit::from_config(&config)?;
                let routes = CsvCatalog::new(routes).list_routes()?;
                let entries: Vec<_> = load_records(&schedules)?
                    .iter()
                    .map(|r| r.to_entry())
                    .collect();
                let workers = catalog::load_workers_from_file(&workers)?;

                let trips = expand_trips(&entries, &routes, &shifts)?;
                let stats = AssignmentStats::calculate(trips.len(), workers.len());
                let outcome = assign_trips(trips, &workers, &shifts);
                describe_assignment(&outcome, &stats);
                if let Some(path) = output {
                    write_json(&path, &outcome)?;
                }
                Ok(())
            }
            Args::DefaultConfig { output } => {
                ScheduleConfig::default().save(&output)?;
                info!("Wrote default settings to {}", output.display());
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ScheduleConfig> {
    match path {
        Some(path) => ScheduleConfig::load(path),
        None => Ok(ScheduleConfig::default()),
    }
}

fn describe_staffing(staffing: &StaffingResult) {
    for shift in Shift::all() {
        info!(
            "{shift} shift: {} minutes of driving, {} staff",
            staffing.minutes(shift),
            staffing.staff(shift)
        );
    }
}

fn describe_assignment(outcome: &AssignmentOutcome, stats: &AssignmentStats) {
    for worker in &outcome.workers {
        info!(
            "{} ({}, {}): {} trips, {} minutes",
            worker.name,
            worker.worker_id,
            worker.shift,
            worker.assignments.len(),
            worker.total_work_minutes
        );
    }
    info!(
        "{} trips, {} workers, about {} needed, {} trips per worker",
        stats.total_trips, stats.total_workers, stats.workers_needed, stats.trips_per_worker
    );
    if !stats.sufficient {
        warn!(
            "The roster is short by {} workers",
            stats.workers_needed - stats.total_workers
        );
    }
    if !outcome.unassigned.is_empty() {
        warn!("{} trips were left unassigned", outcome.unassigned.len());
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    fs_err::write(path, serde_json::to_string_pretty(value)?)
        .map_err(|err| anyhow!("Couldn't write results: {err}"))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = Args::from_args().run() {
        error!("{err:#}");
        std::process::exit(1);
    }
}
