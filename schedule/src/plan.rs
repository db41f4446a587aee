use anyhow::Result;
use chrono::NaiveDate;

use catalog::{Route, RouteCatalog};

use crate::store::{ScheduleRecord, ScheduleSink};
use crate::{generate, staffing, ScheduleConfig, ScheduleEntry, ShiftSplit, StaffingResult};

/// Everything produced for one operating day.
pub struct DayPlan {
    pub date: NaiveDate,
    pub routes: Vec<Route>,
    pub entries: Vec<ScheduleEntry>,
    pub staffing: StaffingResult,
}

impl DayPlan {
    pub fn build(routes: Vec<Route>, config: &ScheduleConfig, date: NaiveDate) -> Result<Self> {
        config.validate()?;
        let shifts = ShiftSplit::from_config(config)?;
        let entries = generate::generate(
            &routes,
            &config.operating_day(date),
            &config.peak_windows,
            config.default_interval_minutes,
        )?;
        let staffing =
            staffing::estimate(&entries, &routes, &shifts, config.required_work_minutes)?;
        Ok(Self {
            date,
            routes,
            entries,
            staffing,
        })
    }

    pub fn from_catalog(
        catalog: &dyn RouteCatalog,
        config: &ScheduleConfig,
        date: NaiveDate,
    ) -> Result<Self> {
        Self::build(catalog.list_routes()?, config, date)
    }

    pub fn total_departures(&self) -> usize {
        self.entries.iter().map(|e| e.departures.len()).sum()
    }

    pub fn records(&self) -> Result<Vec<ScheduleRecord>> {
        ScheduleRecord::build(&self.entries, &self.routes, &self.staffing)
    }

    pub fn save(&self, sink: &mut dyn ScheduleSink) -> Result<()> {
        sink.save_schedules(&self.records()?)
    }
}
