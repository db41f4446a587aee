//! Caller-owned settings for one planning run, persisted as JSON.

use std::path::Path;

use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::ClockTime;

/// An hour range `[start_hour, end_hour)` with more frequent service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakWindow {
    pub start_hour: u32,
    pub end_hour: u32,
    pub frequency_minutes: u32,
}

impl PeakWindow {
    pub fn new(start_hour: u32, end_hour: u32, frequency_minutes: u32) -> Self {
        Self {
            start_hour,
            end_hour,
            frequency_minutes,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }

    /// How far the simulation clock steps while inside this window.
    pub fn sampling_interval(&self) -> u32 {
        self.frequency_minutes / 2
    }

    fn validate(&self) -> Result<()> {
        if self.start_hour > 23 {
            bail!("Peak window starts at hour {}", self.start_hour);
        }
        if self.end_hour > 24 {
            bail!("Peak window ends at hour {}", self.end_hour);
        }
        if self.start_hour >= self.end_hour {
            bail!(
                "Peak window {}-{} is empty",
                self.start_hour,
                self.end_hour
            );
        }
        if self.sampling_interval() == 0 {
            bail!(
                "Peak window {}-{} has frequency {} minutes; it must be at least 2",
                self.start_hour,
                self.end_hour,
                self.frequency_minutes
            );
        }
        Ok(())
    }
}

/// The first window containing `hour`, in list order.
pub fn matching_peak(peak_windows: &[PeakWindow], hour: u32) -> Option<&PeakWindow> {
    peak_windows.iter().find(|w| w.contains(hour))
}

pub fn validate_peak_windows(peak_windows: &[PeakWindow]) -> Result<()> {
    for w in peak_windows {
        w.validate()?;
    }
    Ok(())
}

/// An hour range `[start_hour, end_hour)` on the operating-day axis. Hours past 24 are after
/// midnight, so 25 is 1am the next calendar day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl ShiftWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }

    pub(crate) fn validate(&self, label: &str) -> Result<()> {
        if self.start_hour >= self.end_hour {
            bail!(
                "The {label} shift {}-{} is empty",
                self.start_hour,
                self.end_hour
            );
        }
        if self.end_hour > 48 {
            bail!("The {label} shift ends at hour {}", self.end_hour);
        }
        Ok(())
    }
}

pub(crate) fn validate_required_work_minutes(required_work_minutes: f64) -> Result<()> {
    if !required_work_minutes.is_finite() || required_work_minutes <= 0.0 {
        bail!("Required work minutes per employee must be positive, not {required_work_minutes}");
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub work_start: ClockTime,
    /// At or before `work_start` means the operating day runs past midnight.
    pub work_end: ClockTime,
    pub peak_windows: Vec<PeakWindow>,
    pub default_interval_minutes: u32,
    pub morning_shift: ShiftWindow,
    pub evening_shift: ShiftWindow,
    pub required_work_minutes: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            work_start: ClockTime::midnight().plus_minutes(6 * 60),
            work_end: ClockTime::midnight().plus_minutes(60),
            peak_windows: vec![PeakWindow::new(8, 10, 30), PeakWindow::new(17, 20, 30)],
            default_interval_minutes: crate::generate::DEFAULT_INTERVAL_MINUTES,
            morning_shift: ShiftWindow::new(6, 14),
            evening_shift: ShiftWindow::new(14, 25),
            required_work_minutes: 420.0,
        }
    }
}

impl ScheduleConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs_err::read(path)?;
        let config: Self = serde_json::from_slice(&bytes)
            .map_err(|err| anyhow!("{}: {err}", path.display()))?;
        config
            .validate()
            .map_err(|err| anyhow!("{}: {err}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs_err::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_peak_windows(&self.peak_windows)?;
        if self.default_interval_minutes == 0 {
            bail!("The default interval must be positive");
        }
        self.morning_shift.validate("morning")?;
        self.evening_shift.validate("evening")?;
        validate_required_work_minutes(self.required_work_minutes)?;
        Ok(())
    }

    pub fn operating_day(&self, date: NaiveDate) -> OperatingDay {
        OperatingDay::new(date, self.work_start, self.work_end)
    }
}

/// The concrete span of one operating day, anchored on a caller-supplied date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatingDay {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl OperatingDay {
    pub fn new(date: NaiveDate, work_start: ClockTime, work_end: ClockTime) -> Self {
        let start = date.and_time(work_start.as_naive());
        let mut end = date.and_time(work_end.as_naive());
        if end <= start {
            end += Duration::days(1);
        }
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn crosses_midnight(&self) -> bool {
        self.start.date() != self.end.date()
    }
}
