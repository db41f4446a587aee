//! Synthesizes one operating day of departures per route.
//!
//! A simulation clock walks from the start of the operating day to its end. Each route remembers
//! when it's next eligible to depart; whenever the clock reaches that point, the route departs
//! at the clock time and becomes eligible again one adjusted frequency later.
//!
//! The clock normally steps by a fixed interval. Inside a peak window it steps by half of that
//! window's frequency, and routes scheduled there use a shorter frequency.

use anyhow::Result;
use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use catalog::{check_unique_routes, normalize_priority, Route, RouteID};

use crate::config::{matching_peak, validate_peak_windows, OperatingDay, PeakWindow};
use crate::ClockTime;

pub const DEFAULT_INTERVAL_MINUTES: u32 = 10;
/// No route is ever scheduled more often than this.
pub const MIN_FREQUENCY_MINUTES: u32 = 10;
/// Multiplies the base frequency during peak windows.
pub const PEAK_FACTOR: f64 = 0.7;

const MIN_PRIORITY: f64 = 1.0;
const MAX_PRIORITY: f64 = 10.0;
const LOWEST_PRIORITY_FREQUENCY: f64 = 40.0;
const HIGHEST_PRIORITY_FREQUENCY: f64 = 10.0;

/// One route's departures for the day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub route_id: RouteID,
    /// In operating-day order, so times after midnight come last.
    pub departures: Vec<ClockTime>,
    /// The route's base frequency, before peak adjustment.
    pub frequency_minutes: u32,
}

/// Minutes between departures outside of peak windows. Priority 1 runs every 40 minutes,
/// priority 10 every 10, linearly in between. Zero or non-finite priorities use the default.
pub fn base_frequency(priority: f64) -> u32 {
    let clamped = normalize_priority(Some(priority)).clamp(MIN_PRIORITY, MAX_PRIORITY);
    let fraction = (clamped - MIN_PRIORITY) / (MAX_PRIORITY - MIN_PRIORITY);
    (LOWEST_PRIORITY_FREQUENCY - fraction * (LOWEST_PRIORITY_FREQUENCY - HIGHEST_PRIORITY_FREQUENCY))
        .round() as u32
}

/// The frequency actually used to schedule the next departure.
pub fn adjusted_frequency(base_frequency: u32, in_peak: bool) -> u32 {
    let factor = if in_peak { PEAK_FACTOR } else { 1.0 };
    ((f64::from(base_frequency) * factor).floor() as u32).max(MIN_FREQUENCY_MINUTES)
}

/// Produces one entry per route, in catalog order. The result depends only on the arguments.
pub fn generate(
    routes: &[Route],
    day: &OperatingDay,
    peak_windows: &[PeakWindow],
    default_interval_minutes: u32,
) -> Result<Vec<ScheduleEntry>> {
    check_unique_routes(routes)?;
    validate_peak_windows(peak_windows)?;
    if default_interval_minutes == 0 {
        bail!("The default interval must be positive");
    }

    let mut entries: Vec<ScheduleEntry> = routes
        .iter()
        .map(|route| ScheduleEntry {
            route_id: route.route_id.clone(),
            departures: Vec::new(),
            frequency_minutes: base_frequency(route.priority),
        })
        .collect();
    let mut next_departure: Vec<NaiveDateTime> = vec![day.start(); routes.len()];

    let mut clock = day.start();
    let mut ticks = 0;
    while clock < day.end() {
        let peak = matching_peak(peak_windows, clock.hour());
        let interval = match peak {
            Some(w) => w.sampling_interval(),
            None => default_interval_minutes,
        };

        for (entry, next) in entries.iter_mut().zip(next_departure.iter_mut()) {
            if *next <= clock {
                entry.departures.push(ClockTime::from_naive(clock.time()));
                let gap = adjusted_frequency(entry.frequency_minutes, peak.is_some());
                *next = clock + Duration::minutes(i64::from(gap));
            }
        }

        clock += Duration::minutes(i64::from(interval));
        ticks += 1;
    }

    debug!(
        "Simulated {ticks} ticks from {} to {}, producing {} departures for {} routes",
        day.start(),
        day.end(),
        entries.iter().map(|e| e.departures.len()).sum::<usize>(),
        entries.len()
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use catalog::DEFAULT_PRIORITY;

    use super::*;
    use crate::config::ScheduleConfig;

    fn t(x: &str) -> ClockTime {
        x.parse().unwrap()
    }

    fn day(start: &str, end: &str) -> OperatingDay {
        OperatingDay::new(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), t(start), t(end))
    }

    fn times(entry: &ScheduleEntry) -> Vec<String> {
        entry.departures.iter().map(|x| x.to_string()).collect()
    }

    // Minutes since the start of the operating day, treating times before the start as after
    // midnight
    fn operating_minutes(start: ClockTime, x: ClockTime) -> u32 {
        let mut minutes = x.hour() * 60 + x.minute();
        if x < start {
            minutes += 24 * 60;
        }
        minutes
    }

    #[test]
    fn frequency_from_priority() {
        assert_eq!(base_frequency(1.0), 40);
        assert_eq!(base_frequency(10.0), 10);
        assert_eq!(base_frequency(5.0), 27);
        assert_eq!(base_frequency(-3.0), 40);
        assert_eq!(base_frequency(0.0), 27);
        assert_eq!(base_frequency(99.0), 10);
        assert_eq!(base_frequency(f64::NAN), base_frequency(DEFAULT_PRIORITY));

        let mut last = base_frequency(1.0);
        for step in 1..=90 {
            let freq = base_frequency(1.0 + f64::from(step) * 0.1);
            assert!(freq <= last);
            last = freq;
        }
    }

    #[test]
    fn adjusted_frequency_has_a_floor() {
        assert_eq!(adjusted_frequency(40, false), 40);
        assert_eq!(adjusted_frequency(40, true), 28);
        assert_eq!(adjusted_frequency(27, true), 18);
        assert_eq!(adjusted_frequency(10, true), 10);
        assert_eq!(adjusted_frequency(0, false), 10);
    }

    #[test]
    fn peak_morning_every_ten_minutes() {
        let routes = vec![Route::new("r1", 30, 10.0)];
        let entries = generate(
            &routes,
            &day("06:00", "08:00"),
            &[PeakWindow::new(6, 8, 20)],
            DEFAULT_INTERVAL_MINUTES,
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].frequency_minutes, 10);
        assert_eq!(
            times(&entries[0]),
            vec![
                "06:00", "06:10", "06:20", "06:30", "06:40", "06:50", "07:00", "07:10", "07:20",
                "07:30", "07:40", "07:50"
            ]
        );
    }

    #[test]
    fn off_peak_uses_base_frequency() {
        let routes = vec![Route::new("slow", 20, 1.0)];
        let entries = generate(&routes, &day("06:00", "09:00"), &[], 10).unwrap();
        assert_eq!(
            times(&entries[0]),
            vec!["06:00", "06:40", "07:20", "08:00", "08:40"]
        );
    }

    #[test]
    fn peak_window_densifies_service() {
        // Base 40 outside the window, 28 inside it; the clock samples every 15 minutes in the
        // window
        let routes = vec![Route::new("r", 20, 1.0)];
        let entries = generate(
            &routes,
            &day("07:00", "10:00"),
            &[PeakWindow::new(8, 9, 30)],
            10,
        )
        .unwrap();
        // 07:00 off-peak -> next 07:40. 07:40 off-peak -> next 08:20.
        // 08:00, 08:15 wait; 08:30 in peak -> next 08:58. 08:45 waits; 09:00 -> next 09:40.
        assert_eq!(
            times(&entries[0]),
            vec!["07:00", "07:40", "08:30", "09:00", "09:40"]
        );
    }

    #[test]
    fn every_route_starts_at_work_start() {
        let routes = vec![
            Route::new("a", 30, 1.0),
            Route::new("b", 30, 4.5),
            Route::new("c", 30, 10.0),
        ];
        let config = ScheduleConfig::default();
        let entries = generate(
            &routes,
            &day("06:00", "01:00"),
            &config.peak_windows,
            config.default_interval_minutes,
        )
        .unwrap();
        assert_eq!(entries.len(), 3);
        for entry in &entries {
            assert_eq!(entry.departures[0], t("06:00"));
        }
    }

    #[test]
    fn departures_are_spaced_and_increasing() {
        let routes: Vec<Route> = (1..=10)
            .map(|p| Route::new(format!("r{p}"), 25, f64::from(p)))
            .collect();
        let peaks = vec![
            PeakWindow::new(7, 9, 15),
            PeakWindow::new(8, 10, 30),
            PeakWindow::new(17, 20, 25),
        ];
        let start = t("05:30");
        let entries = generate(&routes, &day("05:30", "01:15"), &peaks, 10).unwrap();
        for entry in entries {
            let minutes: Vec<u32> = entry
                .departures
                .iter()
                .map(|x| operating_minutes(start, *x))
                .collect();
            for pair in minutes.windows(2) {
                assert!(pair[1] >= pair[0] + MIN_FREQUENCY_MINUTES, "{:?}", entry);
            }
        }
    }

    #[test]
    fn overnight_day_wraps() {
        let routes = vec![Route::new("night", 30, 10.0)];
        let entries = generate(&routes, &day("23:00", "01:00"), &[], 10).unwrap();
        let departures = times(&entries[0]);
        assert_eq!(departures.len(), 12);
        assert_eq!(departures[0], "23:00");
        assert_eq!(departures[5], "23:50");
        assert_eq!(departures[6], "00:00");
        assert_eq!(departures[11], "00:50");
    }

    #[test]
    fn equal_bounds_cover_a_full_day() {
        let routes = vec![Route::new("r", 30, 1.0)];
        let entries = generate(&routes, &day("06:00", "06:00"), &[], 10).unwrap();
        assert_eq!(entries[0].departures.len(), 36);
        assert_eq!(entries[0].departures.last().copied(), Some(t("05:20")));
    }

    #[test]
    fn zero_priority_gets_the_default_frequency() {
        // Built field by field, skipping Route::new
        let mut route = Route::new("r", 30, 5.0);
        route.priority = 0.0;
        let entries = generate(&[route], &day("06:00", "07:00"), &[], 10).unwrap();
        assert_eq!(entries[0].frequency_minutes, 27);
    }

    #[test]
    fn repeated_route_ids_fail() {
        let routes = vec![Route::new("a", 30, 10.0), Route::new("a", 60, 10.0)];
        let err = generate(&routes, &day("06:00", "01:00"), &[], 10).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn empty_catalog() {
        let entries = generate(&[], &day("06:00", "01:00"), &[], 10).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn deterministic() {
        let routes = vec![Route::new("a", 30, 3.0), Route::new("b", 45, 8.0)];
        let config = ScheduleConfig::default();
        let run = || {
            generate(
                &routes,
                &day("06:00", "01:00"),
                &config.peak_windows,
                config.default_interval_minutes,
            )
            .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn invalid_settings_fail_before_scheduling() {
        let routes = vec![Route::new("a", 30, 3.0)];
        assert!(generate(&routes, &day("06:00", "08:00"), &[], 0).is_err());
        assert!(generate(
            &routes,
            &day("06:00", "08:00"),
            &[PeakWindow::new(6, 8, 1)],
            10
        )
        .is_err());
    }
}
