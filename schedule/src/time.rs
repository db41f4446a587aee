use std::fmt;
use std::str::FromStr;

use anyhow::{Error, Result};
use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A wall-clock time of day at minute precision, written as `HH:MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        match NaiveTime::from_hms_opt(hour, minute, 0) {
            Some(t) => Ok(Self(t)),
            None => bail!("{hour:02}:{minute:02} isn't a valid time of day"),
        }
    }

    pub fn midnight() -> Self {
        Self(NaiveTime::MIN)
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive(self) -> NaiveTime {
        self.0
    }

    /// Wraps past midnight.
    pub fn plus_minutes(self, minutes: u32) -> Self {
        let (t, _) = self
            .0
            .overflowing_add_signed(Duration::minutes(i64::from(minutes)));
        Self(t)
    }

    // Callers only pass minute-aligned times
    pub(crate) fn from_naive(t: NaiveTime) -> Self {
        Self(t)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(x: &str) -> Result<Self> {
        let (hour, minute) = match x.trim().split_once(':') {
            Some(pair) => pair,
            None => bail!("Time {x:?} isn't HH:MM"),
        };
        let hour: u32 = hour
            .parse()
            .map_err(|err| anyhow!("Time {x:?} has a bad hour: {err}"))?;
        let minute: u32 = minute
            .parse()
            .map_err(|err| anyhow!("Time {x:?} has a bad minute: {err}"))?;
        Self::new(hour, minute).map_err(|err| anyhow!("Time {x:?}: {err}"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = <String>::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(x: &str) -> ClockTime {
        x.parse().unwrap()
    }

    #[test]
    fn parse_and_format() {
        assert_eq!(t("06:00").to_string(), "06:00");
        assert_eq!(t("6:05").to_string(), "06:05");
        assert_eq!(t("23:59").hour(), 23);
        assert_eq!(t("23:59").minute(), 59);
    }

    #[test]
    fn malformed_times_fail() {
        for bad in ["", "0600", "24:00", "12:60", "ab:cd", "-1:00"] {
            assert!(bad.parse::<ClockTime>().is_err(), "{bad} parsed");
        }
    }

    #[test]
    fn wraps_past_midnight() {
        assert_eq!(t("23:40").plus_minutes(45), t("00:25"));
        assert_eq!(t("08:00").plus_minutes(0), t("08:00"));
    }

    #[test]
    fn serde_uses_hhmm() {
        let json = serde_json::to_string(&t("07:30")).unwrap();
        assert_eq!(json, "\"07:30\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("07:30"));
        assert!(serde_json::from_str::<ClockTime>("\"7h30\"").is_err());
    }
}
