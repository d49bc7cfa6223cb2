//! Wire format shared by the slot planner and the booking committer.
//!
//! Availability is a literal string-set lookup, so both sides must render
//! keys byte-for-byte identically:
//!
//! * date key: `day_month_year`, unpadded (`5_6_2025`)
//! * time label: 12-hour `hh:mm AM|PM`, zero-padded hour (`09:30 AM`)

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

static DATE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-9][0-9]?)_([1-9][0-9]?)_([1-9][0-9]{3})$").expect("valid date key pattern"));

static TIME_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2]):([0-5][0-9]) (AM|PM)$").expect("valid time label pattern"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotFormatError {
    #[error("Invalid slot date '{0}', expected day_month_year")]
    InvalidDateKey(String),

    #[error("Invalid slot time '{0}', expected hh:mm AM/PM")]
    InvalidTimeLabel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.0.day(), self.0.month(), self.0.year())
    }
}

impl FromStr for DateKey {
    type Err = SlotFormatError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || SlotFormatError::InvalidDateKey(raw.to_string());
        let caps = DATE_KEY.captures(raw).ok_or_else(invalid)?;

        let day: u32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        let year: i32 = caps[3].parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(DateKey)
            .ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeLabel(NaiveTime);

impl TimeLabel {
    /// Labels carry minute precision; seconds are dropped.
    pub fn new(time: NaiveTime) -> Self {
        Self(time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time))
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for TimeLabel {
    fn from(time: NaiveTime) -> Self {
        Self::new(time)
    }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (is_pm, hour) = self.0.hour12();
        write!(f, "{:02}:{:02} {}", hour, self.0.minute(), if is_pm { "PM" } else { "AM" })
    }
}

impl FromStr for TimeLabel {
    type Err = SlotFormatError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || SlotFormatError::InvalidTimeLabel(raw.to_string());
        let caps = TIME_LABEL.captures(raw).ok_or_else(invalid)?;

        let hour12: u32 = caps[1].parse().map_err(|_| invalid())?;
        let minute: u32 = caps[2].parse().map_err(|_| invalid())?;
        let hour = match (&caps[3], hour12) {
            ("AM", 12) => 0,
            ("AM", h) => h,
            (_, 12) => 12,
            (_, h) => h + 12,
        };

        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(TimeLabel)
            .ok_or_else(invalid)
    }
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(DateKey);
string_serde!(TimeLabel);

/// A doctor's reservations, date key to the set of taken time labels.
///
/// Stored as raw strings: membership is the literal comparison the booking
/// record was written with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookedSlots(BTreeMap<String, BTreeSet<String>>);

impl BookedSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: &DateKey, time: &TimeLabel) -> bool {
        self.0
            .get(&date.to_string())
            .is_some_and(|times| times.contains(&time.to_string()))
    }

    /// Returns `false` when the slot was already present.
    pub fn insert(&mut self, date: &DateKey, time: &TimeLabel) -> bool {
        self.insert_raw(date.to_string(), time.to_string())
    }

    pub(crate) fn insert_raw(&mut self, date: String, time: String) -> bool {
        self.0.entry(date).or_default().insert(time)
    }

    pub fn on(&self, date: &DateKey) -> impl Iterator<Item = &str> {
        self.0
            .get(&date.to_string())
            .into_iter()
            .flat_map(|times| times.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
