//! Calendar keys for bucketing activity by day and week.
//!
//! Every aggregation in codelog buckets timestamps by the *local* calendar day
//! of the person logging practice. [`day_key`] is the single place where an
//! instant becomes a day; nothing else truncates timestamps.
//!
//! Weeks use a simple sequential numbering: week 1 starts on January 1st and
//! every following week starts seven days later. This is **not** ISO-8601; a
//! year has up to 53 weeks and the last one may be only one or two days long.

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Highest week number [`WeekKey::of`] can produce (ordinal 365 / 7 + 1).
pub const MAX_WEEK: u32 = 53;

// ============================================
// DayKey
// ============================================

/// A calendar day, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a day key from year, month and day, rejecting impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| Error::InvalidDate {
                input: format!("{year}-{month}-{day}"),
                message: "no such calendar day".to_string(),
            })
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Shift by a signed number of days, saturating at the calendar bounds.
    pub fn offset(self, days: i64) -> Self {
        let shifted = self.0.checked_add_signed(Duration::days(days));
        match shifted {
            Some(date) => Self(date),
            None if days < 0 => Self(NaiveDate::MIN),
            None => Self(NaiveDate::MAX),
        }
    }

    pub fn succ(self) -> Self {
        self.offset(1)
    }

    pub fn pred(self) -> Self {
        self.offset(-1)
    }

    /// The sequential week this day belongs to.
    pub fn week(&self) -> WeekKey {
        WeekKey::of(*self)
    }

    /// Day of week, 0 = Sunday.
    pub fn weekday_from_sunday(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), DAY_KEY_FORMAT)
            .map(Self)
            .map_err(|e| Error::InvalidDate {
                input: s.to_string(),
                message: e.to_string(),
            })
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Calendar day of `ts` as seen in `zone`.
pub fn day_key<Tz: TimeZone>(ts: DateTime<Utc>, zone: &Tz) -> DayKey {
    DayKey(ts.with_timezone(zone).date_naive())
}

/// Signed number of whole days from `a` to `b` (positive when `b` is later).
pub fn days_between(a: DayKey, b: DayKey) -> i64 {
    (b.0 - a.0).num_days()
}

/// Parse a user-supplied date into an instant.
///
/// Accepts RFC 3339 timestamps or a bare `YYYY-MM-DD`, which is anchored at
/// local noon in `zone` so DST transitions around midnight cannot move it to
/// another day.
pub fn parse_timestamp<Tz: TimeZone>(input: &str, zone: &Tz) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    let day: DayKey = trimmed.parse()?;
    let noon = day.0.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
    zone.from_local_datetime(&noon)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidDate {
            input: input.to_string(),
            message: "local time does not exist in this time zone".to_string(),
        })
}

// ============================================
// WeekKey
// ============================================

/// A sequential (non-ISO) week, rendered as `<year>-<week>`, e.g. `2024-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> Result<Self> {
        let year_is_representable = NaiveDate::from_ymd_opt(year, 1, 1).is_some()
            && NaiveDate::from_ymd_opt(year, 12, 31).is_some();
        if !(1..=MAX_WEEK).contains(&week) || !year_is_representable {
            return Err(Error::InvalidWeek(format!("{year}-{week}")));
        }
        Ok(Self { year, week })
    }

    /// Week containing `day`: days since January 1st, divided by seven, plus one.
    pub fn of(day: DayKey) -> Self {
        Self {
            year: day.0.year(),
            week: day.0.ordinal0() / 7 + 1,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// First day of the week: January 1st plus `(week - 1) * 7` days.
    pub fn first_day(&self) -> DayKey {
        // Year range is checked in `new`; `of` only sees real dates.
        let jan_first = NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap_or(NaiveDate::MIN);
        DayKey(jan_first).offset(i64::from(self.week - 1) * 7)
    }

    /// Inclusive seven-day span `(first, first + 6)`.
    ///
    /// Week 53 runs past December 31st into the next year.
    pub fn span(&self) -> (DayKey, DayKey) {
        let first = self.first_day();
        (first, first.offset(6))
    }

    pub fn contains(&self, day: DayKey) -> bool {
        let (first, last) = self.span();
        first <= day && day <= last
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = Error;

    /// Accepts both `2024-1` and the zero-padded `2024-01`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidWeek(s.to_string());
        let (year, week) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        Self::new(year, week).map_err(|_| invalid())
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================
// Clock
// ============================================

/// Reference point for "today" plus the zone used to bucket timestamps.
///
/// Passed explicitly into every calculation that depends on the current
/// date so results are reproducible.
#[derive(Debug, Clone)]
pub struct Clock<Tz: TimeZone = Local> {
    zone: Tz,
    today: DayKey,
}

impl Clock<Local> {
    /// The host's local zone and current date.
    pub fn system() -> Self {
        Self {
            zone: Local,
            today: DayKey(Local::now().date_naive()),
        }
    }
}

impl<Tz: TimeZone> Clock<Tz> {
    pub fn fixed(zone: Tz, today: DayKey) -> Self {
        Self { zone, today }
    }

    pub fn zone(&self) -> &Tz {
        &self.zone
    }

    pub fn today(&self) -> DayKey {
        self.today
    }

    pub fn yesterday(&self) -> DayKey {
        self.today.pred()
    }

    pub fn current_week(&self) -> WeekKey {
        self.today.week()
    }

    /// Day key of `ts` in this clock's zone.
    pub fn day_of(&self, ts: DateTime<Utc>) -> DayKey {
        day_key(ts, &self.zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_day_key_uses_zone_not_utc() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();

        assert_eq!(day_key(ts, &Utc).to_string(), "2024-01-01");
        assert_eq!(day_key(ts, &plus_two).to_string(), "2024-01-02");
        assert_eq!(day_key(ts, &minus_five).to_string(), "2024-01-01");
    }

    #[test]
    fn test_same_local_day_different_utc_days() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let morning = Utc.with_ymd_and_hms(2024, 3, 9, 16, 0, 0).unwrap(); // 01:00 local on the 10th
        let evening = Utc.with_ymd_and_hms(2024, 3, 10, 13, 0, 0).unwrap(); // 22:00 local on the 10th
        assert_eq!(day_key(morning, &tz), day_key(evening, &tz));
    }

    #[test]
    fn test_days_between_is_signed() {
        assert_eq!(days_between(day("2024-02-28"), day("2024-03-01")), 2);
        assert_eq!(days_between(day("2024-03-01"), day("2024-02-28")), -2);
        assert_eq!(days_between(day("2024-03-01"), day("2024-03-01")), 0);
    }

    #[test]
    fn test_day_key_parse_rejects_garbage() {
        assert!("2024-13-01".parse::<DayKey>().is_err());
        assert!("yesterday".parse::<DayKey>().is_err());
        assert!(DayKey::from_ymd(2023, 2, 29).is_err());
    }

    #[test]
    fn test_week_key_sequential_numbering() {
        assert_eq!(WeekKey::of(day("2024-01-01")).to_string(), "2024-1");
        assert_eq!(WeekKey::of(day("2024-01-07")).to_string(), "2024-1");
        assert_eq!(WeekKey::of(day("2024-01-08")).to_string(), "2024-2");
        // Leap year: Dec 31 is ordinal 366
        assert_eq!(WeekKey::of(day("2024-12-31")).to_string(), "2024-53");
        assert_eq!(WeekKey::of(day("2023-12-31")).to_string(), "2023-53");
    }

    #[test]
    fn test_week_key_parse_accepts_padding() {
        let padded: WeekKey = "2024-01".parse().unwrap();
        let plain: WeekKey = "2024-1".parse().unwrap();
        assert_eq!(padded, plain);
        assert_eq!(padded.to_string(), "2024-1");

        assert!("2024-0".parse::<WeekKey>().is_err());
        assert!("2024-54".parse::<WeekKey>().is_err());
        assert!("2024".parse::<WeekKey>().is_err());
    }

    #[test]
    fn test_week_span() {
        let week: WeekKey = "2024-2".parse().unwrap();
        assert_eq!(week.span(), (day("2024-01-08"), day("2024-01-14")));
        assert!(week.contains(day("2024-01-14")));
        assert!(!week.contains(day("2024-01-15")));

        let last: WeekKey = "2023-53".parse().unwrap();
        assert_eq!(last.span(), (day("2023-12-31"), day("2024-01-06")));
    }

    #[test]
    fn test_week_ordering_is_numeric() {
        let w2: WeekKey = "2024-2".parse().unwrap();
        let w10: WeekKey = "2024-10".parse().unwrap();
        let next_year: WeekKey = "2025-1".parse().unwrap();
        assert!(w2 < w10);
        assert!(w10 < next_year);
    }

    #[test]
    fn test_parse_timestamp_date_only_lands_on_that_day() {
        let tz = FixedOffset::west_opt(8 * 3600).unwrap();
        let ts = parse_timestamp("2024-05-04", &tz).unwrap();
        assert_eq!(day_key(ts, &tz).to_string(), "2024-05-04");

        let ts = parse_timestamp("2024-05-04T23:30:00-08:00", &tz).unwrap();
        assert_eq!(day_key(ts, &tz).to_string(), "2024-05-04");
        assert_eq!(day_key(ts, &Utc).to_string(), "2024-05-05");

        assert!(parse_timestamp("not a date", &tz).is_err());
    }

    #[test]
    fn test_clock_fixed() {
        let clock = Clock::fixed(Utc, day("2024-01-08"));
        assert_eq!(clock.yesterday(), day("2024-01-07"));
        assert_eq!(clock.current_week().to_string(), "2024-2");
    }

    #[test]
    fn test_day_key_serde_roundtrip_format() {
        let json = serde_json::to_string(&day("2024-01-02")).unwrap();
        assert_eq!(json, "\"2024-01-02\"");
        let week: WeekKey = serde_json::from_str("\"2024-03\"").unwrap();
        assert_eq!(serde_json::to_string(&week).unwrap(), "\"2024-3\"");
    }
}
