//! Birth data normalisation and Julian Day conversions.

use crate::ephemeris::GeoLocation;
use crate::error::{Result, UraniaError};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Julian Day of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian Day of J2000.0.
pub const J2000: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Civil birth moment and place. `timezone` is the UTC offset in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    #[serde(default)]
    pub second: u32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: f64,
}

impl BirthData {
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            return Err(UraniaError::birth("month", self.month, "Month must be 1-12."));
        }
        if NaiveDate::from_ymd_opt(self.year, self.month, self.day).is_none() {
            return Err(UraniaError::birth(
                "day",
                self.day,
                format!("No such day in {}-{:02}.", self.year, self.month),
            ));
        }
        if self.hour > 23 {
            return Err(UraniaError::birth("hour", self.hour, "Hour must be 0-23."));
        }
        if self.minute > 59 {
            return Err(UraniaError::birth("minute", self.minute, "Minute must be 0-59."));
        }
        if self.second > 59 {
            return Err(UraniaError::birth("second", self.second, "Second must be 0-59."));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(UraniaError::birth(
                "latitude",
                self.latitude,
                "Latitude must be within [-90, 90].",
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(UraniaError::birth(
                "longitude",
                self.longitude,
                "Longitude must be within [-180, 180].",
            ));
        }
        if !self.timezone.is_finite() || !(-12.0..=14.0).contains(&self.timezone) {
            return Err(UraniaError::birth(
                "timezone",
                self.timezone,
                "UTC offset must be within [-12, 14] hours.",
            ));
        }
        Ok(())
    }

    /// Birth moment in UTC. The local civil time is shifted by the offset,
    /// which may move the calendar date.
    pub fn to_utc(&self) -> Result<DateTime<Utc>> {
        self.validate()?;
        let local = NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|d| d.and_hms_opt(self.hour, self.minute, self.second))
            .ok_or_else(|| UraniaError::birth("day", self.day, "Invalid calendar date."))?;
        let offset = Duration::seconds((self.timezone * 3600.0).round() as i64);
        Ok(Utc.from_utc_datetime(&(local - offset)))
    }

    pub fn location(&self) -> GeoLocation {
        GeoLocation {
            lat: self.latitude,
            lon: self.longitude,
        }
    }
}

/// Julian Day (UT) of a UTC instant.
pub fn julian_day(dt: DateTime<Utc>) -> f64 {
    let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_millis()) / 1000.0;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Inverse of [`julian_day`], rounded to the nearest second.
pub fn datetime_from_julian_day(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let seconds = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY).round();
    Utc.timestamp_opt(seconds as i64, 0).single()
}

/// Julian centuries since J2000.0.
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000) / 36_525.0
}

/// Normalise an angle to [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Signed difference `a - b` wrapped to (-180, 180].
pub fn signed_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}
