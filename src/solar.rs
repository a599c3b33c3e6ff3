//! Low-precision solar ephemeris.
//!
//! Computes the subsolar point for a UTC instant: the Sun's declination and
//! an hour-angle rotation derived from the clock time and the equation of
//! time. The terminator builder interprets the pair as the latitude parameter
//! and longitude rotation of the day/night boundary circle.
//!
//! Formulas follow the standard truncated ephemeris (mean longitude and
//! anomaly, ecliptic longitude, obliquity, right ascension), good to a small
//! fraction of a degree over several decades around the epoch.

use std::f64::consts::TAU;

use chrono::{DateTime, Timelike, Utc};

/// Milliseconds from the Unix epoch to 2000-01-01T12:00:00Z, the ephemeris
/// reference instant.
const EPOCH_2000_MS: i64 = 946_728_000_000;

/// Subsolar position in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Negated solar declination; the latitude parameter of the terminator.
    pub declination: f64,
    /// Clock-time rotation (including the equation of time) mapped to a full
    /// turn per day, negated; the longitude rotation of the terminator.
    pub hour_angle: f64,
}

/// Solar position for the given UTC instant.
pub fn sun_position(utc: DateTime<Utc>) -> SunPosition {
    let days = (utc.timestamp_millis() - EPOCH_2000_MS) as f64 / 86_400_000.0;

    // mean longitude and mean anomaly of the Sun
    let mean_lon = (280.461 + 0.9856474 * days).to_radians().rem_euclid(TAU);
    let mean_anom = (357.528 + 0.9856003 * days).to_radians();

    // ecliptic longitude and obliquity of the ecliptic
    let ecliptic_lon =
        mean_lon + (1.915 * mean_anom.sin() + 0.02 * (2.0 * mean_anom).sin()).to_radians();
    let obliquity = (23.439 - 0.0000004 * days).to_radians();

    // right ascension and declination
    let right_asc = (obliquity.cos() * ecliptic_lon.sin())
        .atan2(ecliptic_lon.cos())
        .rem_euclid(TAU);
    let declination = (obliquity.sin() * ecliptic_lon.sin()).asin();

    // equation of time, in minutes
    let equation = (mean_lon - right_asc).to_degrees() * 4.0;

    let clock = (utc.hour() as f64 + (utc.minute() as f64 + equation) / 60.0) / 24.0;
    SunPosition {
        declination: -declination,
        hour_angle: -clock * TAU,
    }
}
