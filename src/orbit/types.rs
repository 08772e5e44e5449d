use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sgp4::Elements;
use utoipa::ToSchema;

use crate::orbit::geodetic::normalize_longitude;
use crate::orbit::OrbitError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Longest orbital period accepted from configuration.
pub const MAX_PERIOD_S: f64 = 30.0 * SECONDS_PER_DAY;

/// A sampling period must be finite, positive and at most [`MAX_PERIOD_S`].
pub fn validate_period(period_s: f64) -> Result<(), OrbitError> {
    if period_s.is_finite() && period_s > 0.0 && period_s <= MAX_PERIOD_S {
        Ok(())
    } else {
        Err(OrbitError::InvalidPeriod(period_s))
    }
}

/// A point over the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeodeticPosition {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub altitude_m: f64,
}

impl GeodeticPosition {
    /// Linear blend towards `other`; longitude follows the shorter arc.
    pub fn lerp(&self, other: &GeodeticPosition, fraction: f64) -> GeodeticPosition {
        let mut d_lon = other.longitude_deg - self.longitude_deg;
        if d_lon > 180.0 {
            d_lon -= 360.0;
        } else if d_lon < -180.0 {
            d_lon += 360.0;
        }
        GeodeticPosition {
            longitude_deg: normalize_longitude(self.longitude_deg + d_lon * fraction),
            latitude_deg: self.latitude_deg + (other.latitude_deg - self.latitude_deg) * fraction,
            altitude_m: self.altitude_m + (other.altitude_m - self.altitude_m) * fraction,
        }
    }
}

/// Circular orbit described by its shape instead of a TLE.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParametricOrbit {
    pub altitude_m: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub period_s: f64,
}

impl ParametricOrbit {
    pub fn validate(&self) -> Result<(), OrbitError> {
        validate_period(self.period_s)?;
        if !(self.altitude_m.is_finite() && self.altitude_m >= 0.0) {
            return Err(OrbitError::InvalidOrbit(format!(
                "altitude {} m must be finite and not negative",
                self.altitude_m
            )));
        }
        if !(self.inclination_deg.is_finite() && self.raan_deg.is_finite()) {
            return Err(OrbitError::InvalidOrbit(
                "inclination and RAAN must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// SGP4 elements plus the span of time a sample table covers.
#[derive(Debug, Clone)]
pub struct TleOrbit {
    elements: Elements,
    period_s: f64,
}

impl TleOrbit {
    pub fn new(elements: Elements) -> Result<Self, OrbitError> {
        if !(elements.mean_motion > 0.0) {
            return Err(OrbitError::InvalidMeanMotion(elements.mean_motion));
        }
        let period_s = SECONDS_PER_DAY / elements.mean_motion;
        Ok(Self { elements, period_s })
    }

    pub fn from_lines(name: Option<String>, line1: &str, line2: &str) -> Result<Self, OrbitError> {
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes())?;
        Self::new(elements)
    }

    /// Sample over a fixed span instead of the mean-motion period.
    pub fn with_period(mut self, period_s: f64) -> Self {
        if period_s > 0.0 {
            self.period_s = period_s;
        }
        self
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn period_s(&self) -> f64 {
        self.period_s
    }
}

#[derive(Debug, Clone)]
pub enum OrbitalElementSet {
    Tle(TleOrbit),
    Parametric(ParametricOrbit),
}

impl OrbitalElementSet {
    pub fn period_s(&self) -> f64 {
        match self {
            OrbitalElementSet::Tle(orbit) => orbit.period_s(),
            OrbitalElementSet::Parametric(orbit) => orbit.period_s,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OrbitalElementSet::Tle(_) => "tle",
            OrbitalElementSet::Parametric(_) => "parametric",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Sample {
    pub offset_s: f64,
    pub position: GeodeticPosition,
}

/// Positions over one orbital period, offsets measured from `epoch`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SampleTable {
    epoch: DateTime<Utc>,
    period_s: f64,
    samples: Vec<Sample>,
}

impl SampleTable {
    pub(crate) fn new(epoch: DateTime<Utc>, period_s: f64, samples: Vec<Sample>) -> Self {
        Self {
            epoch,
            period_s,
            samples,
        }
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    pub fn period_s(&self) -> f64 {
        self.period_s
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Position at `offset_s` seconds after the epoch. Interpolates between
    /// neighbouring samples and holds the first/last sample outside the table.
    pub fn position_at(&self, offset_s: f64) -> Option<GeodeticPosition> {
        if offset_s.is_nan() {
            return None;
        }
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        if offset_s <= first.offset_s {
            return Some(first.position);
        }
        if offset_s >= last.offset_s {
            return Some(last.position);
        }

        let idx = self.samples.partition_point(|s| s.offset_s <= offset_s);
        let before = &self.samples[idx - 1];
        let after = &self.samples[idx];
        let fraction = (offset_s - before.offset_s) / (after.offset_s - before.offset_s);
        Some(before.position.lerp(&after.position, fraction))
    }

    /// Absolute time of an offset; `None` when it is not representable.
    pub fn time_of(&self, offset_s: f64) -> Option<DateTime<Utc>> {
        offset_time(self.epoch, offset_s)
    }
}

pub(crate) fn offset_time(epoch: DateTime<Utc>, offset_s: f64) -> Option<DateTime<Utc>> {
    let millis = (offset_s * 1000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    epoch.checked_add_signed(Duration::try_milliseconds(millis as i64)?)
}
