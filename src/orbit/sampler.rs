use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::orbit::geodetic::{eci_to_geodetic, EARTH_MEAN_RADIUS_M};
use crate::orbit::types::offset_time;
use crate::orbit::{
    GeodeticPosition, OrbitError, OrbitalElementSet, ParametricOrbit, Sample, SampleTable,
    TleOrbit,
};

/// Build the sample table for one orbital period starting at `epoch`.
///
/// `sample_count + 1` evenly spaced offsets are visited, so both ends of the
/// period are present. TLE samples that fail to propagate are left out.
pub fn sample(
    elements: &OrbitalElementSet,
    epoch: DateTime<Utc>,
    sample_count: usize,
) -> SampleTable {
    let period_s = elements.period_s();
    let samples = match elements {
        OrbitalElementSet::Tle(orbit) => sample_tle(orbit, epoch, sample_count),
        OrbitalElementSet::Parametric(orbit) => sample_parametric(orbit, sample_count),
    };
    SampleTable::new(epoch, period_s, samples)
}

fn fractions(sample_count: usize) -> impl Iterator<Item = f64> {
    (0..=sample_count).map(move |i| {
        if sample_count == 0 {
            0.0
        } else {
            i as f64 / sample_count as f64
        }
    })
}

fn sample_tle(orbit: &TleOrbit, epoch: DateTime<Utc>, sample_count: usize) -> Vec<Sample> {
    let constants = match Constants::from_elements(orbit.elements()) {
        Ok(c) => c,
        Err(e) => {
            log::warn!(
                "Cannot initialise SGP4 for NORAD {}: {}",
                orbit.elements().norad_id,
                e
            );
            return Vec::new();
        }
    };

    let mut samples = Vec::with_capacity(sample_count + 1);
    for fraction in fractions(sample_count) {
        let offset_s = fraction * orbit.period_s();
        let Some(timestamp) = offset_time(epoch, offset_s) else {
            log::debug!(
                "Skipping sample at +{:.1}s for NORAD {}: time out of range",
                offset_s,
                orbit.elements().norad_id
            );
            continue;
        };
        match propagate_position(orbit.elements(), &constants, timestamp) {
            Ok(position) => samples.push(Sample { offset_s, position }),
            Err(e) => {
                log::debug!(
                    "Skipping sample at +{:.1}s for NORAD {}: {}",
                    offset_s,
                    orbit.elements().norad_id,
                    e
                );
            }
        }
    }
    samples
}

pub fn propagate_position(
    elements: &Elements,
    constants: &Constants,
    timestamp: DateTime<Utc>,
) -> Result<GeodeticPosition, OrbitError> {
    let minutes = elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| OrbitError::Propagation(e.to_string()))?;

    let prediction = constants
        .propagate(minutes)
        .map_err(|e| OrbitError::Propagation(e.to_string()))?;

    if prediction.position.iter().any(|c| !c.is_finite()) {
        return Err(OrbitError::Propagation("non-finite position".into()));
    }

    Ok(eci_to_geodetic(prediction.position, &timestamp))
}

fn sample_parametric(orbit: &ParametricOrbit, sample_count: usize) -> Vec<Sample> {
    fractions(sample_count)
        .map(|fraction| Sample {
            offset_s: fraction * orbit.period_s,
            position: parametric_position(orbit, fraction * std::f64::consts::TAU),
        })
        .collect()
}

/// Inertial position (m) of a circular orbit at `angle` radians past the node:
/// orbit-plane coordinates rotated by inclination, then by RAAN.
pub fn parametric_eci(orbit: &ParametricOrbit, angle: f64) -> [f64; 3] {
    let r = EARTH_MEAN_RADIUS_M + orbit.altitude_m;
    let (sin_i, cos_i) = orbit.inclination_deg.to_radians().sin_cos();
    let (sin_o, cos_o) = orbit.raan_deg.to_radians().sin_cos();

    let x_orb = r * angle.cos();
    let y_orb = r * angle.sin();

    let x_inc = x_orb;
    let y_inc = y_orb * cos_i;
    let z_inc = y_orb * sin_i;

    [
        x_inc * cos_o - y_inc * sin_o,
        x_inc * sin_o + y_inc * cos_o,
        z_inc,
    ]
}

pub fn parametric_position(orbit: &ParametricOrbit, angle: f64) -> GeodeticPosition {
    let [x, y, z] = parametric_eci(orbit, angle);
    let r = EARTH_MEAN_RADIUS_M + orbit.altitude_m;
    GeodeticPosition {
        longitude_deg: y.atan2(x).to_degrees(),
        latitude_deg: (z / r).clamp(-1.0, 1.0).asin().to_degrees(),
        altitude_m: orbit.altitude_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ISS_1: &str = "1 25544U 98067A   23060.51821759  .00007947  00000-0  15044-3 0  9993";
    const ISS_2: &str = "2 25544  51.6435  21.3292 0005650  85.9957  34.0894 15.49916231414912";

    fn debris() -> ParametricOrbit {
        ParametricOrbit {
            altitude_m: 900_000.0,
            inclination_deg: 35.0,
            raan_deg: 120.0,
            period_s: 300.0,
        }
    }

    fn iss_epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn parametric_table_spans_period_with_n_plus_one_samples() {
        let table = sample(&OrbitalElementSet::Parametric(debris()), Utc::now(), 100);
        assert_eq!(table.len(), 101);
        assert_eq!(table.samples()[0].offset_s, 0.0);
        assert!((table.samples()[100].offset_s - 300.0).abs() < 1e-9);
        assert!(table
            .samples()
            .windows(2)
            .all(|w| w[0].offset_s < w[1].offset_s));
        assert!(table
            .samples()
            .iter()
            .all(|s| s.position.altitude_m == 900_000.0));
    }

    #[test]
    fn parametric_latitude_round_trips_through_asin() {
        let orbit = debris();
        let r = EARTH_MEAN_RADIUS_M + orbit.altitude_m;
        for step in 0..36 {
            let angle = step as f64 * 10f64.to_radians();
            let [_, _, z] = parametric_eci(&orbit, angle);
            let position = parametric_position(&orbit, angle);
            let expected = (angle.sin() * orbit.inclination_deg.to_radians().sin())
                .asin()
                .to_degrees();
            assert!((position.latitude_deg - (z / r).asin().to_degrees()).abs() < 1e-9);
            assert!((position.latitude_deg - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn equatorial_orbit_stays_on_equator() {
        let orbit = ParametricOrbit {
            inclination_deg: 0.0,
            ..debris()
        };
        let table = sample(&OrbitalElementSet::Parametric(orbit), Utc::now(), 12);
        assert!(table
            .samples()
            .iter()
            .all(|s| s.position.latitude_deg.abs() < 1e-9));
        let lon = table.samples()[3].position.longitude_deg;
        assert!((lon - (120.0 + 90.0 - 360.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_sample_count_yields_single_sample() {
        let table = sample(&OrbitalElementSet::Parametric(debris()), Utc::now(), 0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.samples()[0].offset_s, 0.0);
    }

    #[test]
    fn iss_table_stays_within_inclination_and_leo() {
        let orbit = TleOrbit::from_lines(None, ISS_1, ISS_2).unwrap().with_period(5400.0);
        let table = sample(&OrbitalElementSet::Tle(orbit), iss_epoch(), 180);
        assert_eq!(table.len(), 181);
        assert!((table.period_s() - 5400.0).abs() < 1e-9);
        for s in table.samples() {
            assert!(s.position.latitude_deg.abs() <= 52.5);
            assert!((-180.0..=180.0).contains(&s.position.longitude_deg));
            assert!(s.position.altitude_m > 350_000.0 && s.position.altitude_m < 480_000.0);
        }
    }

    #[test]
    fn unrepresentable_sample_times_are_skipped() {
        let orbit = TleOrbit::from_lines(None, ISS_1, ISS_2)
            .unwrap()
            .with_period(1.0e13);
        let table = sample(&OrbitalElementSet::Tle(orbit), iss_epoch(), 4);
        // the end of the span lies past the last representable date
        assert!(table.len() < 5);
        assert!(table.samples().iter().all(|s| s.offset_s < 1.0e13));
    }

    #[test]
    fn tle_period_defaults_to_mean_motion() {
        let orbit = TleOrbit::from_lines(None, ISS_1, ISS_2).unwrap();
        assert!((orbit.period_s() - 86_400.0 / 15.49916231).abs() < 1e-3);
    }
}
