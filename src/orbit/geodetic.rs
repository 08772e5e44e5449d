use chrono::{DateTime, Utc};

use crate::orbit::GeodeticPosition;

// WGS-84
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;
pub const EARTH_ECCENTRICITY_SQ: f64 = 0.00669437999014;
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Wrap to [-180, 180).
pub fn normalize_longitude(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Greenwich sidereal angle (radians) at `time`.
pub fn sidereal_angle(time: &DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()))
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// ECEF (km) to geodetic, Bowring iteration on the WGS-84 ellipsoid.
pub fn ecef_to_geodetic(ecef_km: [f64; 3]) -> GeodeticPosition {
    let [x, y, z] = ecef_km;
    let a = EARTH_EQUATORIAL_RADIUS_KM;
    let e2 = EARTH_ECCENTRICITY_SQ;

    let p = (x * x + y * y).sqrt();
    let longitude = y.atan2(x).to_degrees();

    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..5 {
        let sin_lat = lat.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        lat = (z + e2 * n * sin_lat).atan2(p);
    }

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let altitude_km = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        z.abs() / sin_lat.abs() - n * (1.0 - e2)
    };

    GeodeticPosition {
        longitude_deg: normalize_longitude(longitude),
        latitude_deg: lat.to_degrees(),
        altitude_m: (altitude_km * 1000.0).max(0.0),
    }
}

/// TEME position (km) at `time` to geodetic.
pub fn eci_to_geodetic(pos_teme_km: [f64; 3], time: &DateTime<Utc>) -> GeodeticPosition {
    ecef_to_geodetic(teme_to_ecef_position(pos_teme_km, sidereal_angle(time)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn longitude_wraps_into_range() {
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(45.0), 45.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
    }

    #[test]
    fn equatorial_point_has_zero_latitude() {
        let geo = ecef_to_geodetic([EARTH_EQUATORIAL_RADIUS_KM + 400.0, 0.0, 0.0]);
        assert!(geo.latitude_deg.abs() < 1e-9);
        assert!(geo.longitude_deg.abs() < 1e-9);
        assert!((geo.altitude_m - 400_000.0).abs() < 1e-3);
    }

    #[test]
    fn polar_point_uses_polar_radius() {
        let polar_radius = EARTH_EQUATORIAL_RADIUS_KM * (1.0 - EARTH_ECCENTRICITY_SQ).sqrt();
        let geo = ecef_to_geodetic([0.0, 0.0, polar_radius + 800.0]);
        assert!((geo.latitude_deg - 90.0).abs() < 1e-6);
        assert!((geo.altitude_m - 800_000.0).abs() < 1.0);
    }

    #[test]
    fn teme_rotation_follows_sidereal_angle() {
        let ecef = teme_to_ecef_position([7000.0, 0.0, 10.0], FRAC_PI_2);
        assert!(ecef[0].abs() < 1e-9);
        assert!((ecef[1] + 7000.0).abs() < 1e-9);
        assert_eq!(ecef[2], 10.0);
    }

    #[test]
    fn below_surface_altitude_clamps_to_zero() {
        let geo = ecef_to_geodetic([EARTH_EQUATORIAL_RADIUS_KM - 10.0, 0.0, 0.0]);
        assert_eq!(geo.altitude_m, 0.0);
    }
}
