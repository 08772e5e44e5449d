use std::ops::Range;

use rand::Rng;

use crate::orbit::ParametricOrbit;

pub const DEBRIS_ALTITUDE_M: Range<f64> = 700_000.0..1_100_000.0;
pub const DEBRIS_INCLINATION_DEG: Range<f64> = 0.0..90.0;
pub const DEBRIS_RAAN_DEG: Range<f64> = 0.0..360.0;
pub const DEBRIS_PERIOD_S: Range<f64> = 200.0..400.0;

/// Draw one debris orbit, each parameter independently uniform.
pub fn random_debris_orbit<R: Rng + ?Sized>(rng: &mut R) -> ParametricOrbit {
    ParametricOrbit {
        altitude_m: rng.gen_range(DEBRIS_ALTITUDE_M),
        inclination_deg: rng.gen_range(DEBRIS_INCLINATION_DEG),
        raan_deg: rng.gen_range(DEBRIS_RAAN_DEG),
        period_s: rng.gen_range(DEBRIS_PERIOD_S),
    }
}

/// `count` debris orbits from the thread-local generator.
pub fn generate_debris(count: usize) -> Vec<ParametricOrbit> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| random_debris_orbit(&mut rng)).collect()
}
