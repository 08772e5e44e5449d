mod debris;
mod error;
pub mod geodetic;
mod parsing;
mod sampler;
mod tle_loader;
mod types;

pub use debris::generate_debris;
pub use error::OrbitError;
pub use parsing::parse_tle_lines;
pub use sampler::sample;
pub use tle_loader::{TleEntry, TleLoader};
pub use types::{
    validate_period, GeodeticPosition, OrbitalElementSet, ParametricOrbit, Sample, SampleTable,
    TleOrbit,
};
