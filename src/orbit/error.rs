use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrbitError {
    #[error("TLE directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("invalid tle format")]
    InvalidTleFormat,
    #[error("Invalid TLE format in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("invalid tle: {0}")]
    Tle(#[from] sgp4::TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("invalid mean motion: {0} rev/day")]
    InvalidMeanMotion(f64),
    #[error("invalid period: {0} s")]
    InvalidPeriod(f64),
    #[error("invalid orbit: {0}")]
    InvalidOrbit(String),
    #[error("Propagation error: {0}")]
    Propagation(String),
}
