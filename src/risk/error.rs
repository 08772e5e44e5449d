use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("risk request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("risk service answered with status {0}")]
    Status(u16),
    #[error("malformed object id: {0:?}")]
    MalformedId(String),
    #[error("base risk for {0} is not a finite number")]
    InvalidBaseRisk(String),
}
