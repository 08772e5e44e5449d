mod deterministic;
mod error;
mod hash;
mod remote;
mod resolver;
mod source;
mod table;
mod types;

pub use deterministic::{constant_assessment, deterministic_assessment};
pub use error::RiskError;
pub use remote::RemoteRiskClient;
pub use resolver::RiskResolver;
pub use source::RiskSource;
pub use table::BaseRiskTable;
pub use types::{RiskAssessment, RiskLevel, RiskRequest};
