use crate::risk::deterministic::{constant_assessment, deterministic_assessment};
use crate::risk::{BaseRiskTable, RemoteRiskClient, RiskAssessment, RiskError};

/// One way of producing a risk estimate.
#[derive(Debug, Clone)]
pub enum RiskSource {
    Remote(RemoteRiskClient),
    Deterministic(BaseRiskTable),
    Constant,
}

impl RiskSource {
    pub fn name(&self) -> &'static str {
        match self {
            RiskSource::Remote(_) => "remote",
            RiskSource::Deterministic(_) => "deterministic",
            RiskSource::Constant => "constant",
        }
    }

    pub async fn assess(&self, id: &str) -> Result<RiskAssessment, RiskError> {
        match self {
            RiskSource::Remote(client) => client.fetch(id).await,
            RiskSource::Deterministic(table) => deterministic_assessment(table, id),
            RiskSource::Constant => Ok(constant_assessment(id)),
        }
    }
}
