use crate::risk::deterministic::constant_assessment;
use crate::risk::{BaseRiskTable, RemoteRiskClient, RiskAssessment, RiskSource};

/// Tries each source in order and returns the first estimate produced.
#[derive(Debug, Clone)]
pub struct RiskResolver {
    sources: Vec<RiskSource>,
}

impl RiskResolver {
    pub fn new(sources: Vec<RiskSource>) -> Self {
        Self { sources }
    }

    /// Remote service first, then the deterministic estimate, then the constant.
    pub fn with_remote(remote: RemoteRiskClient, table: BaseRiskTable) -> Self {
        Self::new(vec![
            RiskSource::Remote(remote),
            RiskSource::Deterministic(table),
            RiskSource::Constant,
        ])
    }

    pub fn offline(table: BaseRiskTable) -> Self {
        Self::new(vec![RiskSource::Deterministic(table), RiskSource::Constant])
    }

    pub fn sources(&self) -> &[RiskSource] {
        &self.sources
    }

    /// Never fails: source errors are logged and the next source is tried.
    pub async fn estimate_risk(&self, id: &str) -> RiskAssessment {
        for source in &self.sources {
            match source.assess(id).await {
                Ok(assessment) => {
                    log::debug!("Risk for {} from {} source", id, source.name());
                    return assessment;
                }
                Err(e) => {
                    log::warn!("{} risk source failed for {}: {}", source.name(), id, e);
                }
            }
        }
        constant_assessment(id)
    }
}
