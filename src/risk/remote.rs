use std::time::Duration;

use reqwest::Client;

use crate::risk::{RiskAssessment, RiskError, RiskRequest};

/// Client for the collision-risk service. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct RemoteRiskClient {
    client: Client,
    endpoint: String,
}

impl RemoteRiskClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RiskError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// A success status returns the body as-is; anything else is an error.
    pub async fn fetch(&self, id: &str) -> Result<RiskAssessment, RiskError> {
        log::info!("Fetching collision risk for {} from {}", id, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RiskRequest {
                satellite_id: id.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RiskError::Status(status.as_u16()));
        }

        Ok(response.json::<RiskAssessment>().await?)
    }
}
