use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum_macros::Display,
)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.7 {
            RiskLevel::High
        } else if probability >= 0.4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Collision-risk estimate for one object, in the risk service's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessment {
    #[serde(default)]
    pub satellite_id: String,
    pub risk_probability: f64,
    pub risk_level: RiskLevel,
    pub time_to_closest_approach: String,
    #[serde(deserialize_with = "whole_count")]
    pub potential_collisions: u32,
}

/// Accepts `3` and `3.0`; fractional, negative or non-finite counts are errors.
fn whole_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(D::Error::custom(format!(
            "potential_collisions must be a whole number, got {}",
            value
        )))
    }
}

impl RiskAssessment {
    pub fn percentage(&self) -> u32 {
        (self.risk_probability * 100.0).round().max(0.0) as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiskRequest {
    pub satellite_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds() {
        assert_eq!(RiskLevel::from_probability(0.05), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.3999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.4), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.6999), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.95), RiskLevel::High);
    }

    #[test]
    fn parses_service_response_with_extra_fields() {
        let body = r#"{
            "satellite_id": "ISS",
            "risk_probability": 0.82,
            "risk_level": "High",
            "time_to_closest_approach": "5h 12m",
            "potential_collisions": 4,
            "features_used": ["altitude", "inclination"]
        }"#;
        let assessment: RiskAssessment = serde_json::from_str(body).unwrap();
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.potential_collisions, 4);
        assert_eq!(assessment.percentage(), 82);
        assert_eq!(assessment.risk_level.to_string(), "High");
    }

    #[test]
    fn collision_count_may_be_written_as_float() {
        let body = r#"{"risk_probability": 0.1, "risk_level": "Low",
            "time_to_closest_approach": "1h 0m", "potential_collisions": 3.0}"#;
        let assessment: RiskAssessment = serde_json::from_str(body).unwrap();
        assert_eq!(assessment.potential_collisions, 3);

        for bad in ["3.5", "-1", "1e12"] {
            let body = format!(
                r#"{{"risk_probability": 0.1, "risk_level": "Low",
                "time_to_closest_approach": "1h 0m", "potential_collisions": {bad}}}"#
            );
            assert!(serde_json::from_str::<RiskAssessment>(&body).is_err(), "{bad}");
        }
    }

    #[test]
    fn unknown_level_is_rejected() {
        let body = r#"{"risk_probability": 0.9, "risk_level": "Critical",
            "time_to_closest_approach": "1h 0m", "potential_collisions": 3}"#;
        assert!(serde_json::from_str::<RiskAssessment>(body).is_err());
    }
}
