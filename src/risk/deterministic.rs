use crate::risk::hash::id_hash;
use crate::risk::{BaseRiskTable, RiskAssessment, RiskError, RiskLevel};

pub const MIN_PROBABILITY: f64 = 0.05;
pub const MAX_PROBABILITY: f64 = 0.95;
pub const MAX_COLLISIONS: f64 = 5.0;

/// Pseudo risk derived from the identifier alone.
///
/// Remainders keep the sign of the hash, so `hash % 3` may lower the
/// collision count before it is clamped.
pub fn deterministic_assessment(
    table: &BaseRiskTable,
    id: &str,
) -> Result<RiskAssessment, RiskError> {
    if id.trim().is_empty() {
        return Err(RiskError::MalformedId(id.to_string()));
    }

    let hash = id_hash(id);
    let offset = f64::from((hash % 30).abs()) / 100.0 - 0.15;
    let probability = (table.base_risk(id) + offset).clamp(MIN_PROBABILITY, MAX_PROBABILITY);
    if !probability.is_finite() {
        return Err(RiskError::InvalidBaseRisk(id.to_string()));
    }

    let hours = (hash % 48).abs() + 1;
    let minutes = (hash % 60).abs();
    let collisions = (probability * 5.0 + f64::from(hash % 3))
        .floor()
        .clamp(0.0, MAX_COLLISIONS);

    Ok(RiskAssessment {
        satellite_id: id.to_string(),
        risk_probability: probability,
        risk_level: RiskLevel::from_probability(probability),
        time_to_closest_approach: format!("{}h {}m", hours, minutes),
        potential_collisions: collisions as u32,
    })
}

/// Answer used when nothing else could produce an estimate.
pub fn constant_assessment(id: &str) -> RiskAssessment {
    RiskAssessment {
        satellite_id: id.to_string(),
        risk_probability: 0.4,
        risk_level: RiskLevel::Medium,
        time_to_closest_approach: "24h 30m".to_string(),
        potential_collisions: 2,
    }
}
