use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Base risk for identifiers starting with `prefix`, raised by `per_index`
/// for every unit of the number that follows the prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub base: f64,
    #[serde(default)]
    pub per_index: f64,
}

/// Maps object identifiers to the base risk the deterministic estimate starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseRiskTable {
    pub default: f64,
    pub known: BTreeMap<String, f64>,
    pub prefixes: Vec<PrefixRule>,
}

impl Default for BaseRiskTable {
    fn default() -> Self {
        let known = [("ISS", 0.25), ("NOAA20", 0.35), ("OSTM", 0.45)]
            .into_iter()
            .map(|(id, base)| (id.to_string(), base))
            .collect();
        Self {
            default: 0.3,
            known,
            prefixes: vec![PrefixRule {
                prefix: "Debris_".to_string(),
                base: 0.65,
                per_index: 0.03,
            }],
        }
    }
}

impl BaseRiskTable {
    /// Exact identifiers win over prefixes; the first matching prefix wins.
    pub fn base_risk(&self, id: &str) -> f64 {
        if let Some(base) = self.known.get(id) {
            return *base;
        }
        for rule in &self.prefixes {
            if let Some(rest) = id.strip_prefix(rule.prefix.as_str()) {
                return rule.base + leading_number(rest) * rule.per_index;
            }
        }
        self.default
    }
}

/// Integer at the start of `s` (optional sign, then digits); 0 when absent.
fn leading_number(s: &str) -> f64 {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0.0, |acc, d| acc * 10.0 + f64::from(d - b'0'));
    sign * value
}
