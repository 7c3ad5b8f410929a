use serde::Serialize;
use std::fmt;

/// Probability above which a patient is reported as high risk.
pub const RISK_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    /// `High` strictly above the threshold; exactly 0.5 is `Low`.
    pub fn from_probability(p: f64) -> Self {
        if p > RISK_THRESHOLD {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "Yüksek Risk",
            RiskLevel::Low => "Düşük Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one risk query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub probability: f64,
    pub risk: RiskLevel,
}

impl Prediction {
    pub fn new(probability: f64) -> Self {
        Prediction {
            probability,
            risk: RiskLevel::from_probability(probability),
        }
    }

    pub fn percentage(&self) -> f64 {
        self.probability * 100.0
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Risk Seviyesi: {}", self.risk)?;
        write!(f, "Risk Oranı: {:.2}%", self.percentage())
    }
}
