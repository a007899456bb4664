//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Configuration for an analysis job's decision pipeline.
///
/// All fields are optional in serialized form; `effective_*` accessors
/// apply the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum confidence for a technology to appear in the inventory.
    /// Default: 50.0.
    pub confidence_threshold: Option<f64>,
    /// Maximum supporting evidence items attached to each technology.
    /// Default: 5.
    pub max_supporting_evidence: Option<usize>,
    /// Minimum confidence for a Framework/Language to anchor a stack.
    /// Default: 70.0.
    pub primary_technology_threshold: Option<f64>,
}

impl AnalysisConfig {
    /// Returns the effective inventory threshold, defaulting to 50.0.
    pub fn effective_confidence_threshold(&self) -> f64 {
        self.confidence_threshold.unwrap_or(50.0)
    }

    /// Returns the effective supporting-evidence cap, defaulting to 5.
    pub fn effective_max_supporting_evidence(&self) -> usize {
        self.max_supporting_evidence.unwrap_or(5)
    }

    /// Returns the effective stack-primary threshold, defaulting to 70.0.
    pub fn effective_primary_threshold(&self) -> f64 {
        self.primary_technology_threshold.unwrap_or(70.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.effective_confidence_threshold(), 50.0);
        assert_eq!(cfg.effective_max_supporting_evidence(), 5);
        assert_eq!(cfg.effective_primary_threshold(), 70.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let cfg: AnalysisConfig = serde_json::from_str(r#"{"confidence_threshold": 30.0}"#).unwrap();
        assert_eq!(cfg.effective_confidence_threshold(), 30.0);
        assert_eq!(cfg.effective_max_supporting_evidence(), 5);
    }
}
