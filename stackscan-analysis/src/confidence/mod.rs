//! Confidence scoring.

pub mod scorer;

pub use scorer::{ConfidenceScoringEngine, EvidenceStats};
