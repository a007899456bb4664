//! # stackscan-analysis
//!
//! The evidence-to-inventory decision pipeline for stackscan.
//! Combines weak, noisy observations (manifest entries, imports, framework
//! signature matches, AI detections) into a ranked, de-duplicated technology
//! inventory with confidence scores, categories, versions, and stacks.
//!
//! Data flows strictly downward:
//! evidence store -> scoring engine -> mitigation -> aggregation.

pub mod aggregation;
pub mod confidence;
pub mod evidence;
pub mod mitigation;
pub mod pipeline;
pub mod tables;

pub use evidence::store::EvidenceStore;
pub use confidence::scorer::ConfidenceScoringEngine;
pub use mitigation::{FalsePositiveMitigator, MitigationOutcome};
pub use aggregation::aggregator::TechnologyAggregator;
pub use pipeline::{AnalysisPipeline, PipelineReport};
