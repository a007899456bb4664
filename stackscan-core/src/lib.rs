//! # stackscan-core
//!
//! Foundation crate for the stackscan technology inventory engine.
//! Defines the evidence and technology data model, collaborator input
//! types, errors, config, and tracing. The analysis crate depends on this.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::AnalysisConfig;
pub use errors::error_code::StackscanErrorCode;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::evidence::{Evidence, EvidenceSource, EvidenceType};
pub use types::technology::{
    Technology, TechnologyCategory, TechnologyGroup, TechnologyStack, TechnologyUsage,
};
