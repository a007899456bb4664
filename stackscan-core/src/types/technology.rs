//! Derived technology types — the outputs of the aggregation pass.
//!
//! These are recomputed fresh on every aggregation pass from the evidence
//! store and scoring engine; they are never incrementally updated.

use serde::{Deserialize, Serialize};

use super::evidence::Evidence;

/// Category of a detected technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TechnologyCategory {
    Language,
    Framework,
    Library,
    Database,
    Orm,
    BuildTool,
    Testing,
    Ui,
    StateManagement,
    Infrastructure,
    Api,
    Plugin,
    Tool,
    Unknown,
}

impl TechnologyCategory {
    pub const ALL: [TechnologyCategory; 14] = [
        Self::Language,
        Self::Framework,
        Self::Library,
        Self::Database,
        Self::Orm,
        Self::BuildTool,
        Self::Testing,
        Self::Ui,
        Self::StateManagement,
        Self::Infrastructure,
        Self::Api,
        Self::Plugin,
        Self::Tool,
        Self::Unknown,
    ];

    /// Stable label used for grouping and reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Framework => "framework",
            Self::Library => "library",
            Self::Database => "database",
            Self::Orm => "orm",
            Self::BuildTool => "build_tool",
            Self::Testing => "testing",
            Self::Ui => "ui",
            Self::StateManagement => "state_management",
            Self::Infrastructure => "infrastructure",
            Self::Api => "api",
            Self::Plugin => "plugin",
            Self::Tool => "tool",
            Self::Unknown => "unknown",
        }
    }
}

/// Usage metrics for a technology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnologyUsage {
    /// Number of distinct files with evidence for the technology.
    pub file_count: usize,
    /// Total evidence count.
    pub frequency: usize,
    /// Blend of confidence and file breadth (0-100):
    /// `min(100, 0.7 * confidence + 2 * file_count)`.
    pub criticality: f64,
}

/// A detected technology with its resolved attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub category: TechnologyCategory,
    /// Final confidence (0-100), after mitigation adjustments.
    pub confidence: f64,
    /// Resolved version, if any evidence carried one.
    pub version: Option<String>,
    pub usage: TechnologyUsage,
    /// The strongest supporting evidence (bounded, top 5).
    pub evidence: Vec<Evidence>,
}

/// Technologies grouped under one category label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyGroup {
    /// Category label.
    pub name: String,
    /// Members, sorted by confidence descending.
    pub technologies: Vec<Technology>,
}

/// A primary technology plus its related satellites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyStack {
    /// Display name, e.g. `"react Stack"`.
    pub name: String,
    /// Framework or Language with confidence >= 70.
    pub primary_technology: Technology,
    /// Satellites from the relationship table and name-prefix matching.
    pub related_technologies: Vec<Technology>,
}
