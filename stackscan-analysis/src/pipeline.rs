//! AnalysisPipeline — end-to-end orchestrator.
//!
//! Chains the four stages over one set of inputs:
//! (1) evidence intake into the store
//! (2) confidence scoring
//! (3) false-positive mitigation
//! (4) technology aggregation (inventory, groups, stacks)

use serde::Serialize;
use stackscan_core::config::AnalysisConfig;
use stackscan_core::types::evidence::Evidence;
use stackscan_core::types::inputs::{AiDetection, Dependency, ImportInfo, SignatureMatch};
use stackscan_core::types::technology::{Technology, TechnologyGroup, TechnologyStack};
use stackscan_core::FxHashMap;

use crate::aggregation::TechnologyAggregator;
use crate::confidence::{ConfidenceScoringEngine, EvidenceStats};
use crate::evidence::{EvidenceStore, StoreSummary};
use crate::mitigation::FalsePositiveMitigator;

/// Full pipeline output.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Final inventory, confidence descending.
    pub technologies: Vec<Technology>,
    /// Inventory grouped by category.
    pub groups: Vec<TechnologyGroup>,
    /// Stacks anchored on primary technologies.
    pub stacks: Vec<TechnologyStack>,
    /// Technologies dropped by mitigation, sorted by name.
    pub excluded: Vec<String>,
    /// Scoring-engine statistics.
    pub evidence_stats: EvidenceStats,
    /// Store contents snapshot.
    pub store_summary: StoreSummary,
}

/// End-to-end technology detection pipeline.
pub struct AnalysisPipeline {
    store: EvidenceStore,
    mitigator: FalsePositiveMitigator,
    config: AnalysisConfig,
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisPipeline {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            store: EvidenceStore::new(),
            mitigator: FalsePositiveMitigator::new(),
            config,
        }
    }

    /// Ingest manifest dependencies. Returns the number of items added.
    pub fn add_dependencies(&mut self, dependencies: &[Dependency]) -> usize {
        self.store.collect_from_dependencies(dependencies)
    }

    /// Ingest import statements, mapping import paths to technology names.
    pub fn add_imports(
        &mut self,
        imports: &[ImportInfo],
        package_mapping: &FxHashMap<String, String>,
    ) -> usize {
        self.store.collect_from_imports(imports, package_mapping)
    }

    /// Ingest framework signature matches.
    pub fn add_signature_matches(&mut self, matches: &[SignatureMatch]) -> usize {
        self.store.collect_from_signature_matches(matches)
    }

    /// Ingest AI model detections.
    pub fn add_ai_detections(&mut self, detections: &[AiDetection]) -> usize {
        self.store.collect_from_ai_detections(detections)
    }

    /// Ingest a pre-built evidence item directly.
    pub fn add_evidence(&mut self, evidence: Evidence) -> bool {
        self.store.add_evidence(evidence)
    }

    /// The underlying evidence store.
    pub fn store(&self) -> &EvidenceStore {
        &self.store
    }

    /// Run scoring, mitigation, and aggregation over all ingested evidence.
    ///
    /// The store is left intact; `run` can be called again after more
    /// evidence arrives.
    pub fn run(&mut self) -> PipelineReport {
        let threshold = self.config.effective_confidence_threshold();
        tracing::info!(
            evidence = self.store.total_evidence_count(),
            threshold,
            "running analysis pipeline"
        );

        // Step 2: confidence scoring over the store contents.
        let mut scorer = ConfidenceScoringEngine::new();
        for e in self.store.all_evidence() {
            scorer.add_evidence(&e.technology_name, e.clone());
        }

        // Step 3: false-positive mitigation.
        let outcome = self.mitigator.mitigate(&self.store, &mut scorer);

        // Step 4: aggregation.
        let mut aggregator = TechnologyAggregator::with_config(&self.config);
        let technologies =
            aggregator.aggregate_technologies(&self.store, &scorer, &outcome, threshold);
        let groups = aggregator.group_technologies().to_vec();
        let stacks = aggregator.create_technology_stacks();

        let mut excluded: Vec<String> = outcome.excluded.into_iter().collect();
        excluded.sort();

        tracing::info!(
            technologies = technologies.len(),
            stacks = stacks.len(),
            excluded = excluded.len(),
            "analysis pipeline complete"
        );

        PipelineReport {
            technologies,
            groups,
            stacks,
            excluded,
            evidence_stats: scorer.evidence_stats(),
            store_summary: self.store.summary(),
        }
    }
}
