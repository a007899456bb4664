//! Technology aggregator — turns mitigated scores into the final inventory.
//!
//! Consumes the evidence store, the scoring engine, and a mitigation
//! outcome; produces categorized technologies, category groups, and stacks
//! anchored on primary technologies (frameworks and languages).

use stackscan_core::config::AnalysisConfig;
use stackscan_core::types::technology::{
    Technology, TechnologyCategory, TechnologyGroup, TechnologyStack, TechnologyUsage,
};
use stackscan_core::{FxHashMap, FxHashSet};

use crate::confidence::ConfidenceScoringEngine;
use crate::evidence::EvidenceStore;
use crate::mitigation::MitigationOutcome;
use crate::tables::{self, CategoryRules};

use super::version;

/// Aggregates mitigated detections into the final technology inventory.
pub struct TechnologyAggregator {
    rules: &'static CategoryRules,
    max_supporting_evidence: usize,
    primary_threshold: f64,
    technologies: FxHashMap<String, Technology>,
    groups: Vec<TechnologyGroup>,
    stacks: FxHashMap<String, TechnologyStack>,
    primary: Vec<Technology>,
}

impl Default for TechnologyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl TechnologyAggregator {
    /// Aggregator with default limits and the built-in category tables.
    pub fn new() -> Self {
        Self::with_config(&AnalysisConfig::default())
    }

    pub fn with_config(config: &AnalysisConfig) -> Self {
        Self {
            rules: tables::category_rules(),
            max_supporting_evidence: config.effective_max_supporting_evidence(),
            primary_threshold: config.effective_primary_threshold(),
            technologies: FxHashMap::default(),
            groups: Vec::new(),
            stacks: FxHashMap::default(),
            primary: Vec::new(),
        }
    }

    /// Category of a technology: direct table lookup, then parent
    /// inheritance, then name-pattern fallback, defaulting to Library.
    pub fn determine_category(&self, technology_name: &str) -> TechnologyCategory {
        let lower = technology_name.to_lowercase();
        if let Some(&category) = self.rules.categories.get(&lower) {
            return category;
        }

        if let Some(parent) = self.rules.parent_of(technology_name) {
            let parent_category = self
                .rules
                .categories
                .get(&parent.to_lowercase())
                .copied()
                .unwrap_or(TechnologyCategory::Library);
            // Framework satellites are libraries; everything else inherits.
            if parent_category != TechnologyCategory::Framework {
                return parent_category;
            }
            return TechnologyCategory::Library;
        }

        for (pattern, category) in &self.rules.suffix_patterns {
            if pattern.is_match(&lower) {
                return *category;
            }
        }

        TechnologyCategory::Library
    }

    fn calculate_usage(
        evidence_count: usize,
        file_count: usize,
        confidence: f64,
    ) -> TechnologyUsage {
        TechnologyUsage {
            file_count,
            frequency: evidence_count,
            criticality: (confidence * 0.7 + file_count as f64 * 2.0).min(100.0),
        }
    }

    /// Build the technology inventory from mitigated confidence scores.
    ///
    /// Only technologies whose adjusted confidence meets `threshold` and
    /// which were not excluded survive. The recorded confidence is the
    /// adjusted one.
    pub fn aggregate_technologies(
        &mut self,
        store: &EvidenceStore,
        scorer: &ConfidenceScoringEngine,
        outcome: &MitigationOutcome,
        threshold: f64,
    ) -> Vec<Technology> {
        for (name, &confidence) in &outcome.adjusted_confidences {
            if confidence < threshold || outcome.excluded.contains(name) {
                continue;
            }

            let normalized_name = name.trim();
            if normalized_name.is_empty() {
                continue;
            }

            let evidence_list = store.evidence_for_technology(normalized_name);
            let files: FxHashSet<&str> = evidence_list
                .iter()
                .filter_map(|e| e.file_path.as_deref())
                .collect();

            let technology = Technology {
                name: normalized_name.to_string(),
                category: self.determine_category(normalized_name),
                confidence,
                version: version::resolve_version(evidence_list),
                usage: Self::calculate_usage(evidence_list.len(), files.len(), confidence),
                evidence: scorer.supporting_evidence(normalized_name, self.max_supporting_evidence),
            };
            self.technologies.insert(normalized_name.to_string(), technology);
        }

        tracing::info!(count = self.technologies.len(), "aggregated technologies");
        self.all_technologies()
    }

    /// Group the inventory by category, members sorted by confidence.
    pub fn group_technologies(&mut self) -> &[TechnologyGroup] {
        let mut by_category: FxHashMap<&'static str, Vec<Technology>> = FxHashMap::default();
        for tech in self.technologies.values() {
            by_category.entry(tech.category.name()).or_default().push(tech.clone());
        }

        let mut groups: Vec<TechnologyGroup> = by_category
            .into_iter()
            .map(|(name, mut technologies)| {
                technologies.sort_by(|a, b| {
                    b.confidence
                        .partial_cmp(&a.confidence)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.name.cmp(&b.name))
                });
                TechnologyGroup {
                    name: name.to_string(),
                    technologies,
                }
            })
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));

        self.groups = groups;
        &self.groups
    }

    /// Build stacks anchored on primary technologies.
    ///
    /// A primary is a Framework or Language whose confidence meets the
    /// primary threshold. Its stack collects relationship children present
    /// in the inventory plus `<primary>-` prefixed names, deduplicated.
    pub fn create_technology_stacks(&mut self) -> Vec<TechnologyStack> {
        let mut primary: Vec<Technology> = self
            .technologies
            .values()
            .filter(|t| {
                matches!(
                    t.category,
                    TechnologyCategory::Framework | TechnologyCategory::Language
                ) && t.confidence >= self.primary_threshold
            })
            .cloned()
            .collect();
        primary.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut stacks = FxHashMap::default();
        for p in &primary {
            let mut related: Vec<Technology> = Vec::new();
            let mut seen: FxHashSet<String> = FxHashSet::default();

            if let Some((_, children)) = self.rules.relationships.iter().find(|(parent, _)| parent == &p.name) {
                for child in children {
                    if let Some(tech) = self.technologies.get(child) {
                        if seen.insert(tech.name.clone()) {
                            related.push(tech.clone());
                        }
                    }
                }
            }

            let prefix = format!("{}-", p.name.to_lowercase());
            let mut by_prefix: Vec<&Technology> = self
                .technologies
                .values()
                .filter(|t| t.name.to_lowercase().starts_with(&prefix))
                .collect();
            by_prefix.sort_by(|a, b| a.name.cmp(&b.name));
            for tech in by_prefix {
                if seen.insert(tech.name.clone()) {
                    related.push(tech.clone());
                }
            }

            stacks.insert(
                p.name.clone(),
                TechnologyStack {
                    name: format!("{} Stack", p.name),
                    primary_technology: p.clone(),
                    related_technologies: related,
                },
            );
        }

        self.primary = primary;
        self.stacks = stacks;

        tracing::info!(stacks = self.stacks.len(), "created technology stacks");
        let mut all: Vec<TechnologyStack> = self.stacks.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// The relationship or naming-pattern parent of a technology, if any.
    pub fn parent_of(&self, technology_name: &str) -> Option<String> {
        if let Some(parent) = self.rules.parent_of(technology_name) {
            return Some(parent.to_string());
        }
        // Naming fallback: the prefix before '-' when it is itself detected.
        let prefix = technology_name.split('-').next()?;
        if prefix != technology_name && self.technologies.contains_key(prefix) {
            return Some(prefix.to_string());
        }
        None
    }

    pub fn technologies_by_category(&self, category: TechnologyCategory) -> Vec<&Technology> {
        self.technologies
            .values()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Primary technologies in confidence order. Empty before
    /// `create_technology_stacks` runs.
    pub fn primary_technologies(&self) -> &[Technology] {
        &self.primary
    }

    pub fn stack_for(&self, primary_name: &str) -> Option<&TechnologyStack> {
        self.stacks.get(primary_name)
    }

    /// All stacks, ordered by name.
    pub fn all_stacks(&self) -> Vec<&TechnologyStack> {
        let mut all: Vec<&TechnologyStack> = self.stacks.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn technology_groups(&self) -> &[TechnologyGroup] {
        &self.groups
    }

    /// All aggregated technologies, confidence descending.
    pub fn all_technologies(&self) -> Vec<Technology> {
        let mut all: Vec<Technology> = self.technologies.values().cloned().collect();
        all.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        all
    }
}
