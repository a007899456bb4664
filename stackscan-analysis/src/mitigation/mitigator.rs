//! False-positive mitigation pass.
//!
//! Runs four validation checks over every technology with evidence; the
//! first failing check excludes the technology and later checks are
//! skipped. Survivors get their confidence rescaled by a cross-validation
//! score, with anything landing below the reporting threshold forced to 0.

use stackscan_core::types::evidence::{EvidenceSource, EvidenceType};
use stackscan_core::{FxHashMap, FxHashSet};

use crate::confidence::ConfidenceScoringEngine;
use crate::evidence::EvidenceStore;
use crate::tables::{self, MitigationRules};

/// Confidence below which an adjusted score is forced to 0.
const LOW_CONFIDENCE_THRESHOLD: f64 = 40.0;

/// Minimum evidence count for a reliable detection.
const MIN_EVIDENCE_COUNT: usize = 2;

/// AI-only detections need at least this confidence to survive.
const AI_ONLY_CONFIDENCE_THRESHOLD: f64 = 60.0;

/// Generic names that legitimately concentrate in a single file.
const GENERIC_UTILITY_NAMES: [&str; 4] = ["utils", "helpers", "common", "util"];

/// Result of a mitigation run.
#[derive(Debug, Clone, Default)]
pub struct MitigationOutcome {
    /// Technologies excluded outright.
    pub excluded: FxHashSet<String>,
    /// Post-adjustment confidence per technology. Excluded technologies
    /// appear with score 0.
    pub adjusted_confidences: FxHashMap<String, f64>,
}

/// False-positive mitigation engine.
pub struct FalsePositiveMitigator {
    rules: &'static MitigationRules,
}

impl Default for FalsePositiveMitigator {
    fn default() -> Self {
        Self::new()
    }
}

impl FalsePositiveMitigator {
    /// Mitigator using the built-in rule tables.
    pub fn new() -> Self {
        Self {
            rules: tables::mitigation_rules(),
        }
    }

    /// Run all mitigation checks and confidence adjustments.
    pub fn mitigate(
        &self,
        store: &EvidenceStore,
        scorer: &mut ConfidenceScoringEngine,
    ) -> MitigationOutcome {
        let mut excluded = FxHashSet::default();
        let mut adjustment_factors: FxHashMap<String, f64> = FxHashMap::default();

        for name in store.technologies_with_evidence() {
            if !self.passes_specific_rules(&name, store) {
                tracing::debug!(technology = %name, "excluded by technology-specific rule");
                excluded.insert(name);
                continue;
            }
            match self.disambiguate(&name, store) {
                Some(resolved) if resolved == name => {}
                resolved => {
                    tracing::debug!(
                        technology = %name,
                        resolved = resolved.as_deref().unwrap_or("<none>"),
                        "excluded as ambiguous"
                    );
                    excluded.insert(name);
                    continue;
                }
            }
            if !Self::has_diverse_evidence(&name, store, scorer) {
                tracing::debug!(technology = %name, "excluded for weak evidence diversity");
                excluded.insert(name);
                continue;
            }
            if !Self::passes_anomaly_checks(&name, store, scorer, &mut adjustment_factors) {
                tracing::debug!(technology = %name, "excluded as statistical anomaly");
                excluded.insert(name);
            }
        }

        let adjusted_confidences =
            Self::adjust_confidences(store, scorer, &excluded, &adjustment_factors);

        tracing::info!(
            excluded = excluded.len(),
            adjusted = adjustment_factors.len(),
            "false-positive mitigation complete"
        );

        MitigationOutcome {
            excluded,
            adjusted_confidences,
        }
    }

    /// Minimum-evidence rules for technologies known to false-positive.
    fn passes_specific_rules(&self, technology_name: &str, store: &EvidenceStore) -> bool {
        let Some(rule) = self
            .rules
            .high_false_positive
            .get(&technology_name.to_lowercase())
        else {
            return true;
        };

        let matching = store
            .evidence_for_technology(technology_name)
            .iter()
            .filter(|e| {
                if rule.case_sensitive {
                    e.technology_name == technology_name
                } else {
                    e.technology_name.eq_ignore_ascii_case(technology_name)
                }
            })
            .count();

        matching >= rule.min_evidence
    }

    /// Resolve an ambiguous name to the best-evidenced specific candidate.
    ///
    /// Returns the name to keep, or `None` when neither a candidate nor the
    /// original has enough evidence. Non-ambiguous names pass through.
    fn disambiguate(&self, technology_name: &str, store: &EvidenceStore) -> Option<String> {
        let Some(candidates) = self.rules.ambiguous.get(&technology_name.to_lowercase()) else {
            // Non-ambiguous names pass through unchanged.
            return Some(technology_name.to_string());
        };

        // The name is generic; it needs a specific winner. Ties keep the
        // first candidate in table order.
        let mut best: Option<(&String, usize)> = None;
        for candidate in candidates {
            let count = store.evidence_for_technology(candidate).len();
            if count > 0 && best.map_or(true, |(_, b)| count > b) {
                best = Some((candidate, count));
            }
        }

        if let Some((candidate, count)) = best {
            if count >= MIN_EVIDENCE_COUNT {
                return Some(candidate.clone());
            }
        }

        if store.evidence_for_technology(technology_name).len() >= MIN_EVIDENCE_COUNT {
            return Some(technology_name.to_string());
        }

        None
    }

    /// Diversity check: multiple evidence types, or one strong type, or a
    /// confidence above the low-water mark.
    fn has_diverse_evidence(
        technology_name: &str,
        store: &EvidenceStore,
        scorer: &mut ConfidenceScoringEngine,
    ) -> bool {
        let evidence = store.evidence_for_technology(technology_name);
        if evidence.len() < MIN_EVIDENCE_COUNT {
            return false;
        }

        let mut type_counts: FxHashMap<EvidenceType, usize> = FxHashMap::default();
        for e in evidence {
            *type_counts.entry(e.evidence_type).or_insert(0) += 1;
        }

        if type_counts.len() >= 2 {
            return true;
        }
        // A manifest entry is authoritative on its own.
        if type_counts.get(&EvidenceType::ManifestEntry).copied().unwrap_or(0) > 0 {
            return true;
        }
        // Repeated imports corroborate each other.
        if type_counts.get(&EvidenceType::ImportStatement).copied().unwrap_or(0) >= 3 {
            return true;
        }

        scorer.calculate_confidence(technology_name) > LOW_CONFIDENCE_THRESHOLD
    }

    /// Statistical anomaly checks. May record a confidence adjustment factor
    /// instead of excluding.
    fn passes_anomaly_checks(
        technology_name: &str,
        store: &EvidenceStore,
        scorer: &mut ConfidenceScoringEngine,
        adjustment_factors: &mut FxHashMap<String, f64>,
    ) -> bool {
        let evidence = store.evidence_for_technology(technology_name);
        if evidence.is_empty() {
            return false;
        }

        // Multiple mentions of a generic utility name confined to one file
        // are almost always a project-local module.
        let files: FxHashSet<&str> = evidence
            .iter()
            .filter_map(|e| e.file_path.as_deref())
            .collect();
        if files.len() == 1
            && evidence.len() > 1
            && GENERIC_UTILITY_NAMES.contains(&technology_name.to_lowercase().as_str())
        {
            return false;
        }

        // AI-only detections need higher confidence to survive.
        let ai_count = evidence
            .iter()
            .filter(|e| e.source == EvidenceSource::AiModel)
            .count();
        if ai_count == evidence.len() && evidence.len() > 1 {
            tracing::debug!(technology = %technology_name, "only AI-based evidence");
            if scorer.calculate_confidence(technology_name) < AI_ONLY_CONFIDENCE_THRESHOLD {
                return false;
            }
        }

        // A wide confidence spread signals disagreement; dampen rather
        // than exclude.
        let confidences: Vec<f64> = evidence
            .iter()
            .filter(|e| e.confidence > 0.0)
            .map(|e| e.confidence)
            .collect();
        if let (Some(max), Some(min)) = (
            confidences.iter().cloned().reduce(f64::max),
            confidences.iter().cloned().reduce(f64::min),
        ) {
            if max - min > 50.0 && evidence.len() >= 3 {
                adjustment_factors.insert(technology_name.to_string(), 0.8);
            }
        }

        true
    }

    /// Cross-validation score (0-1): source diversity weighted against
    /// confidence consistency.
    fn cross_validation_score(technology_name: &str, store: &EvidenceStore) -> f64 {
        let evidence = store.evidence_for_technology(technology_name);
        if evidence.len() < MIN_EVIDENCE_COUNT {
            return 0.5;
        }

        let sources: FxHashSet<EvidenceSource> = evidence.iter().map(|e| e.source).collect();
        let source_score = (sources.len() as f64 / 3.0).min(1.0);

        let confidences: Vec<f64> = evidence
            .iter()
            .filter(|e| e.confidence > 0.0)
            .map(|e| e.confidence)
            .collect();
        let mut confidence_score = 0.5;
        if !confidences.is_empty() {
            let mean = confidences.iter().sum::<f64>() / confidences.len() as f64;
            if mean > 0.0 {
                let variance = confidences.iter().map(|c| (c - mean).powi(2)).sum::<f64>()
                    / confidences.len() as f64;
                let cv = variance.sqrt() / mean;
                confidence_score = (1.0 - cv).clamp(0.0, 1.0);
            }
        }

        source_score * 0.7 + confidence_score * 0.3
    }

    fn adjust_confidences(
        store: &EvidenceStore,
        scorer: &mut ConfidenceScoringEngine,
        excluded: &FxHashSet<String>,
        adjustment_factors: &FxHashMap<String, f64>,
    ) -> FxHashMap<String, f64> {
        let mut adjusted = FxHashMap::default();
        for (name, score) in scorer.calculate_all_confidences() {
            if excluded.contains(&name) {
                adjusted.insert(name, 0.0);
                continue;
            }
            let factor = adjustment_factors.get(&name).copied().unwrap_or(1.0);
            let validation = Self::cross_validation_score(&name, store);
            let mut value = score * factor * validation;
            if value < LOW_CONFIDENCE_THRESHOLD {
                value = 0.0;
            }
            adjusted.insert(name, value);
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackscan_core::types::evidence::Evidence;

    fn manifest(name: &str) -> Evidence {
        let mut e = Evidence::new(name, EvidenceType::ManifestEntry, EvidenceSource::ManifestParser);
        e.file_path = Some("package.json".to_string());
        e.confidence = 90.0;
        e
    }

    fn import(name: &str, file: &str, line: u32) -> Evidence {
        let mut e = Evidence::new(name, EvidenceType::ImportStatement, EvidenceSource::ImportAnalyzer);
        e.file_path = Some(file.to_string());
        e.line_number = Some(line);
        e.confidence = 80.0;
        e
    }

    fn ai(name: &str, file: &str, line: u32, confidence: f64) -> Evidence {
        let mut e = Evidence::new(name, EvidenceType::AiDetection, EvidenceSource::AiModel);
        e.file_path = Some(file.to_string());
        e.line_number = Some(line);
        e.confidence = confidence;
        e
    }

    fn run(store: &EvidenceStore) -> (MitigationOutcome, ConfidenceScoringEngine) {
        let mut scorer = ConfidenceScoringEngine::new();
        for e in store.all_evidence() {
            scorer.add_evidence(&e.technology_name, e.clone());
        }
        let outcome = FalsePositiveMitigator::new().mitigate(store, &mut scorer);
        (outcome, scorer)
    }

    #[test]
    fn test_well_evidenced_framework_survives() {
        let mut store = EvidenceStore::new();
        store.add_evidence(manifest("react"));
        store.add_evidence(import("react", "src/a.tsx", 1));
        store.add_evidence(import("react", "src/b.tsx", 1));

        let (outcome, _) = run(&store);
        assert!(!outcome.excluded.contains("react"));
        assert!(outcome.adjusted_confidences["react"] > 0.0);
    }

    #[test]
    fn test_high_false_positive_rule_excludes_thin_detection() {
        let mut store = EvidenceStore::new();
        // lodash requires 3 items; give it 2.
        store.add_evidence(import("lodash", "src/a.ts", 1));
        store.add_evidence(import("lodash", "src/b.ts", 1));

        let (outcome, _) = run(&store);
        assert!(outcome.excluded.contains("lodash"));
        assert_eq!(outcome.adjusted_confidences["lodash"], 0.0);
    }

    #[test]
    fn test_ambiguous_name_yields_to_specific_candidate() {
        let mut store = EvidenceStore::new();
        store.add_evidence(import("router", "src/a.ts", 1));
        store.add_evidence(import("router", "src/b.ts", 1));
        store.add_evidence(import("react-router", "src/a.ts", 2));
        store.add_evidence(import("react-router", "src/b.ts", 2));

        let (outcome, _) = run(&store);
        // The specific candidate wins; the generic name is dropped.
        assert!(outcome.excluded.contains("router"));
        assert!(!outcome.excluded.contains("react-router"));
    }

    #[test]
    fn test_unlisted_name_passes_disambiguation() {
        let mut store = EvidenceStore::new();
        store.add_evidence(manifest("leftpad"));
        store.add_evidence(import("leftpad", "src/a.ts", 1));
        store.add_evidence(import("leftpad", "src/b.ts", 1));

        // Not in the ambiguous table: the name must come back unchanged.
        let mitigator = FalsePositiveMitigator::new();
        assert_eq!(
            mitigator.disambiguate("leftpad", &store),
            Some("leftpad".to_string())
        );

        let (outcome, _) = run(&store);
        assert!(!outcome.excluded.contains("leftpad"));
        assert!(outcome.adjusted_confidences["leftpad"] > 0.0);
    }

    #[test]
    fn test_tied_candidates_resolve_to_first_in_table_order() {
        let mut store = EvidenceStore::new();
        store.add_evidence(import("router", "src/a.ts", 1));
        store.add_evidence(import("react-router", "src/a.ts", 2));
        store.add_evidence(import("react-router", "src/b.ts", 2));
        store.add_evidence(import("vue-router", "src/a.ts", 3));
        store.add_evidence(import("vue-router", "src/b.ts", 3));

        // vue-router precedes react-router in the candidate list.
        let mitigator = FalsePositiveMitigator::new();
        assert_eq!(
            mitigator.disambiguate("router", &store),
            Some("vue-router".to_string())
        );
    }

    #[test]
    fn test_ambiguous_name_kept_when_no_candidate_has_evidence() {
        let mut store = EvidenceStore::new();
        store.add_evidence(manifest("router"));
        store.add_evidence(import("router", "src/a.ts", 1));
        store.add_evidence(import("router", "src/b.ts", 1));

        let (outcome, _) = run(&store);
        assert!(!outcome.excluded.contains("router"));
    }

    #[test]
    fn test_single_evidence_item_fails_diversity() {
        let mut store = EvidenceStore::new();
        store.add_evidence(import("leftpad", "src/a.ts", 1));

        let (outcome, _) = run(&store);
        assert!(outcome.excluded.contains("leftpad"));
    }

    #[test]
    fn test_generic_utility_in_single_file_is_anomaly() {
        let mut store = EvidenceStore::new();
        store.add_evidence(manifest("utils"));
        for i in 0..5 {
            let mut e = ai("utils", "src/utils.ts", i, 80.0);
            // Same file as the manifest evidence.
            e.file_path = Some("package.json".to_string());
            store.add_evidence(e);
        }

        let (outcome, _) = run(&store);
        assert!(outcome.excluded.contains("utils"));
    }

    #[test]
    fn test_low_confidence_ai_only_detection_excluded() {
        let mut store = EvidenceStore::new();
        store.add_evidence(ai("ghostlib", "src/a.py", 1, 30.0));
        store.add_evidence(ai("ghostlib", "src/b.py", 2, 35.0));

        let (outcome, _) = run(&store);
        assert!(outcome.excluded.contains("ghostlib"));
    }

    #[test]
    fn test_wide_confidence_spread_dampens_instead_of_excluding() {
        let mut store = EvidenceStore::new();
        store.add_evidence(manifest("spring"));
        store.add_evidence(import("spring", "src/A.java", 1));
        store.add_evidence(ai("spring", "src/B.java", 2, 30.0));

        let (outcome, mut scorer) = run(&store);
        assert!(!outcome.excluded.contains("spring"));
        let base = scorer.calculate_confidence("spring");
        let adjusted = outcome.adjusted_confidences["spring"];
        assert!(adjusted < base, "spread must dampen: base={base}, adjusted={adjusted}");
    }

    #[test]
    fn test_cross_validation_rewards_source_diversity() {
        let mut single = EvidenceStore::new();
        for i in 0..3 {
            single.add_evidence(import("axios", "src/a.ts", i));
        }
        let mut diverse = EvidenceStore::new();
        diverse.add_evidence(manifest("axios"));
        diverse.add_evidence(import("axios", "src/a.ts", 1));
        diverse.add_evidence(ai("axios", "src/b.ts", 2, 85.0));

        let single_score = FalsePositiveMitigator::cross_validation_score("axios", &single);
        let diverse_score = FalsePositiveMitigator::cross_validation_score("axios", &diverse);
        assert!(diverse_score > single_score);
    }
}
