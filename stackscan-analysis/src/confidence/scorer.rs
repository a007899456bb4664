//! Confidence scoring engine.
//!
//! Converts a technology's evidence list into a single 0-100 score:
//! a weighted evidence sum with diminishing returns per additional item
//! (`log2(n + 1)`), pushed through a logistic curve for a smooth
//! floor/ceiling. Scores are cached per technology; accepting new evidence
//! removes the cache entry so the next lookup recomputes.

use stackscan_core::types::evidence::Evidence;
use stackscan_core::FxHashMap;

/// Minimum evidence count for a non-zero score.
const MIN_EVIDENCE_COUNT: usize = 1;

/// Normalized scores below this are too weak to report and clamp to 0.
const MIN_CONFIDENCE_THRESHOLD: f64 = 10.0;

/// Center of the logistic normalization curve, in raw-score units.
const LOGISTIC_MIDPOINT: f64 = 10.0;

/// Slope of the logistic normalization curve.
const LOGISTIC_SLOPE: f64 = 0.5;

/// Aggregate statistics over all evidence the engine has seen.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct EvidenceStats {
    pub total_technologies: usize,
    pub total_evidence: usize,
    pub evidence_by_type: FxHashMap<&'static str, usize>,
    pub evidence_by_source: FxHashMap<&'static str, usize>,
    pub avg_evidence_per_technology: f64,
}

/// Per-job confidence scoring engine.
#[derive(Debug, Default)]
pub struct ConfidenceScoringEngine {
    /// Technology name -> its evidence, in acceptance order.
    evidence_by_technology: FxHashMap<String, Vec<Evidence>>,
    /// Cached scores. Entries are removed (not marked stale) on new
    /// evidence, so a missing key always forces recomputation.
    scores: FxHashMap<String, f64>,
}

impl ConfidenceScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record evidence for a technology and invalidate its cached score.
    pub fn add_evidence(&mut self, technology_name: &str, evidence: Evidence) {
        self.evidence_by_technology
            .entry(technology_name.to_string())
            .or_default()
            .push(evidence);
        self.scores.remove(technology_name);
    }

    /// Record a batch of evidence grouped by technology.
    pub fn add_evidence_batch(&mut self, batch: &FxHashMap<String, Vec<Evidence>>) {
        for (name, items) in batch {
            for evidence in items {
                self.add_evidence(name, evidence.clone());
            }
        }
    }

    /// Raw pre-normalization score for an evidence list.
    fn raw_score(evidence: &[Evidence]) -> f64 {
        if evidence.is_empty() {
            return 0.0;
        }

        // Diminishing returns on evidence volume.
        let count_factor = ((evidence.len() + 1) as f64).log2();

        let weighted_sum: f64 = evidence
            .iter()
            .map(|e| {
                let mut score = e.evidence_type.weight() * e.source.weight() / 10.0;
                if e.confidence > 0.0 {
                    score *= e.confidence / 100.0;
                }
                score
            })
            .sum();

        weighted_sum * count_factor
    }

    /// Logistic normalization of a raw score onto 0-100.
    fn normalize(raw_score: f64) -> f64 {
        if raw_score <= 0.0 {
            return 0.0;
        }
        100.0 / (1.0 + (-LOGISTIC_SLOPE * (raw_score - LOGISTIC_MIDPOINT)).exp())
    }

    /// Confidence score (0-100) for a technology.
    ///
    /// Returns exactly 0 when the technology has no evidence, or when the
    /// normalized score falls below the reporting floor.
    pub fn calculate_confidence(&mut self, technology_name: &str) -> f64 {
        if let Some(&cached) = self.scores.get(technology_name) {
            return cached;
        }

        let evidence = self
            .evidence_by_technology
            .get(technology_name)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let score = if evidence.len() < MIN_EVIDENCE_COUNT {
            0.0
        } else {
            let normalized = Self::normalize(Self::raw_score(evidence));
            if normalized < MIN_CONFIDENCE_THRESHOLD {
                0.0
            } else {
                normalized
            }
        };

        self.scores.insert(technology_name.to_string(), score);
        score
    }

    /// Compute (and cache) confidence for every known technology.
    pub fn calculate_all_confidences(&mut self) -> FxHashMap<String, f64> {
        let names: Vec<String> = self.evidence_by_technology.keys().cloned().collect();
        for name in names {
            self.calculate_confidence(&name);
        }
        self.scores.clone()
    }

    /// The most significant supporting evidence for a technology, ranked by
    /// `type_weight * source_weight * (confidence or 50)/100` descending.
    pub fn supporting_evidence(&self, technology_name: &str, max_items: usize) -> Vec<Evidence> {
        let Some(evidence) = self.evidence_by_technology.get(technology_name) else {
            return Vec::new();
        };

        let significance = |e: &Evidence| {
            let confidence = if e.confidence > 0.0 { e.confidence } else { 50.0 };
            e.evidence_type.weight() * e.source.weight() * (confidence / 100.0)
        };

        let mut ranked: Vec<Evidence> = evidence.clone();
        ranked.sort_by(|a, b| {
            significance(b)
                .partial_cmp(&significance(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(max_items);
        ranked
    }

    /// Technology names whose confidence is at or above `threshold`.
    pub fn technologies_above_threshold(&mut self, threshold: f64) -> Vec<String> {
        self.calculate_all_confidences()
            .into_iter()
            .filter(|(_, score)| *score >= threshold)
            .map(|(name, _)| name)
            .collect()
    }

    /// Number of evidence items recorded for a technology.
    pub fn evidence_count(&self, technology_name: &str) -> usize {
        self.evidence_by_technology
            .get(technology_name)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Aggregate statistics over all recorded evidence.
    pub fn evidence_stats(&self) -> EvidenceStats {
        let mut by_type: FxHashMap<&'static str, usize> = FxHashMap::default();
        let mut by_source: FxHashMap<&'static str, usize> = FxHashMap::default();
        let mut total = 0usize;
        for items in self.evidence_by_technology.values() {
            total += items.len();
            for e in items {
                *by_type.entry(e.evidence_type.name()).or_insert(0) += 1;
                *by_source.entry(e.source.name()).or_insert(0) += 1;
            }
        }
        let technologies = self.evidence_by_technology.len();
        EvidenceStats {
            total_technologies: technologies,
            total_evidence: total,
            evidence_by_type: by_type,
            evidence_by_source: by_source,
            avg_evidence_per_technology: if technologies > 0 {
                total as f64 / technologies as f64
            } else {
                0.0
            },
        }
    }
}
