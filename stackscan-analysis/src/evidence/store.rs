//! Evidence store — owns all accepted evidence for one analysis job.
//!
//! Holds a flat insertion-ordered sequence plus four indices (by technology,
//! file, source, type) and a fingerprint set for deduplication. Created once
//! per job, mutated only through `add_evidence`, never shared across jobs.

use stackscan_core::types::evidence::{Evidence, EvidenceSource, EvidenceType};
use stackscan_core::{FxHashMap, FxHashSet};

/// Diagnostic snapshot of the store's contents.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct StoreSummary {
    pub total_evidence: usize,
    pub unique_technologies: usize,
    /// Evidence counts keyed by type label.
    pub evidence_by_type: FxHashMap<&'static str, usize>,
    /// Evidence counts keyed by source label.
    pub evidence_by_source: FxHashMap<&'static str, usize>,
    /// Top technologies by evidence volume, descending (at most 10).
    pub top_technologies: Vec<(String, usize)>,
}

/// In-memory store for all evidence items of one analysis job.
#[derive(Debug, Default)]
pub struct EvidenceStore {
    /// Flat sequence of all accepted evidence, in insertion order.
    items: Vec<Evidence>,
    /// Indices, each key mapping to an insertion-ordered list.
    by_technology: FxHashMap<String, Vec<Evidence>>,
    by_file: FxHashMap<String, Vec<Evidence>>,
    by_source: FxHashMap<EvidenceSource, Vec<Evidence>>,
    by_type: FxHashMap<EvidenceType, Vec<Evidence>>,
    /// Fingerprints of every accepted item.
    seen: FxHashSet<u64>,
}

impl EvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an evidence item.
    ///
    /// Returns `false` if an item with the same fingerprint was already
    /// accepted — duplicates are an expected, silent outcome, not an error.
    ///
    /// # Panics
    ///
    /// Panics if the technology name is empty. A nameless observation is a
    /// contract violation by the producing collaborator; tolerating it would
    /// corrupt the indices.
    pub fn add_evidence(&mut self, evidence: Evidence) -> bool {
        assert!(
            !evidence.technology_name.is_empty(),
            "evidence must carry a technology name"
        );

        if !self.seen.insert(evidence.fingerprint()) {
            return false;
        }

        self.by_technology
            .entry(evidence.technology_name.clone())
            .or_default()
            .push(evidence.clone());
        if let Some(ref file) = evidence.file_path {
            self.by_file.entry(file.clone()).or_default().push(evidence.clone());
        }
        self.by_source.entry(evidence.source).or_default().push(evidence.clone());
        self.by_type.entry(evidence.evidence_type).or_default().push(evidence.clone());
        self.items.push(evidence);

        true
    }

    /// All evidence for a technology, in insertion order. Possibly empty.
    pub fn evidence_for_technology(&self, technology_name: &str) -> &[Evidence] {
        self.by_technology
            .get(technology_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All evidence found in a specific file, in insertion order.
    pub fn evidence_for_file(&self, file_path: &str) -> &[Evidence] {
        self.by_file.get(file_path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of all technologies that have at least one evidence item.
    pub fn technologies_with_evidence(&self) -> FxHashSet<String> {
        self.by_technology.keys().cloned().collect()
    }

    /// Evidence counts per technology.
    pub fn evidence_count_by_technology(&self) -> FxHashMap<String, usize> {
        self.by_technology
            .iter()
            .map(|(name, items)| (name.clone(), items.len()))
            .collect()
    }

    /// Total number of accepted evidence items.
    pub fn total_evidence_count(&self) -> usize {
        self.items.len()
    }

    /// All accepted evidence in insertion order.
    pub fn all_evidence(&self) -> &[Evidence] {
        &self.items
    }

    /// Diagnostic snapshot: totals, counts by type/source, and the top 10
    /// technologies by evidence volume.
    pub fn summary(&self) -> StoreSummary {
        let mut by_type = FxHashMap::default();
        let mut by_source = FxHashMap::default();
        for e in &self.items {
            *by_type.entry(e.evidence_type.name()).or_insert(0) += 1;
            *by_source.entry(e.source.name()).or_insert(0) += 1;
        }

        let mut top: Vec<(String, usize)> = self
            .by_technology
            .iter()
            .map(|(name, items)| (name.clone(), items.len()))
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top.truncate(10);

        StoreSummary {
            total_evidence: self.items.len(),
            unique_technologies: self.by_technology.len(),
            evidence_by_type: by_type,
            evidence_by_source: by_source,
            top_technologies: top,
        }
    }

    /// Discard everything, returning the store to its freshly created state.
    pub fn clear(&mut self) {
        self.items.clear();
        self.by_technology.clear();
        self.by_file.clear();
        self.by_source.clear();
        self.by_type.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackscan_core::types::evidence::{EvidenceSource, EvidenceType};

    fn import_evidence(name: &str, file: &str, line: u32) -> Evidence {
        let mut e = Evidence::new(name, EvidenceType::ImportStatement, EvidenceSource::ImportAnalyzer);
        e.file_path = Some(file.to_string());
        e.line_number = Some(line);
        e.confidence = 80.0;
        e
    }

    #[test]
    fn test_add_and_query() {
        let mut store = EvidenceStore::new();
        assert!(store.add_evidence(import_evidence("react", "src/a.tsx", 1)));
        assert!(store.add_evidence(import_evidence("react", "src/b.tsx", 1)));
        assert!(store.add_evidence(import_evidence("lodash", "src/a.tsx", 2)));

        assert_eq!(store.total_evidence_count(), 3);
        assert_eq!(store.evidence_for_technology("react").len(), 2);
        assert_eq!(store.evidence_for_file("src/a.tsx").len(), 2);
        assert!(store.technologies_with_evidence().contains("lodash"));
        assert!(store.evidence_for_technology("vue").is_empty());
    }

    #[test]
    fn test_duplicate_rejected_silently() {
        let mut store = EvidenceStore::new();
        let e = import_evidence("react", "src/a.tsx", 1);
        assert!(store.add_evidence(e.clone()));
        assert!(!store.add_evidence(e));
        assert_eq!(store.total_evidence_count(), 1);
        assert_eq!(store.evidence_for_technology("react").len(), 1);
    }

    #[test]
    fn test_file_index_skips_unanchored_evidence() {
        let mut store = EvidenceStore::new();
        let e = Evidence::new("react", EvidenceType::ManifestEntry, EvidenceSource::ManifestParser);
        store.add_evidence(e);
        assert_eq!(store.total_evidence_count(), 1);
        assert!(store.evidence_for_file("").is_empty());
    }

    #[test]
    fn test_summary_top_technologies_ordered() {
        let mut store = EvidenceStore::new();
        for i in 0..5 {
            store.add_evidence(import_evidence("react", "src/a.tsx", i));
        }
        for i in 0..2 {
            store.add_evidence(import_evidence("lodash", "src/a.tsx", 100 + i));
        }
        let summary = store.summary();
        assert_eq!(summary.total_evidence, 7);
        assert_eq!(summary.unique_technologies, 2);
        assert_eq!(summary.top_technologies[0], ("react".to_string(), 5));
        assert_eq!(summary.evidence_by_type["import_statement"], 7);
    }

    #[test]
    fn test_clear() {
        let mut store = EvidenceStore::new();
        let e = import_evidence("react", "src/a.tsx", 1);
        store.add_evidence(e.clone());
        store.clear();
        assert_eq!(store.total_evidence_count(), 0);
        // The fingerprint set is cleared too, so re-adding succeeds.
        assert!(store.add_evidence(e));
    }

    #[test]
    #[should_panic(expected = "technology name")]
    fn test_empty_name_is_contract_violation() {
        let mut store = EvidenceStore::new();
        store.add_evidence(Evidence::new("", EvidenceType::Unknown, EvidenceSource::Unknown));
    }
}
