//! Intake adapters — convert collaborator outputs into evidence.
//!
//! Each collector applies the fixed mapping for its source (type, source,
//! confidence) and feeds the store; duplicates are dropped by the store's
//! fingerprint check, so the returned counts reflect items actually added.

use stackscan_core::types::evidence::{Evidence, EvidenceSource, EvidenceType};
use stackscan_core::types::inputs::{
    AiDetection, Dependency, ImportCategory, ImportInfo, SignatureMatch,
};
use stackscan_core::FxHashMap;

use super::store::EvidenceStore;

/// Build evidence from a manifest dependency (confidence 90).
pub fn from_dependency(dependency: &Dependency) -> Evidence {
    let mut e = Evidence::new(
        dependency.name.clone(),
        EvidenceType::ManifestEntry,
        EvidenceSource::ManifestParser,
    );
    e.file_path = Some(dependency.source.clone());
    e.details = dependency
        .version
        .as_ref()
        .filter(|v| !v.is_empty())
        .map(|v| format!("Version: {v}"));
    e.confidence = 90.0;
    e
}

/// Build evidence from an import statement (confidence 80).
pub fn from_import(import: &ImportInfo, technology_name: &str) -> Evidence {
    let mut e = Evidence::new(
        technology_name,
        EvidenceType::ImportStatement,
        EvidenceSource::ImportAnalyzer,
    );
    e.file_path = Some(import.file_path.clone());
    e.line_number = Some(import.line);
    e.snippet = Some(import.path.clone());
    e.details = Some(format!("Import category: {}", import.category.name()));
    e.confidence = 80.0;
    e
}

/// Build evidence from a framework signature match (confidence scaled to 0-100).
pub fn from_signature_match(m: &SignatureMatch) -> Evidence {
    let mut e = Evidence::new(
        m.framework.clone(),
        EvidenceType::FrameworkPattern,
        EvidenceSource::PatternMatching,
    );
    e.file_path = Some(m.file_path.clone());
    e.line_number = m.line_number;
    e.snippet = m.context.clone();
    e.details = Some(format!("Signature: {}, Category: {}", m.signature_name, m.category));
    e.confidence = (m.confidence * 100.0).clamp(0.0, 100.0);
    e
}

impl EvidenceStore {
    /// Collect evidence from manifest dependencies.
    /// Returns the number of items actually added.
    pub fn collect_from_dependencies(&mut self, dependencies: &[Dependency]) -> usize {
        let mut added = 0;
        for dependency in dependencies {
            if self.add_evidence(from_dependency(dependency)) {
                added += 1;
            }
        }
        tracing::info!(
            added,
            dependencies = dependencies.len(),
            "collected evidence from dependencies"
        );
        added
    }

    /// Collect evidence from import statements.
    ///
    /// Relative and standard-library imports are skipped — they never
    /// indicate a third-party technology. The import path is mapped to a
    /// technology name via `package_mapping`, falling back to the import's
    /// normalized package name.
    pub fn collect_from_imports(
        &mut self,
        imports: &[ImportInfo],
        package_mapping: &FxHashMap<String, String>,
    ) -> usize {
        let mut added = 0;
        for import in imports {
            if matches!(
                import.category,
                ImportCategory::Relative | ImportCategory::StandardLibrary
            ) {
                continue;
            }
            let technology_name = package_mapping
                .get(&import.path)
                .cloned()
                .unwrap_or_else(|| import.package_name.clone());
            if self.add_evidence(from_import(import, &technology_name)) {
                added += 1;
            }
        }
        tracing::info!(added, "collected evidence from imports");
        added
    }

    /// Collect evidence from framework signature matches.
    pub fn collect_from_signature_matches(&mut self, matches: &[SignatureMatch]) -> usize {
        let mut added = 0;
        for m in matches {
            if self.add_evidence(from_signature_match(m)) {
                added += 1;
            }
        }
        tracing::info!(added, "collected evidence from signature matches");
        added
    }

    /// Collect evidence from AI model detections.
    ///
    /// Each nested evidence item becomes its own evidence record; a detection
    /// with no items contributes one summary record.
    pub fn collect_from_ai_detections(&mut self, detections: &[AiDetection]) -> usize {
        let mut added = 0;
        for detection in detections {
            if detection.name.is_empty() {
                continue;
            }
            if detection.evidence.is_empty() {
                let mut e = Evidence::new(
                    detection.name.clone(),
                    EvidenceType::AiDetection,
                    EvidenceSource::AiModel,
                );
                e.file_path = Some(detection.file_path.clone());
                e.details = detection.details.clone();
                e.confidence = detection.confidence.clamp(0.0, 100.0);
                if self.add_evidence(e) {
                    added += 1;
                }
                continue;
            }
            for item in &detection.evidence {
                let mut e = Evidence::new(
                    detection.name.clone(),
                    EvidenceType::AiDetection,
                    EvidenceSource::AiModel,
                );
                e.file_path = Some(detection.file_path.clone());
                e.line_number = item.line_number;
                e.snippet = item.snippet.clone();
                e.details = item.details.clone();
                e.confidence = detection.confidence.clamp(0.0, 100.0);
                if self.add_evidence(e) {
                    added += 1;
                }
            }
        }
        tracing::info!(added, "collected evidence from AI detections");
        added
    }
}
