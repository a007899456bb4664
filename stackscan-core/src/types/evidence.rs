//! Evidence — a single observed fact suggesting a technology is in use.
//!
//! Evidence types and sources are closed enums with exhaustive weight
//! tables, so a typo can never silently fall through to `Unknown`.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// What kind of observation the evidence is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceType {
    /// Import/require statement.
    ImportStatement,
    /// Entry in a package manifest.
    ManifestEntry,
    /// Framework-specific signature match.
    FrameworkPattern,
    /// Class definition.
    ClassDefinition,
    /// Function call.
    FunctionCall,
    /// Configuration entry.
    Configuration,
    /// File/directory structure.
    FileStructure,
    /// Usage of a declared dependency.
    DependencyUsage,
    /// Detection by an AI model.
    AiDetection,
    /// Unclassified observation.
    Unknown,
}

impl EvidenceType {
    /// All evidence types.
    pub const ALL: [EvidenceType; 10] = [
        Self::ImportStatement,
        Self::ManifestEntry,
        Self::FrameworkPattern,
        Self::ClassDefinition,
        Self::FunctionCall,
        Self::Configuration,
        Self::FileStructure,
        Self::DependencyUsage,
        Self::AiDetection,
        Self::Unknown,
    ];

    /// Weight of this evidence type in confidence scoring (higher = stronger).
    pub fn weight(&self) -> f64 {
        match self {
            Self::ImportStatement => 8.0,
            Self::ManifestEntry => 10.0,
            Self::FrameworkPattern => 7.0,
            Self::ClassDefinition => 7.0,
            Self::FunctionCall => 6.0,
            Self::Configuration => 9.0,
            Self::FileStructure => 5.0,
            Self::DependencyUsage => 8.0,
            Self::AiDetection => 6.0,
            Self::Unknown => 3.0,
        }
    }

    /// Stable label used in fingerprints and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ImportStatement => "import_statement",
            Self::ManifestEntry => "manifest_entry",
            Self::FrameworkPattern => "framework_pattern",
            Self::ClassDefinition => "class_definition",
            Self::FunctionCall => "function_call",
            Self::Configuration => "configuration",
            Self::FileStructure => "file_structure",
            Self::DependencyUsage => "dependency_usage",
            Self::AiDetection => "ai_detection",
            Self::Unknown => "unknown",
        }
    }
}

/// Which collaborator produced the evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceSource {
    /// Static code analysis.
    StaticAnalysis,
    /// Package manifest parser.
    ManifestParser,
    /// Import statement analyzer.
    ImportAnalyzer,
    /// Framework signature matching.
    PatternMatching,
    /// AI model detection.
    AiModel,
    /// User-provided information.
    UserProvided,
    /// Unclassified source.
    Unknown,
}

impl EvidenceSource {
    /// All evidence sources.
    pub const ALL: [EvidenceSource; 7] = [
        Self::StaticAnalysis,
        Self::ManifestParser,
        Self::ImportAnalyzer,
        Self::PatternMatching,
        Self::AiModel,
        Self::UserProvided,
        Self::Unknown,
    ];

    /// Weight of this source in confidence scoring (higher = more reliable).
    pub fn weight(&self) -> f64 {
        match self {
            Self::StaticAnalysis => 10.0,
            Self::ManifestParser => 10.0,
            Self::ImportAnalyzer => 9.0,
            Self::PatternMatching => 8.0,
            Self::AiModel => 7.0,
            Self::UserProvided => 9.0,
            Self::Unknown => 5.0,
        }
    }

    /// Stable label used in fingerprints and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StaticAnalysis => "static_analysis",
            Self::ManifestParser => "manifest_parser",
            Self::ImportAnalyzer => "import_analyzer",
            Self::PatternMatching => "pattern_matching",
            Self::AiModel => "ai_model",
            Self::UserProvided => "user_provided",
            Self::Unknown => "unknown",
        }
    }
}

/// Default per-item confidence when the originating collaborator supplies none.
pub const DEFAULT_EVIDENCE_CONFIDENCE: f64 = 50.0;

/// An immutable observation of technology usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Name of the technology, case as observed.
    pub technology_name: String,
    /// Kind of observation.
    pub evidence_type: EvidenceType,
    /// Collaborator that produced it.
    pub source: EvidenceSource,
    /// Path to the file containing the evidence, if file-anchored.
    pub file_path: Option<String>,
    /// Line number in the file.
    pub line_number: Option<u32>,
    /// Code snippet showing the evidence.
    pub snippet: Option<String>,
    /// Additional details.
    pub details: Option<String>,
    /// Per-item confidence (0-100).
    pub confidence: f64,
}

impl Evidence {
    /// Create evidence with the default per-item confidence.
    pub fn new(
        technology_name: impl Into<String>,
        evidence_type: EvidenceType,
        source: EvidenceSource,
    ) -> Self {
        Self {
            technology_name: technology_name.into(),
            evidence_type,
            source,
            file_path: None,
            line_number: None,
            snippet: None,
            details: None,
            confidence: DEFAULT_EVIDENCE_CONFIDENCE,
        }
    }

    /// Stable identity fingerprint for deduplication.
    ///
    /// Two evidence items with equal fingerprints are the same observation.
    /// Covers every identity-relevant field; the per-item confidence is
    /// deliberately excluded.
    pub fn fingerprint(&self) -> u64 {
        let key = format!(
            "{}:{}:{}:{}:{}:{}:{}",
            self.evidence_type.name(),
            self.source.name(),
            self.technology_name,
            self.file_path.as_deref().unwrap_or(""),
            self.line_number.unwrap_or(0),
            self.snippet.as_deref().unwrap_or(""),
            self.details.as_deref().unwrap_or(""),
        );
        xxh3_64(key.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_tables_in_documented_ranges() {
        for t in EvidenceType::ALL {
            assert!((3.0..=10.0).contains(&t.weight()), "{:?}", t);
        }
        for s in EvidenceSource::ALL {
            assert!((5.0..=10.0).contains(&s.weight()), "{:?}", s);
        }
    }

    #[test]
    fn test_manifest_outweighs_ai() {
        assert!(EvidenceType::ManifestEntry.weight() > EvidenceType::AiDetection.weight());
        assert!(EvidenceSource::ManifestParser.weight() > EvidenceSource::AiModel.weight());
    }

    #[test]
    fn test_fingerprint_stable_and_field_sensitive() {
        let a = Evidence::new("react", EvidenceType::ImportStatement, EvidenceSource::ImportAnalyzer);
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = a.clone();
        c.file_path = Some("src/app.tsx".to_string());
        assert_ne!(a.fingerprint(), c.fingerprint());

        let mut d = a.clone();
        d.line_number = Some(7);
        assert_ne!(a.fingerprint(), d.fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_confidence() {
        let a = Evidence::new("react", EvidenceType::ImportStatement, EvidenceSource::ImportAnalyzer);
        let mut b = a.clone();
        b.confidence = 95.0;
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
