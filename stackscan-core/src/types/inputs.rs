//! Collaborator input types.
//!
//! These are the plain-data contracts by which manifest parsing, import
//! analysis, signature detection, and AI detection hand observations to the
//! pipeline. The collaborators themselves (file traversal, parsers, model
//! calls) live outside this workspace.

use serde::{Deserialize, Serialize};

/// A dependency declared in a package manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// Dependency name as declared.
    pub name: String,
    /// Version specification, if declared.
    pub version: Option<String>,
    /// Manifest file the dependency was found in.
    pub source: String,
}

/// Classification of an import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportCategory {
    /// Language standard library — never evidence of a third-party technology.
    StandardLibrary,
    /// Third-party package.
    ThirdParty,
    /// Relative/project-internal import.
    Relative,
    Unknown,
}

impl ImportCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StandardLibrary => "standard_library",
            Self::ThirdParty => "third_party",
            Self::Relative => "relative",
            Self::Unknown => "unknown",
        }
    }
}

/// An import statement observed in a source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportInfo {
    /// Import path as written.
    pub path: String,
    /// Line number of the statement.
    pub line: u32,
    /// Standard library / third-party / relative.
    pub category: ImportCategory,
    /// Normalized package name.
    pub package_name: String,
    /// File containing the import.
    pub file_path: String,
}

/// A framework signature match from pattern detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureMatch {
    /// Framework the signature belongs to.
    pub framework: String,
    /// Name of the matched signature.
    pub signature_name: String,
    /// File the match was found in.
    pub file_path: String,
    /// Line of the match, when known.
    pub line_number: Option<u32>,
    /// Surrounding source context.
    pub context: Option<String>,
    /// Match confidence (0.0-1.0).
    pub confidence: f64,
    /// Signature category label.
    pub category: String,
}

/// One supporting item inside an AI detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiEvidenceItem {
    pub snippet: Option<String>,
    pub line_number: Option<u32>,
    pub details: Option<String>,
}

/// A technology detection produced by an AI model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiDetection {
    /// Detected technology name.
    pub name: String,
    /// File the detection refers to.
    pub file_path: String,
    /// Model-reported confidence (0-100).
    pub confidence: f64,
    /// Summary details when no per-item evidence is given.
    pub details: Option<String>,
    /// Per-item supporting evidence; may be empty.
    #[serde(default)]
    pub evidence: Vec<AiEvidenceItem>,
}
