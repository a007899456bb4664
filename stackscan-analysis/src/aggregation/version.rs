//! Version resolution from evidence.

use std::sync::OnceLock;

use regex::Regex;
use stackscan_core::types::evidence::{Evidence, EvidenceType};

fn manifest_version_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Version:\s*([\d\.]+)").ok()).as_ref()
}

fn numeric_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\d\.]+").ok()).as_ref()
}

/// Resolve a technology's version from its evidence.
///
/// Manifest details are the authoritative source; snippets (imports
/// occasionally pin a version) are a fallback signal. When sources disagree,
/// the most frequently seen version wins, first seen breaking ties.
pub fn resolve_version(evidence: &[Evidence]) -> Option<String> {
    let mut versions: Vec<String> = Vec::new();

    for e in evidence {
        if e.evidence_type == EvidenceType::ManifestEntry {
            if let Some(details) = e.details.as_deref() {
                if let Some(captures) = manifest_version_re().and_then(|re| re.captures(details)) {
                    versions.push(captures[1].to_string());
                }
            }
        }
        if let Some(snippet) = e.snippet.as_deref() {
            if let Some(m) = numeric_re().and_then(|re| re.find(snippet)) {
                versions.push(m.as_str().to_string());
            }
        }
    }

    if versions.is_empty() {
        return None;
    }

    // Frequency count preserving first-seen order for deterministic ties.
    let mut counts: Vec<(String, usize)> = Vec::new();
    for v in versions {
        match counts.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, count)) => *count += 1,
            None => counts.push((v, 1)),
        }
    }
    let mut best: Option<(String, usize)> = None;
    for (version, count) in counts {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((version, count));
        }
    }
    let (winner, _) = best?;

    if semver::Version::parse(&winner).is_err() {
        tracing::debug!(version = %winner, "resolved version is not valid semver");
    }
    Some(winner)
}
