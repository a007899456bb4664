//! Built-in rule tables for mitigation and categorization.
//!
//! Tables are embedded at compile time via `include_str!` and compiled into
//! lookup structures on first use. A table that fails to compile is logged
//! and replaced with an empty one; analysis proceeds without its rules.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use stackscan_core::errors::TableError;
use stackscan_core::types::technology::TechnologyCategory;
use stackscan_core::FxHashMap;

const MITIGATION_TABLE: &str = include_str!("mitigation.toml");
const CATEGORIES_TABLE: &str = include_str!("categories.toml");

/// Validation rule for one high-false-positive technology.
#[derive(Debug, Clone, Deserialize)]
pub struct FalsePositiveRule {
    /// Whether evidence names must match the technology name exactly,
    /// including case.
    pub case_sensitive: bool,
    /// Minimum matching evidence items required to keep the technology.
    pub min_evidence: usize,
}

#[derive(Debug, Deserialize)]
struct RawMitigationTable {
    #[serde(default)]
    high_false_positive: FxHashMap<String, FalsePositiveRule>,
    #[serde(default)]
    ambiguous: FxHashMap<String, Vec<String>>,
}

/// Compiled mitigation rules.
#[derive(Debug, Default)]
pub struct MitigationRules {
    /// Lowercased technology name -> validation rule.
    pub high_false_positive: FxHashMap<String, FalsePositiveRule>,
    /// Lowercased generic name -> specific technologies it usually means.
    pub ambiguous: FxHashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawRelationship {
    parent: String,
    children: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawSuffixPattern {
    pattern: String,
    category: String,
}

#[derive(Debug, Deserialize)]
struct RawCategoryTable {
    #[serde(default)]
    categories: FxHashMap<String, String>,
    #[serde(default)]
    relationships: Vec<RawRelationship>,
    #[serde(default)]
    suffix_patterns: Vec<RawSuffixPattern>,
}

/// Compiled categorization rules.
#[derive(Debug, Default)]
pub struct CategoryRules {
    /// Lowercased technology name -> category.
    pub categories: FxHashMap<String, TechnologyCategory>,
    /// Parent -> children, in table order.
    pub relationships: Vec<(String, Vec<String>)>,
    /// Name-pattern fallbacks, checked in table order.
    pub suffix_patterns: Vec<(Regex, TechnologyCategory)>,
}

impl CategoryRules {
    /// The relationship parent of a technology, if the tables declare one.
    pub fn parent_of(&self, technology_name: &str) -> Option<&str> {
        self.relationships
            .iter()
            .find(|(_, children)| children.iter().any(|c| c == technology_name))
            .map(|(parent, _)| parent.as_str())
    }
}

/// Parse a category label from the tables into the category enum.
pub fn category_from_label(label: &str) -> Option<TechnologyCategory> {
    TechnologyCategory::ALL
        .iter()
        .copied()
        .find(|c| c.name() == label)
}

/// Parse and compile mitigation rules from a TOML string.
pub fn load_mitigation_rules(toml_str: &str) -> Result<MitigationRules, TableError> {
    let raw: RawMitigationTable = toml::from_str(toml_str).map_err(|e| TableError::Parse {
        table: "mitigation",
        message: e.to_string(),
    })?;

    Ok(MitigationRules {
        high_false_positive: raw
            .high_false_positive
            .into_iter()
            .map(|(name, rule)| (name.to_lowercase(), rule))
            .collect(),
        ambiguous: raw
            .ambiguous
            .into_iter()
            .map(|(name, candidates)| (name.to_lowercase(), candidates))
            .collect(),
    })
}

/// Parse and compile categorization rules from a TOML string.
pub fn load_category_rules(toml_str: &str) -> Result<CategoryRules, TableError> {
    let raw: RawCategoryTable = toml::from_str(toml_str).map_err(|e| TableError::Parse {
        table: "categories",
        message: e.to_string(),
    })?;

    let mut categories = FxHashMap::default();
    for (name, label) in raw.categories {
        let Some(category) = category_from_label(&label) else {
            return Err(TableError::Parse {
                table: "categories",
                message: format!("unknown category label '{label}' for '{name}'"),
            });
        };
        categories.insert(name.to_lowercase(), category);
    }

    let mut suffix_patterns = Vec::with_capacity(raw.suffix_patterns.len());
    for entry in raw.suffix_patterns {
        let regex = Regex::new(&entry.pattern).map_err(|e| TableError::InvalidPattern {
            pattern: entry.pattern.clone(),
            message: e.to_string(),
        })?;
        let Some(category) = category_from_label(&entry.category) else {
            return Err(TableError::Parse {
                table: "categories",
                message: format!("unknown category label '{}'", entry.category),
            });
        };
        suffix_patterns.push((regex, category));
    }

    Ok(CategoryRules {
        categories,
        relationships: raw
            .relationships
            .into_iter()
            .map(|r| (r.parent, r.children))
            .collect(),
        suffix_patterns,
    })
}

/// Built-in mitigation rules, compiled once.
pub fn mitigation_rules() -> &'static MitigationRules {
    static RULES: OnceLock<MitigationRules> = OnceLock::new();
    RULES.get_or_init(|| match load_mitigation_rules(MITIGATION_TABLE) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::error!(error = %e, "failed to compile built-in mitigation table");
            MitigationRules::default()
        }
    })
}

/// Built-in categorization rules, compiled once.
pub fn category_rules() -> &'static CategoryRules {
    static RULES: OnceLock<CategoryRules> = OnceLock::new();
    RULES.get_or_init(|| match load_category_rules(CATEGORIES_TABLE) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::error!(error = %e, "failed to compile built-in categories table");
            CategoryRules::default()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_mitigation_table_compiles() {
        let rules = load_mitigation_rules(MITIGATION_TABLE).unwrap();
        assert_eq!(rules.high_false_positive.len(), 15);
        assert_eq!(rules.ambiguous.len(), 5);

        let lodash = &rules.high_false_positive["lodash"];
        assert!(lodash.case_sensitive);
        assert_eq!(lodash.min_evidence, 3);

        let utils = &rules.high_false_positive["utils"];
        assert!(!utils.case_sensitive);
        assert_eq!(utils.min_evidence, 5);

        assert!(rules.ambiguous["router"].contains(&"react-router".to_string()));
    }

    #[test]
    fn test_builtin_category_table_compiles() {
        let rules = load_category_rules(CATEGORIES_TABLE).unwrap();
        assert_eq!(rules.categories["react"], TechnologyCategory::Framework);
        assert_eq!(rules.categories["python"], TechnologyCategory::Language);
        assert_eq!(rules.categories["jest"], TechnologyCategory::Testing);
        assert_eq!(rules.categories["postgresql"], TechnologyCategory::Database);
        assert_eq!(rules.relationships.len(), 9);
        assert_eq!(rules.suffix_patterns.len(), 11);
    }

    #[test]
    fn test_parent_lookup() {
        let rules = category_rules();
        assert_eq!(rules.parent_of("redux"), Some("react"));
        assert_eq!(rules.parent_of("boto3"), Some("aws"));
        assert_eq!(rules.parent_of("react"), None);
    }

    #[test]
    fn test_suffix_patterns_match() {
        let rules = category_rules();
        let categorize = |name: &str| {
            rules
                .suffix_patterns
                .iter()
                .find(|(re, _)| re.is_match(name))
                .map(|(_, c)| *c)
        };
        assert_eq!(categorize("acme-cli"), Some(TechnologyCategory::Tool));
        assert_eq!(categorize("acme-sdk"), Some(TechnologyCategory::Library));
        assert_eq!(categorize("acme"), None);
    }

    #[test]
    fn test_bad_table_reports_parse_error() {
        let err = load_mitigation_rules("high_false_positive = 3").unwrap_err();
        assert!(err.to_string().contains("mitigation"));
    }

    #[test]
    fn test_unknown_category_label_rejected() {
        let err = load_category_rules("[categories]\nfoo = \"not_a_category\"").unwrap_err();
        assert!(err.to_string().contains("not_a_category"));
    }
}
