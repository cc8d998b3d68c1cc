//! Filter models
//!
//! A [`FilterSpec`] is the content of an exclude filter as we want it to be;
//! an [`ExistingFilter`] is a spec that the provider already stores under a
//! remote identifier.

use serde::{Deserialize, Serialize};

/// Default traffic-source field the exclude filters match against
pub const DEFAULT_FIELD: &str = "CAMPAIGN_SOURCE";

/// Filter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    /// Exclude matching traffic
    #[default]
    Exclude,
    /// Include only matching traffic
    Include,
}

/// How the expression is matched against the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    /// Regular expression match
    #[default]
    Matches,
    /// Exact string match
    Equal,
    /// Prefix match
    BeginsWith,
    /// Suffix match
    EndsWith,
    /// Substring match
    Contains,
}

/// Expression part of an exclude filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExcludeDetails {
    /// Field the expression is applied to
    pub field: String,
    /// Match type
    pub match_type: MatchType,
    /// Expression (an alternation of escaped domain names)
    pub expression_value: String,
    /// Whether matching is case sensitive
    pub case_sensitive: bool,
}

/// Desired content of a filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Filter name; the join key during reconciliation
    pub name: String,
    /// Filter type
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    /// Expression details
    pub details: ExcludeDetails,
}

impl FilterSpec {
    /// Create a case-insensitive regex exclude filter
    pub fn exclude(
        name: impl Into<String>,
        field: impl Into<String>,
        expression_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            filter_type: FilterType::Exclude,
            details: ExcludeDetails {
                field: field.into(),
                match_type: MatchType::Matches,
                expression_value: expression_value.into(),
                case_sensitive: false,
            },
        }
    }

    /// Check whether two specs carry the same content
    ///
    /// Compares type, name and every exclude detail.
    pub fn same_content(&self, other: &FilterSpec) -> bool {
        self == other
    }
}

/// A filter stored by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingFilter {
    /// Identifier assigned by the provider
    pub id: String,
    /// Stored content
    #[serde(flatten)]
    pub spec: FilterSpec,
}

impl ExistingFilter {
    /// Create from an identifier and content
    pub fn new(id: impl Into<String>, spec: FilterSpec) -> Self {
        Self {
            id: id.into(),
            spec,
        }
    }

    /// Filter name
    pub fn name(&self) -> &str {
        &self.spec.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_defaults() {
        let spec = FilterSpec::exclude("f", DEFAULT_FIELD, r"spam\.com");
        assert_eq!(spec.filter_type, FilterType::Exclude);
        assert_eq!(spec.details.match_type, MatchType::Matches);
        assert!(!spec.details.case_sensitive);
    }

    #[test]
    fn test_same_content_compares_details() {
        let a = FilterSpec::exclude("f", DEFAULT_FIELD, r"a\.com");
        let mut b = a.clone();
        assert!(a.same_content(&b));

        b.details.case_sensitive = true;
        assert!(!a.same_content(&b));
    }

    #[test]
    fn test_serialized_shape() {
        let filter = ExistingFilter::new("42", FilterSpec::exclude("f", DEFAULT_FIELD, "x"));
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["type"], "EXCLUDE");
        assert_eq!(json["details"]["match_type"], "MATCHES");
    }
}
