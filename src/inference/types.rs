//! Inference result types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Storage type inferred for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Short categorical string, matched exactly
    Keyword,
    /// Free-form string, analyzed for full-text search
    Text,
    Long,
    Double,
    Date,
    Ip,
    Boolean,
    /// Nested record
    Object,
}

impl FieldType {
    /// Get the mapping type name
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Keyword => "keyword",
            FieldType::Text => "text",
            FieldType::Long => "long",
            FieldType::Double => "double",
            FieldType::Date => "date",
            FieldType::Ip => "ip",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Long | FieldType::Double)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Mapping inferred for a field
///
/// `format` is only ever set for [`FieldType::Date`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldMapping {
    /// Create a mapping without a format
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            format: None,
        }
    }

    /// Create a date mapping with the given date format
    pub fn date(format: impl Into<String>) -> Self {
        Self {
            field_type: FieldType::Date,
            format: Some(format.into()),
        }
    }
}

/// A frequent value and how often it occurred
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopHit {
    pub value: Value,
    pub count: usize,
}

/// Summary statistics for one field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Number of non-null values
    pub count: usize,
    /// Number of distinct values
    pub cardinality: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_value: Option<f64>,
    /// Most frequent values, most frequent first
    pub top_hits: Vec<TopHit>,
}

impl FieldStats {
    pub fn is_numeric(&self) -> bool {
        self.mean_value.is_some()
    }
}

/// Timestamp format detected consistently across samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampMatch {
    /// Grok pattern that extracts the timestamp
    pub grok_pattern_name: String,
    /// Date format renderings, in the order they were first seen
    pub date_formats: Vec<String>,
    /// Whether every sample's timestamp carried a zone or UTC offset
    pub has_timezone: bool,
}

/// The timestamp field of a sample batch and its format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedTimestamp {
    pub field_name: String,
    pub timestamp_match: TimestampMatch,
}

/// Per-field mappings and statistics for a batch, ordered by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingsAndStats {
    pub field_mappings: BTreeMap<String, FieldMapping>,
    pub field_stats: BTreeMap<String, FieldStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_serialization() {
        let keyword = FieldMapping::new(FieldType::Keyword);
        assert_eq!(
            serde_json::to_value(&keyword).unwrap(),
            serde_json::json!({"type": "keyword"})
        );

        let date = FieldMapping::date("YYYY-MM-dd HH:mm:ss,SSS");
        assert_eq!(
            serde_json::to_value(&date).unwrap(),
            serde_json::json!({"type": "date", "format": "YYYY-MM-dd HH:mm:ss,SSS"})
        );
    }

    #[test]
    fn test_field_stats_serialization_omits_numeric_keys() {
        let stats = FieldStats {
            count: 1,
            cardinality: 1,
            top_hits: vec![TopHit {
                value: Value::from("x"),
                count: 1,
            }],
            ..FieldStats::default()
        };
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            serde_json::json!({
                "count": 1,
                "cardinality": 1,
                "top_hits": [{"value": "x", "count": 1}]
            })
        );
        assert!(!stats.is_numeric());
    }

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::Ip.to_string(), "ip");
        assert!(FieldType::Double.is_numeric());
        assert!(!FieldType::Date.is_numeric());
    }
}
