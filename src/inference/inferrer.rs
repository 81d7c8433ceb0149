//! Structure inference over a batch of samples

use indexmap::IndexMap;
use tracing::debug;

use super::config::InferenceConfig;
use super::error::InferenceResult;
use super::explanation::Explanation;
use super::mapping::guess_flattened_mapping;
use super::stats::FieldStatsCalculator;
use super::timestamp::detect_timestamp_field;
use super::types::{
    DetectedTimestamp, FieldMapping, FieldStats, FieldType, MappingsAndStats,
};
use super::value::{Sample, Value, flatten_values};

/// Structure inference engine
///
/// Stateless apart from its configuration; every call works on the batch it
/// is given.
#[derive(Debug, Clone, Default)]
pub struct StructureInferrer {
    config: InferenceConfig,
}

impl StructureInferrer {
    /// Create a new inferrer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new inferrer with custom configuration
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Find the field holding a consistently formatted timestamp
    ///
    /// Honours [`InferenceConfig::timestamp_field`] when set.
    pub fn guess_timestamp_field(
        &self,
        explanation: &mut Explanation,
        samples: &[Sample],
    ) -> Option<DetectedTimestamp> {
        detect_timestamp_field(
            explanation,
            samples,
            self.config.timestamp_field.as_deref(),
        )
    }

    /// Infer the mapping of a single field
    pub fn guess_mapping(
        &self,
        explanation: &mut Explanation,
        field_name: &str,
        values: &[Value],
    ) -> InferenceResult<Option<FieldMapping>> {
        let flattened = flatten_values(values);
        guess_flattened_mapping(explanation, field_name, &flattened, &self.config)
    }

    /// Infer the mapping of a single field and, unless it is an object, its statistics
    pub fn guess_mapping_and_calculate_field_stats(
        &self,
        explanation: &mut Explanation,
        field_name: &str,
        values: &[Value],
    ) -> InferenceResult<Option<(FieldMapping, Option<FieldStats>)>> {
        let flattened = flatten_values(values);
        self.analyze_field(explanation, field_name, &flattened)
    }

    /// Infer mappings and statistics for every field of a batch
    ///
    /// Fields with no non-null value in any sample are omitted. An object
    /// field mixed with scalars in any sample fails the whole batch.
    pub fn guess_mappings_and_calculate_field_stats(
        &self,
        explanation: &mut Explanation,
        samples: &[Sample],
    ) -> InferenceResult<MappingsAndStats> {
        debug!(samples = samples.len(), "Guessing mappings and field stats");

        // Field name -> values across samples, in first-seen field order
        let mut values_by_field: IndexMap<&str, Vec<&Value>> = IndexMap::new();
        for sample in samples {
            for (field_name, value) in sample {
                values_by_field
                    .entry(field_name.as_str())
                    .or_default()
                    .push(value);
            }
        }

        let mut result = MappingsAndStats::default();
        for (field_name, values) in values_by_field {
            let flattened = flatten_values(values);
            let Some((mapping, stats)) = self.analyze_field(explanation, field_name, &flattened)?
            else {
                continue;
            };
            result
                .field_mappings
                .insert(field_name.to_string(), mapping);
            if let Some(stats) = stats {
                result.field_stats.insert(field_name.to_string(), stats);
            }
        }

        debug!(
            fields = result.field_mappings.len(),
            with_stats = result.field_stats.len(),
            "Mappings and field stats guessed"
        );
        Ok(result)
    }

    fn analyze_field(
        &self,
        explanation: &mut Explanation,
        field_name: &str,
        values: &[&Value],
    ) -> InferenceResult<Option<(FieldMapping, Option<FieldStats>)>> {
        let Some(mapping) = guess_flattened_mapping(explanation, field_name, values, &self.config)?
        else {
            return Ok(None);
        };
        let stats = (mapping.field_type != FieldType::Object)
            .then(|| FieldStatsCalculator::new(&self.config).calculate(values));
        Ok(Some((mapping, stats)))
    }
}

/// Infer mappings and statistics for every field using default configuration
pub fn guess_mappings_and_calculate_field_stats(
    explanation: &mut Explanation,
    samples: &[Sample],
) -> InferenceResult<MappingsAndStats> {
    StructureInferrer::new().guess_mappings_and_calculate_field_stats(explanation, samples)
}

/// Infer one field's mapping and statistics using default configuration
pub fn guess_mapping_and_calculate_field_stats(
    explanation: &mut Explanation,
    field_name: &str,
    values: &[Value],
) -> InferenceResult<Option<(FieldMapping, Option<FieldStats>)>> {
    StructureInferrer::new().guess_mapping_and_calculate_field_stats(
        explanation,
        field_name,
        values,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::error::InferenceError;
    use crate::inference::value::sample_from_json;

    #[test]
    fn test_object_field_has_no_stats() {
        let samples = vec![
            sample_from_json(r#"{"nested": {"a": 1}, "level": "INFO"}"#).unwrap(),
            sample_from_json(r#"{"nested": {"a": 2}, "level": "WARN"}"#).unwrap(),
        ];
        let result = guess_mappings_and_calculate_field_stats(&mut Explanation::new(), &samples)
            .unwrap();
        assert_eq!(
            result.field_mappings["nested"],
            FieldMapping::new(FieldType::Object)
        );
        assert!(!result.field_stats.contains_key("nested"));
        assert_eq!(result.field_stats["level"].cardinality, 2);
    }

    #[test]
    fn test_conflict_aborts_batch() {
        let samples = vec![
            sample_from_json(r#"{"ok": 1, "nested": {"a": 1}}"#).unwrap(),
            sample_from_json(r#"{"ok": 2, "nested": "flat"}"#).unwrap(),
        ];
        let err = guess_mappings_and_calculate_field_stats(&mut Explanation::new(), &samples)
            .unwrap_err();
        assert_eq!(err, InferenceError::mixed_object_field("nested"));
    }

    #[test]
    fn test_configured_top_hits_limit() {
        let config = InferenceConfig::builder().top_hits_limit(1).build();
        let inferrer = StructureInferrer::with_config(config);
        let values = vec![Value::from("a"), Value::from("b"), Value::from("b")];
        let (mapping, stats) = inferrer
            .guess_mapping_and_calculate_field_stats(&mut Explanation::new(), "f", &values)
            .unwrap()
            .unwrap();
        assert_eq!(mapping.field_type, FieldType::Keyword);
        let stats = stats.unwrap();
        assert_eq!(stats.top_hits.len(), 1);
        assert_eq!(stats.top_hits[0].value, Value::from("b"));
    }

    #[test]
    fn test_configured_timestamp_field() {
        let samples = vec![
            sample_from_json(r#"{"start": "2018-05-24 17:28:31", "end": "2018-05-24 17:28:35"}"#)
                .unwrap(),
            sample_from_json(r#"{"start": "2018-05-24 17:29:01", "end": "2018-05-24 17:29:02"}"#)
                .unwrap(),
        ];
        assert!(
            StructureInferrer::new()
                .guess_timestamp_field(&mut Explanation::new(), &samples)
                .is_none()
        );

        let inferrer =
            StructureInferrer::with_config(InferenceConfig::builder().timestamp_field("end").build());
        let detected = inferrer
            .guess_timestamp_field(&mut Explanation::new(), &samples)
            .unwrap();
        assert_eq!(detected.field_name, "end");
    }
}
