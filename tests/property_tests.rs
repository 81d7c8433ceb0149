//! Property-based tests for log structure inference.
//!
//! Batches are generated with a consistent `time` field plus a handful of
//! loosely typed fields (nulls, booleans, small integers, floats, short
//! strings, missing entries). Properties checked:
//! - every operation is idempotent
//! - results do not depend on sample order
//! - integer fields map to long, and one fractional value promotes to double
//! - nested arrays infer the same as their flattened elements

use log_structure_finder::inference::{
    Explanation, FieldStats, FieldType, MappingsAndStats, Sample, StructureInferrer, TopHit,
    Value, guess_mapping, guess_mappings_and_calculate_field_stats, guess_timestamp_field,
};
use proptest::prelude::*;

fn timestamp_strategy() -> impl Strategy<Value = String> {
    (
        2000u32..2030,
        1u32..=12,
        1u32..=28,
        0u32..24,
        0u32..60,
        0u32..60,
        0u32..1000,
    )
        .prop_map(|(y, mo, d, h, mi, s, ms)| {
            format!("{y}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02},{ms:03}")
        })
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-100_000i64..100_000).prop_map(Value::Integer),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-z]{1,6}( [a-z]{1,6}){0,6}".prop_map(Value::String),
        prop::collection::vec((-50i64..50).prop_map(Value::Integer), 0..3).prop_map(Value::Array),
    ]
}

fn sample_strategy() -> impl Strategy<Value = Sample> {
    (
        timestamp_strategy(),
        prop::collection::vec(prop::option::of(scalar_strategy()), 3),
    )
        .prop_map(|(time, others)| {
            let mut sample = Sample::new();
            sample.insert("time".to_string(), Value::String(time));
            for (name, value) in ["alpha", "beta", "gamma"].iter().zip(others) {
                if let Some(value) = value {
                    sample.insert(name.to_string(), value);
                }
            }
            sample
        })
}

fn batch_strategy() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec(sample_strategy(), 1..12)
}

/// Top hits by rendering in a canonical order
///
/// Ties follow first occurrence, and values sharing a rendering (`5` and
/// `"5"`) report whichever came first.
fn canonical_top_hits(stats: &FieldStats) -> Vec<(String, usize)> {
    let mut hits: Vec<(String, usize)> = stats
        .top_hits
        .iter()
        .map(|TopHit { value, count }| {
            (value.as_text().unwrap_or_default().into_owned(), *count)
        })
        .collect();
    hits.sort();
    hits
}

fn assert_same_stats(a: &MappingsAndStats, b: &MappingsAndStats) -> Result<(), TestCaseError> {
    prop_assert_eq!(&a.field_mappings, &b.field_mappings);
    prop_assert_eq!(
        a.field_stats.keys().collect::<Vec<_>>(),
        b.field_stats.keys().collect::<Vec<_>>()
    );
    for (field, left) in &a.field_stats {
        let right = &b.field_stats[field];
        prop_assert_eq!(left.count, right.count);
        prop_assert_eq!(left.cardinality, right.cardinality);
        prop_assert_eq!(left.min_value, right.min_value);
        prop_assert_eq!(left.max_value, right.max_value);
        prop_assert_eq!(left.mean_value, right.mean_value);
        prop_assert_eq!(left.median_value, right.median_value);
        // Truncation can cut a tie differently, so only compare complete lists
        if left.cardinality <= left.top_hits.len() {
            prop_assert_eq!(canonical_top_hits(left), canonical_top_hits(right));
        }
    }
    Ok(())
}

proptest! {
    /// The time field is always found, whatever the other fields hold
    #[test]
    fn test_timestamp_field_found(batch in batch_strategy()) {
        let detected = guess_timestamp_field(&mut Explanation::new(), &batch).unwrap();
        prop_assert_eq!(detected.field_name, "time");
        prop_assert_eq!(
            detected.timestamp_match.date_formats,
            vec!["YYYY-MM-dd HH:mm:ss,SSS".to_string()]
        );
    }

    #[test]
    fn test_timestamp_detection_order_insensitive(batch in batch_strategy()) {
        let forward = guess_timestamp_field(&mut Explanation::new(), &batch);
        let mut reversed = batch.clone();
        reversed.reverse();
        let backward = guess_timestamp_field(&mut Explanation::new(), &reversed);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn test_analysis_idempotent(batch in batch_strategy()) {
        let inferrer = StructureInferrer::new();
        let first = inferrer
            .guess_mappings_and_calculate_field_stats(&mut Explanation::new(), &batch)
            .unwrap();
        let second = inferrer
            .guess_mappings_and_calculate_field_stats(&mut Explanation::new(), &batch)
            .unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_analysis_order_insensitive(batch in batch_strategy()) {
        let forward = guess_mappings_and_calculate_field_stats(&mut Explanation::new(), &batch)
            .unwrap();
        let mut reversed = batch.clone();
        reversed.reverse();
        let backward = guess_mappings_and_calculate_field_stats(&mut Explanation::new(), &reversed)
            .unwrap();
        assert_same_stats(&forward, &backward)?;
        prop_assert_eq!(
            forward.field_mappings.get("time").map(|m| m.field_type),
            Some(FieldType::Date)
        );
    }

    /// Whole numbers map to long until one fractional value forces double
    #[test]
    fn test_numeric_promotion(
        whole in prop::collection::vec(any::<i64>(), 1..20),
        fraction in -1.0e9f64..1.0e9,
        position in any::<prop::sample::Index>(),
    ) {
        let mut values: Vec<Value> = whole.iter().copied().map(Value::Integer).collect();
        let mapping = guess_mapping(&mut Explanation::new(), "n", &values).unwrap().unwrap();
        prop_assert_eq!(mapping.field_type, FieldType::Long);

        let as_strings: Vec<Value> = whole.iter().map(|n| Value::String(n.to_string())).collect();
        let mapping = guess_mapping(&mut Explanation::new(), "n", &as_strings).unwrap().unwrap();
        prop_assert_eq!(mapping.field_type, FieldType::Long);

        values.insert(position.index(values.len() + 1), Value::Float(fraction));
        let mapping = guess_mapping(&mut Explanation::new(), "n", &values).unwrap().unwrap();
        prop_assert_eq!(mapping.field_type, FieldType::Double);
    }

    #[test]
    fn test_nested_arrays_flatten(
        items in prop::collection::vec(-1000i64..1000, 1..10),
        split in 0usize..10,
    ) {
        let split = split.min(items.len());
        let flat: Vec<Value> = items.iter().copied().map(Value::Integer).collect();
        let mut nested: Vec<Value> = flat[..split].to_vec();
        nested.push(Value::Array(vec![Value::Array(flat[split..].to_vec()), Value::Null]));

        let flat_mapping = guess_mapping(&mut Explanation::new(), "n", &flat).unwrap();
        let nested_mapping = guess_mapping(&mut Explanation::new(), "n", &nested).unwrap();
        prop_assert_eq!(flat_mapping, nested_mapping);
    }
}
