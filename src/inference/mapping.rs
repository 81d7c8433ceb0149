//! Field type inference
//!
//! A field's storage type is decided by an ordered list of scalar rules over
//! its flattened, non-null values. The first rule that accepts every value
//! wins; a field no rule accepts is a keyword.

use std::net::IpAddr;

use tracing::debug;

use super::config::InferenceConfig;
use super::error::{InferenceError, InferenceResult};
use super::explanation::Explanation;
use super::formats::full_match_value;
use super::types::{FieldMapping, FieldType};
use super::value::{Value, flatten_values};

type ScalarRule = fn(&[&Value], &InferenceConfig) -> Option<FieldMapping>;

/// Scalar classification rules, in priority order
const SCALAR_RULES: &[(&str, ScalarRule)] = &[
    ("boolean", boolean_rule),
    ("numeric", numeric_rule),
    ("ip", ip_rule),
    ("date", date_rule),
    ("text", text_rule),
];

/// Infer the mapping of one field from its values using default thresholds
///
/// Arrays are flattened and nulls dropped first. Returns `Ok(None)` when no
/// values remain, and an error when objects are mixed with other values.
pub fn guess_mapping(
    explanation: &mut Explanation,
    field_name: &str,
    values: &[Value],
) -> InferenceResult<Option<FieldMapping>> {
    let flattened = flatten_values(values);
    guess_flattened_mapping(
        explanation,
        field_name,
        &flattened,
        &InferenceConfig::default(),
    )
}

/// Infer a mapping from values already flattened and stripped of nulls
pub(crate) fn guess_flattened_mapping(
    explanation: &mut Explanation,
    field_name: &str,
    values: &[&Value],
    config: &InferenceConfig,
) -> InferenceResult<Option<FieldMapping>> {
    if values.is_empty() {
        explanation.push(format!(
            "Field [{field_name}] has no non-null values so cannot be mapped"
        ));
        return Ok(None);
    }

    let objects = values.iter().filter(|value| value.is_object()).count();
    if objects > 0 {
        if objects < values.len() {
            return Err(InferenceError::mixed_object_field(field_name));
        }
        explanation.push(format!("Field [{field_name}] holds nested objects"));
        return Ok(Some(FieldMapping::new(FieldType::Object)));
    }

    for (rule_name, rule) in SCALAR_RULES {
        if let Some(mapping) = rule(values, config) {
            debug!(field = field_name, rule = rule_name, mapping = %mapping.field_type, "Field mapped");
            explanation.push(describe(field_name, &mapping));
            return Ok(Some(mapping));
        }
    }

    let mapping = FieldMapping::new(FieldType::Keyword);
    explanation.push(describe(field_name, &mapping));
    Ok(Some(mapping))
}

fn describe(field_name: &str, mapping: &FieldMapping) -> String {
    match &mapping.format {
        Some(format) => format!(
            "Guessing mapping for field [{field_name}] is [{}] with format [{format}]",
            mapping.field_type
        ),
        None => format!(
            "Guessing mapping for field [{field_name}] is [{}]",
            mapping.field_type
        ),
    }
}

/// Whether a string reads like free text rather than a categorical value
///
/// True for strings longer than `keyword_max_len` characters or with at
/// least `keyword_max_spaces` whitespace characters. A space limit of zero
/// is treated as one, as the builder does.
pub fn is_more_likely_text_than_keyword(s: &str, config: &InferenceConfig) -> bool {
    s.chars().count() > config.keyword_max_len
        || s.chars().filter(|c| c.is_whitespace()).count() >= config.keyword_max_spaces.max(1)
}

fn boolean_rule(values: &[&Value], _config: &InferenceConfig) -> Option<FieldMapping> {
    values
        .iter()
        .all(|value| match value {
            Value::Bool(_) => true,
            Value::String(s) => s == "true" || s == "false",
            _ => false,
        })
        .then(|| FieldMapping::new(FieldType::Boolean))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum NumberKind {
    Whole,
    Fractional,
}

fn number_kind(value: &Value) -> Option<NumberKind> {
    match value {
        Value::Integer(_) => Some(NumberKind::Whole),
        Value::Float(n) => n.is_finite().then_some(NumberKind::Fractional),
        Value::String(s) if s.parse::<i64>().is_ok() => Some(NumberKind::Whole),
        Value::String(s) => s
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(|_| NumberKind::Fractional),
        _ => None,
    }
}

fn numeric_rule(values: &[&Value], _config: &InferenceConfig) -> Option<FieldMapping> {
    let mut widest = NumberKind::Whole;
    for value in values {
        widest = widest.max(number_kind(value)?);
    }
    Some(FieldMapping::new(match widest {
        NumberKind::Whole => FieldType::Long,
        NumberKind::Fractional => FieldType::Double,
    }))
}

fn ip_rule(values: &[&Value], _config: &InferenceConfig) -> Option<FieldMapping> {
    values
        .iter()
        .all(|value| value.as_str().is_some_and(|s| s.parse::<IpAddr>().is_ok()))
        .then(|| FieldMapping::new(FieldType::Ip))
}

fn date_rule(values: &[&Value], _config: &InferenceConfig) -> Option<FieldMapping> {
    let (first, rest) = values.split_first()?;
    let family = full_match_value(first)?.format;
    rest.iter()
        .all(|value| {
            full_match_value(value).is_some_and(|found| found.format.index() == family.index())
        })
        .then(|| FieldMapping::date(family.date_formats()[0]))
}

fn text_rule(values: &[&Value], config: &InferenceConfig) -> Option<FieldMapping> {
    values
        .iter()
        .filter_map(|value| value.as_text())
        .any(|s| is_more_likely_text_than_keyword(&s, config))
        .then(|| FieldMapping::new(FieldType::Text))
}
