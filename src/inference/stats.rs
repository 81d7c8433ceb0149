//! Per-field statistics

use indexmap::IndexMap;

use super::config::InferenceConfig;
use super::types::{FieldStats, TopHit};
use super::value::Value;

/// Computes [`FieldStats`] over a field's flattened, non-null values
#[derive(Debug, Clone)]
pub struct FieldStatsCalculator {
    top_hits_limit: usize,
}

impl Default for FieldStatsCalculator {
    fn default() -> Self {
        Self::new(&InferenceConfig::default())
    }
}

impl FieldStatsCalculator {
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            top_hits_limit: config.top_hits_limit.max(1),
        }
    }

    /// Calculate statistics
    ///
    /// When every value is numeric the values are grouped by numeric equality
    /// and min/max/mean/median are reported. Otherwise values are grouped by
    /// their textual rendering.
    pub fn calculate(&self, values: &[&Value]) -> FieldStats {
        if values.is_empty() {
            return FieldStats::default();
        }

        match numeric_values(values) {
            Some(numbers) => self.numeric_stats(numbers),
            None => self.textual_stats(values),
        }
    }

    fn numeric_stats(&self, numbers: Vec<Number>) -> FieldStats {
        // Whole numbers stay exact when no value in the field is fractional
        let whole: Option<Vec<i64>> = numbers.iter().map(|n| n.as_whole()).collect();

        let mut counts: IndexMap<NumberKey, (Number, usize)> = IndexMap::new();
        for &n in &numbers {
            counts.entry(n.key()).or_insert((n, 0)).1 += 1;
        }
        let (top_hits, cardinality) = self.top_hits(counts.into_values().map(|(n, count)| {
            let value = match (n, whole.is_some()) {
                (Number::Whole(i), true) => Value::Integer(i),
                _ => Value::Float(n.as_f64()),
            };
            (value, count)
        }));

        let summary = match whole {
            Some(whole) => Summary::of_whole(whole),
            None => Summary::of_floats(numbers.iter().map(|n| n.as_f64()).collect()),
        };

        FieldStats {
            count: numbers.len(),
            cardinality,
            min_value: Some(summary.min),
            max_value: Some(summary.max),
            mean_value: Some(summary.mean),
            median_value: Some(summary.median),
            top_hits,
        }
    }

    fn textual_stats(&self, values: &[&Value]) -> FieldStats {
        let mut counts: IndexMap<String, (Value, usize)> = IndexMap::new();
        for value in values {
            let key = match value.as_text() {
                Some(text) => text.into_owned(),
                None => serde_json::to_string(value).unwrap_or_default(),
            };
            counts
                .entry(key)
                .or_insert_with(|| ((*value).clone(), 0))
                .1 += 1;
        }
        let (top_hits, cardinality) = self.top_hits(counts.into_values());

        FieldStats {
            count: values.len(),
            cardinality,
            top_hits,
            ..FieldStats::default()
        }
    }

    /// Rank grouped values by count, ties by first occurrence
    ///
    /// Returns the truncated hits and the number of distinct values.
    fn top_hits(&self, grouped: impl Iterator<Item = (Value, usize)>) -> (Vec<TopHit>, usize) {
        let mut hits: Vec<TopHit> = grouped
            .map(|(value, count)| TopHit { value, count })
            .collect();
        let cardinality = hits.len();
        // Stable sort keeps first-seen order among equal counts
        hits.sort_by(|a, b| b.count.cmp(&a.count));
        hits.truncate(self.top_hits_limit);
        (hits, cardinality)
    }
}

/// 2^63, the first float past the `i64` range
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

#[derive(Debug, Clone, Copy)]
enum Number {
    Whole(i64),
    Float(f64),
}

/// Grouping key under numeric equality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NumberKey {
    Whole(i64),
    Float(u64),
}

impl Number {
    fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(Number::Whole(*n)),
            Value::Float(n) => n.is_finite().then_some(Number::Float(*n)),
            Value::String(s) => match s.parse::<i64>() {
                Ok(n) => Some(Number::Whole(n)),
                Err(_) => s
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(Number::Float),
            },
            _ => None,
        }
    }

    fn as_whole(self) -> Option<i64> {
        match self {
            Number::Whole(n) => Some(n),
            Number::Float(_) => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Whole(n) => n as f64,
            Number::Float(n) => n,
        }
    }

    /// Integral floats inside the `i64` range share the key of the whole
    /// number, which also folds `-0.0` into `0`
    fn key(self) -> NumberKey {
        match self {
            Number::Whole(n) => NumberKey::Whole(n),
            Number::Float(n) if n.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&n) => {
                NumberKey::Whole(n as i64)
            }
            Number::Float(n) => NumberKey::Float(n.to_bits()),
        }
    }
}

struct Summary {
    min: f64,
    max: f64,
    mean: f64,
    median: f64,
}

impl Summary {
    /// Ordered and summed as integers, converted only for output
    fn of_whole(mut numbers: Vec<i64>) -> Self {
        numbers.sort_unstable();
        let count = numbers.len();
        let sum: i128 = numbers.iter().map(|&n| i128::from(n)).sum();
        let median = if count % 2 == 0 {
            (i128::from(numbers[count / 2 - 1]) + i128::from(numbers[count / 2])) as f64 / 2.0
        } else {
            numbers[count / 2] as f64
        };
        Self {
            min: numbers[0] as f64,
            max: numbers[count - 1] as f64,
            mean: sum as f64 / count as f64,
            median,
        }
    }

    /// Sorted before summing so the mean does not depend on sample order
    fn of_floats(mut numbers: Vec<f64>) -> Self {
        numbers.sort_by(f64::total_cmp);
        let count = numbers.len();
        let sum: f64 = numbers.iter().sum();
        let median = if count % 2 == 0 {
            (numbers[count / 2 - 1] + numbers[count / 2]) / 2.0
        } else {
            numbers[count / 2]
        };
        Self {
            min: numbers[0],
            max: numbers[count - 1],
            mean: sum / count as f64,
            median,
        }
    }
}

/// Every value as a finite number, or `None` if any value is not numeric
fn numeric_values(values: &[&Value]) -> Option<Vec<Number>> {
    values.iter().map(|value| Number::parse(value)).collect()
}
