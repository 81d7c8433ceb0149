//! Timestamp field detection
//!
//! Finds the one field whose value is a timestamp of the same format family
//! in every sample of a batch.

use indexmap::IndexSet;
use tracing::{debug, trace};

use super::explanation::Explanation;
use super::formats::{ValueMatch, full_match_value};
use super::types::{DetectedTimestamp, TimestampMatch};
use super::value::Sample;

/// A field still in the running, with its accumulated match
#[derive(Debug)]
struct Candidate<'a> {
    field_name: &'a str,
    running: ValueMatch,
    date_formats: IndexSet<&'static str>,
}

impl<'a> Candidate<'a> {
    fn new(field_name: &'a str, first: ValueMatch) -> Self {
        Self {
            field_name,
            running: first,
            date_formats: first.format.date_formats().iter().copied().collect(),
        }
    }

    /// Fold in the match from a later sample; false if it is a different family
    fn absorb(&mut self, next: Option<ValueMatch>) -> bool {
        let Some(next) = next else {
            return false;
        };
        if next.format.index() != self.running.format.index() {
            return false;
        }
        self.date_formats
            .extend(next.format.date_formats().iter().copied());
        self.running.has_timezone &= next.has_timezone;
        true
    }

    fn into_detected(self) -> DetectedTimestamp {
        DetectedTimestamp {
            field_name: self.field_name.to_string(),
            timestamp_match: TimestampMatch {
                grok_pattern_name: self.running.format.grok_pattern_name().to_string(),
                date_formats: self.date_formats.into_iter().map(String::from).collect(),
                has_timezone: self.running.has_timezone,
            },
        }
    }
}

/// Find the field holding a consistently formatted timestamp in every sample
///
/// Returns `None` when the batch is empty, when no field qualifies, or when
/// more than one field does.
pub fn guess_timestamp_field(
    explanation: &mut Explanation,
    samples: &[Sample],
) -> Option<DetectedTimestamp> {
    detect_timestamp_field(explanation, samples, None)
}

/// As [`guess_timestamp_field`], optionally restricted to one named field
pub(crate) fn detect_timestamp_field(
    explanation: &mut Explanation,
    samples: &[Sample],
    only_field: Option<&str>,
) -> Option<DetectedTimestamp> {
    let Some(first) = samples.first() else {
        explanation.push("No samples so cannot determine timestamp field");
        return None;
    };
    debug!(samples = samples.len(), only_field = ?only_field, "Guessing timestamp field");

    if let Some(single) = single_shared_field(samples) {
        explanation.push(format!(
            "All samples have the single field [{single}] so it is the only timestamp candidate"
        ));
    }

    let mut candidates: Vec<Candidate<'_>> = first
        .iter()
        .filter(|(name, _)| only_field.is_none_or(|only| only == name.as_str()))
        .filter_map(|(name, value)| {
            full_match_value(value).map(|found| Candidate::new(name, found))
        })
        .collect();

    if let (Some(only), true) = (only_field, candidates.is_empty()) {
        explanation.push(format!(
            "Configured timestamp field [{only}] does not hold a recognised timestamp in the first sample"
        ));
        return None;
    }

    for (sample_index, sample) in samples.iter().enumerate().skip(1) {
        candidates.retain_mut(|candidate| {
            let next = sample.get(candidate.field_name).and_then(full_match_value);
            let survives = candidate.absorb(next);
            if !survives {
                trace!(
                    field = candidate.field_name,
                    sample_index,
                    "Dropping timestamp candidate"
                );
            }
            survives
        });
        if candidates.is_empty() {
            break;
        }
    }

    match candidates.len() {
        0 => {
            explanation.push("No field holds a timestamp of one consistent format in every sample");
            None
        }
        1 => {
            let detected = candidates.swap_remove(0).into_detected();
            explanation.push(format!(
                "Guessing timestamp field is [{}] with format {:?}",
                detected.field_name, detected.timestamp_match.date_formats
            ));
            debug!(
                field = %detected.field_name,
                grok = %detected.timestamp_match.grok_pattern_name,
                "Timestamp field detected"
            );
            Some(detected)
        }
        n => {
            let names: Vec<&str> = candidates.iter().map(|c| c.field_name).collect();
            explanation.push(format!(
                "{n} fields {names:?} hold consistent timestamps so cannot choose one"
            ));
            None
        }
    }
}

/// The field name when every sample has exactly that one field
fn single_shared_field(samples: &[Sample]) -> Option<&str> {
    let (name, _) = samples.first()?.first()?;
    samples
        .iter()
        .all(|sample| sample.len() == 1 && sample.contains_key(name))
        .then_some(name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::value::Value;

    fn sample(fields: &[(&str, Value)]) -> Sample {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_empty_batch() {
        let mut explanation = Explanation::new();
        assert!(guess_timestamp_field(&mut explanation, &[]).is_none());
        assert_eq!(explanation.len(), 1);
    }

    #[test]
    fn test_single_field_batch() {
        let samples = vec![
            sample(&[("time", Value::from("2018-05-24 17:28:31,735"))]),
            sample(&[("time", Value::from("2018-05-24 17:28:33,402"))]),
        ];
        let mut explanation = Explanation::new();
        let detected = guess_timestamp_field(&mut explanation, &samples).unwrap();
        assert_eq!(detected.field_name, "time");
        assert_eq!(
            detected.timestamp_match.date_formats,
            vec!["YYYY-MM-dd HH:mm:ss,SSS"]
        );
        assert!(!detected.timestamp_match.has_timezone);
    }

    #[test]
    fn test_timezone_requires_every_sample() {
        let samples = vec![
            sample(&[("ts", Value::from("2018-05-24T17:28:31Z"))]),
            sample(&[("ts", Value::from("2018-05-24T17:28:32"))]),
        ];
        let detected = guess_timestamp_field(&mut Explanation::new(), &samples).unwrap();
        assert_eq!(detected.timestamp_match.date_formats, vec!["ISO8601"]);
        assert!(!detected.timestamp_match.has_timezone);
    }

    #[test]
    fn test_only_field_restricts_candidates() {
        let samples = vec![
            sample(&[
                ("a", Value::from("2018-05-24 17:28:31")),
                ("b", Value::from("2018-05-24 17:28:31")),
            ]),
            sample(&[
                ("a", Value::from("2018-05-24 17:28:32")),
                ("b", Value::from("2018-05-24 17:28:32")),
            ]),
        ];
        let mut explanation = Explanation::new();
        assert!(guess_timestamp_field(&mut explanation, &samples).is_none());

        let detected =
            detect_timestamp_field(&mut Explanation::new(), &samples, Some("b")).unwrap();
        assert_eq!(detected.field_name, "b");
        assert!(detect_timestamp_field(&mut Explanation::new(), &samples, Some("c")).is_none());
    }

    #[test]
    fn test_booleans_never_match() {
        let samples = vec![sample(&[("flag", Value::from(true)), ("n", Value::from(7))])];
        assert!(guess_timestamp_field(&mut Explanation::new(), &samples).is_none());
    }
}
