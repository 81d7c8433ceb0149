//! Structure inference engine for log samples
//!
//! This module infers structure from log records that have already been
//! parsed into field/value samples, without a user-supplied schema.
//!
//! ## Features
//!
//! - **Timestamp detection** - Find the one field holding a timestamp of a
//!   consistent format in every sample, with its grok pattern and date formats
//! - **Type inference** - Map each field to keyword, text, long, double, date,
//!   ip, boolean or object
//! - **Field statistics** - Count, cardinality, top hits and numeric summaries
//! - **Explanations** - Every decision is recorded as a readable line
//!
//! ## Example
//!
//! ```rust,ignore
//! use log_structure_finder::inference::{
//!     Explanation, StructureInferrer, guess_timestamp_field, samples_from_json_lines,
//! };
//!
//! let samples = samples_from_json_lines(
//!     r#"{"time": "2018-05-24 17:28:31,735", "level": "INFO"}
//! {"time": "2018-05-24 17:28:33,402", "level": "WARN"}"#,
//! )?;
//!
//! let mut explanation = Explanation::new();
//! let timestamp = guess_timestamp_field(&mut explanation, &samples);
//! let structure = StructureInferrer::new()
//!     .guess_mappings_and_calculate_field_stats(&mut explanation, &samples)?;
//! println!("{}", serde_json::to_string_pretty(&structure)?);
//! ```

mod config;
mod error;
mod explanation;
mod formats;
mod inferrer;
mod mapping;
mod stats;
mod timestamp;
mod types;
mod value;

pub use config::{InferenceConfig, InferenceConfigBuilder};
pub use error::{InferenceError, InferenceResult};
pub use explanation::Explanation;
pub use formats::{
    CatalogMatch, TimestampFormat, ValueMatch, find_first_full_match, find_first_match,
    full_match_value, timestamp_formats,
};
pub use inferrer::{
    StructureInferrer, guess_mapping_and_calculate_field_stats,
    guess_mappings_and_calculate_field_stats,
};
pub use mapping::{guess_mapping, is_more_likely_text_than_keyword};
pub use stats::FieldStatsCalculator;
pub use timestamp::guess_timestamp_field;
pub use types::{
    DetectedTimestamp, FieldMapping, FieldStats, FieldType, MappingsAndStats, TimestampMatch,
    TopHit,
};
pub use value::{Sample, Value, flatten_values, sample_from_json, samples_from_json_lines};
