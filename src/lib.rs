//! Log Structure Finder - Structure inference for parsed log samples
//!
//! Provides:
//! - Timestamp format catalog and matching
//! - Timestamp field detection across a batch of samples
//! - Field type inference (index mappings)
//! - Per-field statistics

pub mod inference;

// Re-export commonly used types
pub use inference::{
    DetectedTimestamp, Explanation, FieldMapping, FieldStats, FieldType, InferenceConfig,
    InferenceError, InferenceResult, MappingsAndStats, Sample, StructureInferrer,
    TimestampMatch, Value,
};
