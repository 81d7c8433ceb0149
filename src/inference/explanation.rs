//! Human-readable account of inference decisions

use serde::{Deserialize, Serialize};

/// Append-only list of diagnostic lines
///
/// Callers pass a `&mut Explanation` into every inference call and read it
/// afterwards. Each line is also emitted as a `tracing` debug event. Nothing
/// in the inference logic reads it back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Explanation {
    lines: Vec<String>,
}

impl Explanation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(explanation = %line);
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl std::fmt::Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
