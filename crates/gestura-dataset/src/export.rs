//! Dataset export formats
//!
//! - Structured: pretty JSON array, every field preserved, re-importable
//! - Tabular: CSV summary `id,label,timestamp,userId,quality`

use std::fmt;
use std::str::FromStr;

use gestura_core::{GestureError, GesturaResult};

use crate::GestureExample;

/// Header row of the tabular format
pub const TABULAR_HEADER: &str = "id,label,timestamp,userId,quality";

/// Text representation of an exported dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Structured,
    Tabular,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Structured => "structured",
            ExportFormat::Tabular => "tabular",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = GestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(ExportFormat::Structured),
            "tabular" | "csv" => Ok(ExportFormat::Tabular),
            _ => Err(GestureError::UnknownExportFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialize examples in insertion order
pub fn export_examples(examples: &[GestureExample], format: ExportFormat) -> GesturaResult<String> {
    match format {
        ExportFormat::Structured => serde_json::to_string_pretty(examples)
            .map_err(|e| GestureError::Serialization(e.to_string())),
        ExportFormat::Tabular => Ok(to_tabular(examples)),
    }
}

/// Parse a structured export back into examples
pub fn parse_structured(json: &str) -> GesturaResult<Vec<GestureExample>> {
    serde_json::from_str(json).map_err(|e| GestureError::Serialization(e.to_string()))
}

fn to_tabular(examples: &[GestureExample]) -> String {
    let mut out = String::from(TABULAR_HEADER);
    for example in examples {
        out.push('\n');
        out.push_str(&csv_field(example.id.as_str()));
        out.push(',');
        out.push_str(&csv_field(&example.label));
        out.push(',');
        out.push_str(&example.metadata.captured_at.as_millis().to_string());
        out.push(',');
        out.push_str(&csv_field(example.metadata.user_id.as_str()));
        out.push(',');
        out.push_str(&example.metadata.quality.to_string());
    }
    out
}

/// Quote a field if it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
