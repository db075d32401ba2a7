//! Artifact file formats

use crate::domain::QuarryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// On-disk format of every artifact of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Comma-separated values with a `cep,latitude,longitude` header
    #[default]
    Csv,
    /// One JSON object per line
    Jsonl,
}

impl ArtifactFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Csv => "csv",
            ArtifactFormat::Jsonl => "jsonl",
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ArtifactFormat {
    type Err = QuarryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ArtifactFormat::Csv),
            "jsonl" | "ndjson" => Ok(ArtifactFormat::Jsonl),
            other => Err(QuarryError::Configuration(format!(
                "Invalid artifact format '{other}'. Must be one of: csv, jsonl"
            ))),
        }
    }
}
