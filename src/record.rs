use serde::{Deserialize, Serialize};

use crate::synth::TestCase;

/// Immutable input unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub html: String,
}

/// Canonical problem record, serialized with the dataset's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub url: String,
    pub title: String,
    #[serde(rename = "problem_description")]
    pub description: String,
    #[serde(rename = "unprocessed_input")]
    pub raw_input: String,
    #[serde(rename = "unprocessed_output")]
    pub raw_output: String,
    #[serde(rename = "unit_tests")]
    pub test_cases: Option<Vec<TestCase>>,
    pub language: String,
    pub has_image: bool,
}

/// Marker for a page a strict judge refused to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failed {
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Success(Problem),
    Failure(Failed),
}

impl Record {
    pub fn failed(url: Option<String>) -> Self {
        Record::Failure(Failed { failed: true, url })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Record::Failure(_))
    }
}
