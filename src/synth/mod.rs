//! Turns free-form sample input/output into structured test cases by asking a
//! generative model, with a small fixed number of immediate retries.

mod cohere;

pub use cohere::{CohereClient, CohereConfig};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SynthesisError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// One example: named input variables and the expected output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Map<String, Value>,
    pub output: Value,
}

/// A single request/response exchange with the model service.
pub trait ChatTransport: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, SynthesisError>;
}

pub struct Synthesizer {
    transport: Box<dyn ChatTransport>,
    max_attempts: u32,
}

impl Synthesizer {
    pub fn new(transport: Box<dyn ChatTransport>, max_attempts: u32) -> Self {
        Synthesizer {
            transport,
            max_attempts: max_attempts.max(1),
        }
    }

    /// `None` once every attempt has failed in transport or in parsing.
    pub fn synthesize(
        &self,
        raw_input: &str,
        raw_output: &str,
        description: &str,
    ) -> Option<Vec<TestCase>> {
        let prompt = build_prompt(raw_input, raw_output, description);
        for attempt in 1..=self.max_attempts {
            let result = self
                .transport
                .complete(&prompt)
                .and_then(|text| parse_test_cases(&text));
            match result {
                Ok(cases) => return Some(cases),
                Err(e) => debug!(attempt, max = self.max_attempts, error = %e, "synthesis attempt failed"),
            }
        }
        None
    }
}

pub fn parse_test_cases(text: &str) -> Result<Vec<TestCase>, SynthesisError> {
    Ok(serde_json::from_str(text.trim())?)
}

pub fn build_prompt(raw_input: &str, raw_output: &str, description: &str) -> String {
    format!(
        r#"Given the following problem with its inputs and outputs, format the inputs and outputs as a list of objects with "input" and "output" keys, where "input" maps each variable name to its value.
For example: [{{"input": {{"n": 2, "a": [3, 1]}}, "output": 6}}, {{"input": {{"n": 5, "a": [7, 3, 9, 6, 12]}}, "output": 52}}]
Do not include any text in the reply other than the list.

Problem:
{description}

Inputs:
{raw_input}

Outputs:
{raw_output}
"#
    )
}
