pub mod hdu;
pub mod spoj;
pub mod timus;

use std::fmt;

use crate::error::ExtractResult;
use crate::markup::Document;

/// Appended after every sample entry, so consecutive samples are separated by
/// a blank line.
pub const SAMPLE_SEPARATOR: &str = "\n\n";

/// What a judge does with a page when any required field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep whatever was extracted.
    Permissive,
    /// Skip synthesis and emit a failure marker.
    Strict,
}

/// Online judges with a known page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Judge {
    Hdu,
    Spoj,
    Timus,
}

/// The five field extractors one judge provides.
pub struct Extractors {
    pub title: fn(&Document) -> ExtractResult<String>,
    pub description: fn(&Document) -> ExtractResult<String>,
    pub raw_input: fn(&Document) -> ExtractResult<String>,
    pub raw_output: fn(&Document) -> ExtractResult<String>,
    pub has_image: fn(&Document) -> ExtractResult<bool>,
}

impl Judge {
    pub fn name(self) -> &'static str {
        match self {
            Judge::Hdu => "hdu",
            Judge::Spoj => "spoj",
            Judge::Timus => "timus",
        }
    }

    pub fn policy(self) -> FailurePolicy {
        match self {
            Judge::Hdu => FailurePolicy::Permissive,
            Judge::Spoj | Judge::Timus => FailurePolicy::Strict,
        }
    }

    pub fn extractors(self) -> &'static Extractors {
        match self {
            Judge::Hdu => &hdu::EXTRACTORS,
            Judge::Spoj => &spoj::EXTRACTORS,
            Judge::Timus => &timus::EXTRACTORS,
        }
    }
}

impl fmt::Display for Judge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies() {
        assert_eq!(Judge::Hdu.policy(), FailurePolicy::Permissive);
        assert_eq!(Judge::Spoj.policy(), FailurePolicy::Strict);
        assert_eq!(Judge::Timus.policy(), FailurePolicy::Strict);
    }
}
