//! Per-page pipeline: extractors, synthesis, language and image detection, and
//! the judge's failure policy.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::error::{ExtractError, ExtractResult};
use crate::judges::{FailurePolicy, Judge};
use crate::language;
use crate::markup::Document;
use crate::record::{Page, Problem, Record};
use crate::synth::{Synthesizer, TestCase};

/// The four text fields, each with its own outcome, plus the running
/// "some required field failed" flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub title: ExtractResult<String>,
    pub description: ExtractResult<String>,
    pub raw_input: ExtractResult<String>,
    pub raw_output: ExtractResult<String>,
    pub any_failed: bool,
}

impl Extraction {
    /// A field fails when its extractor errored. The description also fails
    /// when it came back empty.
    pub fn new(
        title: ExtractResult<String>,
        description: ExtractResult<String>,
        raw_input: ExtractResult<String>,
        raw_output: ExtractResult<String>,
    ) -> Self {
        let any_failed = title.is_err()
            || description.as_ref().map_or(true, |d| d.is_empty())
            || raw_input.is_err()
            || raw_output.is_err();
        Extraction {
            title,
            description,
            raw_input,
            raw_output,
            any_failed,
        }
    }

    fn value(field: &ExtractResult<String>) -> String {
        field.as_ref().cloned().unwrap_or_default()
    }
}

pub struct Assembler<'s> {
    judge: Judge,
    synthesizer: Option<&'s Synthesizer>,
    keep_failed_url: bool,
}

impl<'s> Assembler<'s> {
    /// With no synthesizer, every record gets `unit_tests: null`.
    pub fn new(judge: Judge, synthesizer: Option<&'s Synthesizer>) -> Self {
        Assembler {
            judge,
            synthesizer,
            keep_failed_url: false,
        }
    }

    pub fn keep_failed_url(mut self, keep: bool) -> Self {
        self.keep_failed_url = keep;
        self
    }

    pub fn judge(&self) -> Judge {
        self.judge
    }

    /// Title, description, raw input and raw output, in that order. A failing
    /// extractor never stops the next one.
    pub fn extract(&self, url: &str, doc: &Document) -> Extraction {
        let ex = self.judge.extractors();
        let title = guarded(url, "title", || (ex.title)(doc));
        let description = guarded(url, "description", || (ex.description)(doc));
        if matches!(&description, Ok(d) if d.is_empty()) {
            warn!(url, field = "description", "description is empty");
        }
        let raw_input = guarded(url, "unprocessed input", || (ex.raw_input)(doc));
        let raw_output = guarded(url, "unprocessed output", || (ex.raw_output)(doc));
        Extraction::new(title, description, raw_input, raw_output)
    }

    pub fn assemble(&self, page: &Page) -> Record {
        let url = page.url.as_str();
        let doc = Document::parse(&page.html);
        let fields = self.extract(url, &doc);
        let strict = self.judge.policy() == FailurePolicy::Strict;

        let description = Extraction::value(&fields.description);
        let raw_input = Extraction::value(&fields.raw_input);
        let raw_output = Extraction::value(&fields.raw_output);

        // Synthesis is metered; a strict judge would discard the result anyway.
        let test_cases = if strict && fields.any_failed {
            None
        } else {
            self.synthesize(url, &raw_input, &raw_output, &description)
        };

        let language = language::detect(&description);
        if language == language::UNKNOWN {
            warn!(url, field = "language", "language detection failed");
        }

        let has_image = guarded(url, "image", || (self.judge.extractors().has_image)(&doc))
            .unwrap_or(false);

        if strict && fields.any_failed {
            return Record::failed(self.keep_failed_url.then(|| page.url.clone()));
        }

        Record::Success(Problem {
            url: page.url.clone(),
            title: Extraction::value(&fields.title),
            description,
            raw_input,
            raw_output,
            test_cases,
            language,
            has_image,
        })
    }

    /// Record for a page whose pipeline blew up outright, under the judge's
    /// policy.
    pub fn fallback(&self, page: &Page) -> Record {
        match self.judge.policy() {
            FailurePolicy::Strict => Record::failed(self.keep_failed_url.then(|| page.url.clone())),
            FailurePolicy::Permissive => Record::Success(Problem {
                url: page.url.clone(),
                title: String::new(),
                description: String::new(),
                raw_input: String::new(),
                raw_output: String::new(),
                test_cases: None,
                language: language::UNKNOWN.to_string(),
                has_image: false,
            }),
        }
    }

    fn synthesize(
        &self,
        url: &str,
        raw_input: &str,
        raw_output: &str,
        description: &str,
    ) -> Option<Vec<TestCase>> {
        let synthesizer = self.synthesizer?;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            synthesizer.synthesize(raw_input, raw_output, description)
        }))
        .unwrap_or_else(|p| {
            warn!(url, field = "unit tests", error = %panic_message(p.as_ref()), "synthesis panicked");
            None
        });
        if result.is_none() {
            warn!(url, field = "unit tests", "no test cases synthesized");
        }
        result
    }
}

/// Run one extractor, turning a panic into that field's error and logging any
/// failure against the page.
fn guarded<T>(url: &str, field: &'static str, f: impl FnOnce() -> ExtractResult<T>) -> ExtractResult<T> {
    let result = panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|p| Err(ExtractError::Panicked(panic_message(p.as_ref()))));
    if let Err(e) = &result {
        warn!(url, field, error = %e, "field extraction failed");
    }
    result
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::synth::testing::{ScriptedTransport, TWO_CASES};
    use crate::synth::DEFAULT_MAX_ATTEMPTS;

    fn page(fixture: &str) -> Page {
        Page {
            url: format!("https://example.test/{fixture}"),
            html: std::fs::read_to_string(format!("tests/fixtures/{fixture}.html")).unwrap(),
        }
    }

    fn synthesizer(reply: Result<&str, &str>) -> (Synthesizer, std::sync::Arc<std::sync::atomic::AtomicUsize>) {
        let transport = ScriptedTransport::always(reply);
        let calls = transport.calls.clone();
        (Synthesizer::new(Box::new(transport), DEFAULT_MAX_ATTEMPTS), calls)
    }

    #[test]
    fn strict_success_carries_extractor_values() {
        let (synth, calls) = synthesizer(Ok(TWO_CASES));
        let assembler = Assembler::new(Judge::Timus, Some(&synth));
        let page = page("timus_1000");
        let Record::Success(p) = assembler.assemble(&page) else {
            panic!("expected success");
        };

        let doc = Document::parse(&page.html);
        assert_eq!(p.url, page.url);
        assert_eq!(Ok(p.title), crate::judges::timus::title(&doc));
        assert_eq!(Ok(p.description), crate::judges::timus::description(&doc));
        assert_eq!(Ok(p.raw_input), crate::judges::timus::raw_input(&doc));
        assert_eq!(Ok(p.raw_output), crate::judges::timus::raw_output(&doc));
        assert_eq!(p.test_cases.unwrap().len(), 2);
        assert!(!p.has_image);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn strict_without_description_fails_and_skips_synthesis() {
        let (synth, calls) = synthesizer(Ok(TWO_CASES));
        let assembler = Assembler::new(Judge::Spoj, Some(&synth));
        let page = Page {
            url: "https://www.spoj.com/problems/NOPE/".into(),
            html: r#"<h2 id="problem-name">NOPE</h2><pre><b>Input:</b>1<b>Output:</b>1</pre>"#.into(),
        };
        assert_eq!(assembler.assemble(&page), Record::failed(None));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn strict_failure_can_keep_url() {
        let assembler = Assembler::new(Judge::Timus, None).keep_failed_url(true);
        let page = Page {
            url: "u".into(),
            html: String::new(),
        };
        assert_eq!(assembler.assemble(&page), Record::failed(Some("u".into())));
    }

    #[test]
    fn exhausted_synthesis_leaves_test_cases_absent() {
        let (synth, calls) = synthesizer(Err("down"));
        let assembler = Assembler::new(Judge::Spoj, Some(&synth));
        let Record::Success(p) = assembler.assemble(&page("spoj_test")) else {
            panic!("expected success");
        };
        assert_eq!(p.test_cases, None);
        assert_eq!(p.title, "TEST - Life, the Universe, and Everything");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn permissive_never_fails() {
        let (synth, calls) = synthesizer(Err("down"));
        let assembler = Assembler::new(Judge::Hdu, Some(&synth));
        let page = Page {
            url: "https://acm.hdu.edu.cn/showproblem.php?pid=9999".into(),
            html: "<html><body>Problem not found</body></html>".into(),
        };
        let Record::Success(p) = assembler.assemble(&page) else {
            panic!("permissive judge emitted a failure");
        };
        assert_eq!(p.title, "");
        assert_eq!(p.description, "");
        assert_eq!(p.language, language::UNKNOWN);
        assert!(!p.has_image);
        // Permissive pages still go to synthesis.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn permissive_full_page() {
        let assembler = Assembler::new(Judge::Hdu, None);
        let Record::Success(p) = assembler.assemble(&page("hdu_1000")) else {
            panic!("expected success");
        };
        assert_eq!(p.title, "A + B Problem");
        assert_eq!(p.raw_input, "1 1\n2 3\n");
        assert!(p.has_image);
        assert_eq!(p.test_cases, None);
    }

    #[test]
    fn extraction_tracks_failures() {
        let assembler = Assembler::new(Judge::Spoj, None);
        let doc = Document::parse(r#"<div id="problem-body"><p>x</p></div>"#);
        let ex = assembler.extract("u", &doc);
        assert!(ex.any_failed);
        assert!(ex.title.is_err());
        assert!(ex.description.is_ok());
        assert!(ex.raw_input.is_err());
    }

    #[test]
    fn empty_description_counts_as_failure() {
        let ok = |s: &str| -> ExtractResult<String> { Ok(s.to_string()) };
        assert!(!Extraction::new(ok("t"), ok("d"), ok(""), ok("")).any_failed);
        assert!(Extraction::new(ok("t"), ok(""), ok("1"), ok("1")).any_failed);
        assert!(Extraction::new(ok("t"), ok("d"), Err(ExtractError::MissingLandmark("pre")), ok("1")).any_failed);
    }

    #[test]
    fn guarded_turns_panics_into_field_errors() {
        let r: ExtractResult<String> = guarded("u", "title", || panic!("boom"));
        assert_eq!(r, Err(ExtractError::Panicked("boom".into())));
    }

    #[test]
    fn fallback_follows_policy() {
        let page = Page {
            url: "u".into(),
            html: String::new(),
        };
        assert!(Assembler::new(Judge::Spoj, None).fallback(&page).is_failure());
        assert!(!Assembler::new(Judge::Hdu, None).fallback(&page).is_failure());
    }
}
