//! spoj.com: statement in `div#problem-body`, samples in the page's last
//! `pre`, split by inline `Input:` / `Output:` labels.

use super::Extractors;
use crate::error::{ExtractError, ExtractResult};
use crate::markup::{self, Child, Document, Query};

pub static EXTRACTORS: Extractors = Extractors {
    title,
    description,
    raw_input,
    raw_output,
    has_image,
};

const BODY_ID: &str = "problem-body";
const STOP_TEXT: &str = "Example";
const INPUT_LABEL: &str = "Input:";
const OUTPUT_LABEL: &str = "Output:";

pub fn title(doc: &Document) -> ExtractResult<String> {
    doc.find_by_id("problem-name")
        .map(markup::text)
        .ok_or(ExtractError::MissingLandmark("#problem-name"))
}

/// Text of every element under the problem body, one per line, up to the
/// `Example` heading.
pub fn description(doc: &Document) -> ExtractResult<String> {
    let body = doc
        .find(Query::tag("div").id(BODY_ID))
        .ok_or(ExtractError::MissingLandmark("div#problem-body"))?;

    let mut description = String::from("Problem Description\n");
    for el in markup::descendants(body) {
        let text = markup::text(el);
        if text == STOP_TEXT {
            break;
        }
        description.push_str(&text);
        description.push('\n');
    }
    Ok(description)
}

pub fn raw_input(doc: &Document) -> ExtractResult<String> {
    let mut inputs = String::new();
    for child in sample_block(doc)? {
        match child.single_string().as_deref() {
            Some(INPUT_LABEL) => continue,
            Some(OUTPUT_LABEL) => break,
            _ => inputs.push_str(&child.render()),
        }
    }
    Ok(inputs)
}

pub fn raw_output(doc: &Document) -> ExtractResult<String> {
    let mut outputs = String::new();
    let mut found_output = false;
    for child in sample_block(doc)? {
        if child.single_string().as_deref() == Some(OUTPUT_LABEL) {
            found_output = true;
            continue;
        }
        if found_output {
            outputs.push_str(&child.render());
        }
    }
    Ok(outputs)
}

pub fn has_image(doc: &Document) -> ExtractResult<bool> {
    let body = doc
        .find(Query::tag("div").id(BODY_ID))
        .ok_or(ExtractError::MissingLandmark("div#problem-body"))?;
    Ok(markup::find_in(body, Query::tag("img")).is_some())
}

/// Child nodes of the last `pre` on the page.
fn sample_block(doc: &Document) -> ExtractResult<Vec<Child<'_>>> {
    doc.find_all(Query::tag("pre"))
        .last()
        .map(|pre| markup::children(*pre))
        .ok_or(ExtractError::MissingLandmark("pre"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Document {
        let html = std::fs::read_to_string("tests/fixtures/spoj_test.html").unwrap();
        Document::parse(&html)
    }

    #[test]
    fn title_by_id() {
        assert_eq!(title(&fixture()).unwrap(), "TEST - Life, the Universe, and Everything");
    }

    #[test]
    fn description_stops_at_example() {
        let d = description(&fixture()).unwrap();
        assert!(d.starts_with("Problem Description\n"));
        assert!(d.contains("Rewrite small numbers from input to output."));
        assert!(!d.contains("Input:"));
        assert!(!d.contains("88"));
    }

    #[test]
    fn samples_split_on_labels() {
        let doc = fixture();
        assert_eq!(raw_input(&doc).unwrap(), "\n1\n2\n88\n42\n99\n");
        assert_eq!(raw_output(&doc).unwrap(), "\n1\n2\n88\n");
    }

    #[test]
    fn body_image() {
        assert!(!has_image(&fixture()).unwrap());
        let doc = Document::parse(r#"<div id="problem-body"><p><span><img src="a.png"></span></p></div>"#);
        assert!(has_image(&doc).unwrap());
        let empty = Document::parse(r#"<div id="problem-body"></div>"#);
        assert!(!has_image(&empty).unwrap());
    }

    #[test]
    fn missing_landmarks_are_errors() {
        let doc = Document::parse("<html><body><h1>Nope</h1></body></html>");
        assert!(title(&doc).is_err());
        assert!(description(&doc).is_err());
        assert_eq!(raw_input(&doc), Err(ExtractError::MissingLandmark("pre")));
        assert!(raw_output(&doc).is_err());
        assert!(has_image(&doc).is_err());
    }
}
