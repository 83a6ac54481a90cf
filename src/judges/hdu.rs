//! acm.hdu.edu.cn: every section is a `div.panel_title` label followed by a
//! sibling `div.panel_content`. Missing sections read as empty text.

use super::Extractors;
use crate::error::{ExtractError, ExtractResult};
use crate::markup::{self, Document, Query};

pub static EXTRACTORS: Extractors = Extractors {
    title,
    description,
    raw_input,
    raw_output,
    has_image,
};

const STATEMENT_SECTIONS: [&str; 3] = ["Problem Description", "Input", "Output"];

pub fn title(doc: &Document) -> ExtractResult<String> {
    doc.find(Query::tag("h1"))
        .map(markup::text)
        .ok_or(ExtractError::MissingLandmark("h1"))
}

/// Statement sections, each prefixed with its label on its own line.
pub fn description(doc: &Document) -> ExtractResult<String> {
    Ok(STATEMENT_SECTIONS
        .iter()
        .map(|label| {
            panel(doc, label)
                .map(|content| format!("{label}\n{content}"))
                .unwrap_or_default()
        })
        .collect())
}

pub fn raw_input(doc: &Document) -> ExtractResult<String> {
    Ok(panel(doc, "Sample Input").unwrap_or_default())
}

pub fn raw_output(doc: &Document) -> ExtractResult<String> {
    Ok(panel(doc, "Sample Output").unwrap_or_default())
}

pub fn has_image(doc: &Document) -> ExtractResult<bool> {
    Ok(doc
        .find_all(Query::tag("div").class("panel_content"))
        .into_iter()
        .any(|panel| markup::find_in(panel, Query::tag("img")).is_some()))
}

fn panel(doc: &Document, label: &str) -> Option<String> {
    let heading = doc.find(Query::tag("div").class("panel_title").string(label))?;
    let content = markup::find_next_sibling(heading, Query::tag("div").class("panel_content"))?;
    Some(markup::text(content))
}
