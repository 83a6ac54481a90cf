//! acm.timus.ru: statement in `div#problem_text`, samples in `table.sample`.
//!
//! The sample table comes in two layouts. Most problems put input and output
//! side by side:
//!
//! ```text
//! | input | output |
//! | 2     | 2      |
//! | 1 2   | 3      |
//! ```
//!
//! Some stack them in a single column, each half under its own header row:
//!
//! ```text
//! | input  |
//! | 2      |
//! | 1 2    |
//! | output |
//! | 3      |
//! ```
//!
//! The header row's cell count picks the branch.

use scraper::ElementRef;

use super::{Extractors, SAMPLE_SEPARATOR};
use crate::error::{ExtractError, ExtractResult};
use crate::markup::{self, Document, Query};

pub static EXTRACTORS: Extractors = Extractors {
    title,
    description,
    raw_input,
    raw_output,
    has_image,
};

const BODY_ID: &str = "problem_text";
const STOP_TEXT: &str = "Sample";
const CELLS: [&str; 2] = ["td", "th"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Input,
    Output,
}

impl Side {
    fn column(self) -> usize {
        match self {
            Side::Input => 0,
            Side::Output => 1,
        }
    }
}

pub fn title(doc: &Document) -> ExtractResult<String> {
    doc.find(Query::tag("h2").class("problem_title"))
        .map(markup::text)
        .ok_or(ExtractError::MissingLandmark("h2.problem_title"))
}

pub fn description(doc: &Document) -> ExtractResult<String> {
    let body = problem_text(doc)?;
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
    samples(doc, Side::Input)
}

pub fn raw_output(doc: &Document) -> ExtractResult<String> {
    samples(doc, Side::Output)
}

pub fn has_image(doc: &Document) -> ExtractResult<bool> {
    Ok(markup::find_in(problem_text(doc)?, Query::tag("img")).is_some())
}

fn problem_text(doc: &Document) -> ExtractResult<ElementRef<'_>> {
    doc.find(Query::tag("div").id(BODY_ID))
        .ok_or(ExtractError::MissingLandmark("div#problem_text"))
}

fn samples(doc: &Document, side: Side) -> ExtractResult<String> {
    let table = doc
        .find(Query::tag("table").class("sample"))
        .ok_or(ExtractError::MissingLandmark("table.sample"))?;
    let body = markup::find_in(table, Query::tag("tbody"))
        .ok_or(ExtractError::MissingLandmark("table.sample tbody"))?;
    let rows = markup::find_all_in(body, Query::tag("tr"));
    let header = rows
        .first()
        .ok_or_else(|| ExtractError::Malformed("sample table has no rows".into()))?;

    if markup::find_all_in(*header, Query::tags(&CELLS)).len() > 1 {
        side_by_side(&rows[1..], side)
    } else {
        stacked(&rows, side)
    }
}

fn side_by_side(rows: &[ElementRef<'_>], side: Side) -> ExtractResult<String> {
    let mut out = String::new();
    for row in rows {
        let cells = markup::find_all_in(*row, Query::tag("td"));
        let cell = cells.get(side.column()).ok_or_else(|| {
            ExtractError::Malformed(format!("sample row has no cell {}", side.column()))
        })?;
        push_sample(&mut out, *cell)?;
    }
    Ok(out)
}

fn stacked(rows: &[ElementRef<'_>], side: Side) -> ExtractResult<String> {
    let start = match side {
        Side::Input => "input",
        Side::Output => "output",
    };
    let mut out = String::new();
    let mut started = false;
    for row in rows {
        let cell = markup::find_in(*row, Query::tags(&CELLS))
            .ok_or_else(|| ExtractError::Malformed("sample row has no cell".into()))?;
        let label = markup::text(cell).trim().to_lowercase();
        if !started {
            started = label == start;
            continue;
        }
        if side == Side::Input && label == "output" {
            break;
        }
        push_sample(&mut out, cell)?;
    }
    Ok(out)
}

fn push_sample(out: &mut String, cell: ElementRef<'_>) -> ExtractResult<()> {
    let pre = markup::find_in(cell, Query::tag("pre"))
        .ok_or_else(|| ExtractError::Malformed("sample cell has no pre".into()))?;
    out.push_str(&markup::text(pre));
    out.push_str(SAMPLE_SEPARATOR);
    Ok(())
}
