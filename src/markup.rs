//! Thin navigation layer over a parsed HTML document.
//!
//! Every lookup returns `Option`: a missing landmark is a normal outcome that
//! the judge strategies turn into their own errors or defaults.

use scraper::{ElementRef, Html, Node};

/// One parsed page. Lives only for the duration of a single record assembly.
pub struct Document {
    html: Html,
}

/// Element matcher: tag name, id, class and an exact "single string" predicate.
/// Unset parts match anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<'q> {
    tag: Option<&'q str>,
    tags: &'q [&'q str],
    id: Option<&'q str>,
    class: Option<&'q str>,
    string: Option<&'q str>,
}

impl<'q> Query<'q> {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn tag(tag: &'q str) -> Self {
        Query {
            tag: Some(tag),
            ..Self::default()
        }
    }

    /// Match any of several tag names (`["td", "th"]`).
    pub fn tags(tags: &'q [&'q str]) -> Self {
        Query {
            tags,
            ..Self::default()
        }
    }

    pub fn id(mut self, id: &'q str) -> Self {
        self.id = Some(id);
        self
    }

    pub fn class(mut self, class: &'q str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn string(mut self, string: &'q str) -> Self {
        self.string = Some(string);
        self
    }

    pub fn matches(&self, el: ElementRef<'_>) -> bool {
        let value = el.value();
        if let Some(tag) = self.tag {
            if !value.name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|t| value.name().eq_ignore_ascii_case(t)) {
            return false;
        }
        if let Some(id) = self.id {
            if value.id() != Some(id) {
                return false;
            }
        }
        if let Some(class) = self.class {
            if !value.classes().any(|c| c == class) {
                return false;
            }
        }
        if let Some(string) = self.string {
            if single_string(el).as_deref() != Some(string) {
                return false;
            }
        }
        true
    }
}

impl Document {
    /// Parse markup. html5ever repairs malformed input instead of failing.
    pub fn parse(markup: &str) -> Self {
        Document {
            html: Html::parse_document(markup),
        }
    }

    /// Every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    pub fn find(&self, query: Query<'_>) -> Option<ElementRef<'_>> {
        self.elements().find(|el| query.matches(*el))
    }

    pub fn find_all(&self, query: Query<'_>) -> Vec<ElementRef<'_>> {
        self.elements().filter(|el| query.matches(*el)).collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        self.find(Query::any().id(id))
    }
}

/// All descendant elements of `el` (excluding `el`) in document order.
pub fn descendants<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// First descendant of `el` matching `query`.
pub fn find_in<'a>(el: ElementRef<'a>, query: Query<'_>) -> Option<ElementRef<'a>> {
    descendants(el).find(|d| query.matches(*d))
}

pub fn find_all_in<'a>(el: ElementRef<'a>, query: Query<'_>) -> Vec<ElementRef<'a>> {
    descendants(el).filter(|d| query.matches(*d)).collect()
}

/// First following sibling element of `el` matching `query`.
pub fn find_next_sibling<'a>(el: ElementRef<'a>, query: Query<'_>) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|s| query.matches(*s))
}

/// Concatenated text of every text node below `el`, whitespace untouched.
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// The text of an element whose only content is a single string, looking
/// through chains of single-child elements. `None` for mixed or empty content.
pub fn single_string(el: ElementRef<'_>) -> Option<String> {
    let mut children = el.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    match only.value() {
        Node::Text(t) => Some(String::from(&**t)),
        Node::Element(_) => single_string(ElementRef::wrap(only)?),
        _ => None,
    }
}

/// A direct child of an element, as seen by the sample-block walkers.
#[derive(Debug, Clone)]
pub enum Child<'a> {
    Text(String),
    Element(ElementRef<'a>),
    Other,
}

impl Child<'_> {
    /// Same rule as [`single_string`], applied to a child node: a text node is
    /// its own single string.
    pub fn single_string(&self) -> Option<String> {
        match self {
            Child::Text(t) => Some(t.clone()),
            Child::Element(el) => single_string(*el),
            Child::Other => None,
        }
    }

    /// Literal rendering: raw text for text nodes, outer markup for elements.
    /// Comments and other nodes render as nothing.
    pub fn render(&self) -> String {
        match self {
            Child::Text(t) => t.clone(),
            Child::Element(el) => el.html(),
            Child::Other => String::new(),
        }
    }
}

pub fn children(el: ElementRef<'_>) -> Vec<Child<'_>> {
    el.children()
        .map(|node| match node.value() {
            Node::Text(t) => Child::Text(String::from(&**t)),
            Node::Element(_) => ElementRef::wrap(node).map(Child::Element).unwrap_or(Child::Other),
            _ => Child::Other,
        })
        .collect()
}
