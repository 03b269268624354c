//! Small helpers over `scraper` shared by the resolver and the locators

use crate::{IngestError, Result};
use scraper::{ElementRef, Selector};

/// Compile a CSS selector, reporting failures as parse errors
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| IngestError::Parse(format!("invalid selector '{}': {}", css, e)))
}

/// Rendered text of an element: text nodes concatenated, whitespace runs
/// (including non-breaking spaces) collapsed to one space, ends trimmed
pub fn visible_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    normalize_ws(&raw)
}

pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether any anchor below `scope` has an href containing `fragment`
pub fn has_link_containing(scope: ElementRef<'_>, anchors: &Selector, fragment: &str) -> bool {
    scope
        .select(anchors)
        .any(|a| a.value().attr("href").is_some_and(|href| href.contains(fragment)))
}

/// Direct element children of `parent` with the given tag name
pub fn child_elements<'a>(
    parent: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == tag)
}
