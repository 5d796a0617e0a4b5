//! Small helpers over `scraper` shared by the page extractors.

use scraper::{ElementRef, Selector};

/// Parses a selector known at compile time.
///
/// # Panics
///
/// Panics if `css` is not a valid selector. Only called with literals.
#[allow(clippy::expect_used)]
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector must parse")
}

/// Text of `element` with every text node trimmed, then concatenated.
///
/// Cells that split a value across adjacent nodes (`<span>W</span><span>Won</span>`)
/// therefore come out joined (`WWon`).
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}
