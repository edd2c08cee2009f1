use scraper::{ElementRef, Selector};
use tracing::error;

use crate::{Error, Result};

/// Compile a CSS selector, reporting a malformed one as a typed failure.
fn selector(sel: &str) -> Result<Selector> {
    Selector::parse(sel).map_err(|_| Error::BadSelector(sel.into()))
}

/// First descendant of `scope` matching `sel`.
///
/// Attribute constraints go in the selector itself, including substring and
/// suffix forms such as `a[href$="pdf-a4.zip"]`. A missing match means the
/// page no longer looks the way the scraper expects, so it is logged and
/// returned as [`Error::TagNotFound`] for the caller to propagate.
pub fn find_tag<'a>(scope: ElementRef<'a>, sel: &str) -> Result<ElementRef<'a>> {
    let selector = selector(sel)?;
    scope.select(&selector).next().ok_or_else(|| {
        error!("no tag matched selector `{sel}`");
        Error::TagNotFound(sel.into())
    })
}

/// Every descendant of `scope` matching `sel`, in document order. An empty
/// result is not an error.
pub fn find_all<'a>(scope: ElementRef<'a>, sel: &str) -> Result<Vec<ElementRef<'a>>> {
    let selector = selector(sel)?;
    Ok(scope.select(&selector).collect())
}

/// Attribute lookup that reports a missing attribute like a missing tag.
pub fn require_attr<'a>(node: ElementRef<'a>, name: &str) -> Result<&'a str> {
    node.value().attr(name).ok_or_else(|| {
        let sel = format!("{}[{name}]", node.value().name());
        error!("no tag matched selector `{sel}`");
        Error::TagNotFound(sel)
    })
}

/// Concatenated text of all descendant text nodes, exactly as they appear.
pub fn text_of(node: ElementRef<'_>) -> String {
    node.text().collect()
}
