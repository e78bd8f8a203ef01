//! Pure layout services: name validation, the save decision and page rendering.
//!
//! Nothing in this module touches a store or the terminal, so every rule
//! here can be checked in isolation.

use super::errors::CommandError;
use super::models::Layout;
use std::fmt;

/// A validated layout name, used as the key in a layout store.
///
/// Surrounding whitespace is trimmed away; the trimmed text must be non-empty.
///
/// # Examples
///
/// ```
/// use dndbuilder::domain::LayoutName;
///
/// let name = LayoutName::parse("  demo1 ").unwrap();
/// assert_eq!(name.as_str(), "demo1");
/// assert!(LayoutName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutName(String);

impl LayoutName {
    /// Validates raw user input.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::EmptyName`] for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(CommandError::EmptyName)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a save should do once the existence check is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDecision {
    Proceed,
    Abort,
}

/// Decides whether a save goes ahead.
///
/// A name that is not stored yet is always written. An existing name is only
/// overwritten when the user confirmed it; `confirmed` is ignored otherwise.
///
/// # Examples
///
/// ```
/// use dndbuilder::domain::{decide_save, SaveDecision};
///
/// assert_eq!(decide_save(false, false), SaveDecision::Proceed);
/// assert_eq!(decide_save(true, true), SaveDecision::Proceed);
/// assert_eq!(decide_save(true, false), SaveDecision::Abort);
/// ```
pub fn decide_save(existing: bool, confirmed: bool) -> SaveDecision {
    if !existing || confirmed {
        SaveDecision::Proceed
    } else {
        SaveDecision::Abort
    }
}

/// Renders a layout as a static, unstyled HTML page.
///
/// Each placed item becomes one `<div>` line holding its identifier, in layout
/// order. The page is a one-way export and is never parsed back.
pub struct PageRenderer;

impl PageRenderer {
    pub const TITLE: &'static str = "Published Page";

    /// Renders the full document.
    ///
    /// # Examples
    ///
    /// ```
    /// use dndbuilder::domain::{Layout, PageRenderer, PlacedItem};
    ///
    /// let layout: Layout = vec![PlacedItem::new("Label")].into();
    /// let page = PageRenderer::render(&layout);
    /// assert!(page.contains("<div>Label</div>"));
    /// ```
    pub fn render(layout: &Layout) -> String {
        let mut page = format!("<html><body><h1>{}</h1><div>\n", Self::TITLE);
        for line in Self::item_lines(layout) {
            page.push_str(&line);
            page.push('\n');
        }
        page.push_str("</div></body></html>\n");
        page
    }

    /// One rendered line per placed item.
    pub fn item_lines(layout: &Layout) -> Vec<String> {
        layout
            .iter()
            .map(|item| format!("<div>{}</div>", escape_html(&item.id)))
            .collect()
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
