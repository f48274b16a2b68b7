//! Row click handling

/// Tags whose clicks belong to the element itself rather than the row.
const INTERACTIVE_TAGS: [&str; 3] = ["input", "button", "a"];

/// The element a click landed on, described by the tag names from the
/// target up through its ancestors.
///
/// # Example
///
/// ```
/// use table_batteries::row_click::ClickTarget;
///
/// let target = ClickTarget::new(["svg", "button", "td", "tr", "tbody"]);
/// assert!(target.is_interactive_element_in_the_way());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
    path: Vec<String>,
}

impl ClickTarget {
    /// A target given by its own tag followed by each ancestor's tag.
    pub fn new<I>(path: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// A click directly on a data cell.
    pub fn cell() -> Self {
        Self::new(["td", "tr"])
    }

    /// Whether an input, button or link sits between the target and its row.
    ///
    /// The walk stops at the first `tr`.
    pub fn is_interactive_element_in_the_way(&self) -> bool {
        for tag in &self.path {
            let tag = tag.to_ascii_lowercase();
            if tag == "tr" {
                return false;
            }
            if INTERACTIVE_TAGS.contains(&tag.as_str()) {
                return true;
            }
        }
        false
    }
}

/// Calls `on_row_click` unless the click came from a nested interactive
/// element. Returns whether it was called.
pub fn handle_propagated_row_click(target: &ClickTarget, on_row_click: impl FnOnce()) -> bool {
    if target.is_interactive_element_in_the_way() {
        log::trace!("row click: suppressed, target is inside an interactive element");
        return false;
    }
    on_row_click();
    true
}
