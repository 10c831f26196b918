use restyle_inject::StyleHost;

/// A styled page as seen by the controller.
pub trait Page: StyleHost {
    /// The page's current URL.
    fn url(&self) -> String;

    /// Whether the document has finished loading.
    fn is_document_ready(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    /// Parse a DOM `visibilityState` value. Anything but `hidden` is visible.
    pub fn from_state(state: &str) -> Self {
        if state.eq_ignore_ascii_case("hidden") {
            Self::Hidden
        } else {
            Self::Visible
        }
    }
}
