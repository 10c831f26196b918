//! Persisted data shapes: the theme record, the id-keyed collection and the
//! import/export bundle.

mod bundle;
mod collection;
mod theme;

pub use bundle::{ThemeBundle, BUNDLE_VERSION};
pub use collection::ThemeCollection;
pub use theme::Theme;
