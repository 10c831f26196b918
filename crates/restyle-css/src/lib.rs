//! CSS pipeline for user themes.
//!
//! Turns a raw, user-authored CSS snippet into the stylesheet that gets
//! injected into a page:
//! - Custom-property declarations are lifted to `:root` and `html, body`
//! - Every ordinary rule property is marked `!important`
//! - Known script-injection vectors are stripped before injection
//! - Target patterns are matched against the page URL

pub mod assemble;
pub mod declaration;
pub mod matcher;
pub mod sanitize;
pub mod transform;
pub mod validate;

pub use assemble::assemble;
pub use declaration::Declaration;
pub use matcher::matches;
pub use sanitize::{find_denylisted, sanitize_css};
pub use transform::{split_source, transform, transform_remainder_only, ParsedSource};
pub use validate::{is_valid, validate, CssIssue, IssueKind, Severity};
