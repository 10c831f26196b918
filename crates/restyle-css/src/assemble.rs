//! Final stylesheet assembly.

use crate::declaration::Declaration;

/// Selectors that receive the theme's custom properties, in emission order.
///
/// `html, body` repeats the `:root` block so that page-authored variables
/// declared on those elements are overridden at equal specificity.
pub const DECLARATION_SCOPES: &[&str] = &[":root", "html, body"];

/// Combine declarations and already-rewritten rules into one stylesheet.
///
/// Declarations are emitted verbatim, in order, duplicates included: which
/// one wins is left to the cascade. With no declarations the rules are
/// returned unchanged.
pub fn assemble(declarations: &[Declaration], rules: &str) -> String {
    if declarations.is_empty() {
        return rules.to_string();
    }

    let body: String = declarations
        .iter()
        .map(|d| format!("  {d}\n"))
        .collect();

    let mut css = String::new();
    for (i, scope) in DECLARATION_SCOPES.iter().enumerate() {
        if i > 0 {
            css.push('\n');
        }
        css.push_str(scope);
        css.push_str(" {\n");
        css.push_str(&body);
        css.push_str("}\n");
    }

    if !rules.trim().is_empty() {
        css.push('\n');
        css.push_str(rules);
    }

    css
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, value: &str) -> Declaration {
        Declaration {
            name: name.into(),
            value: value.into(),
        }
    }

    #[test]
    fn no_declarations_returns_rules() {
        assert_eq!(assemble(&[], "a {\n  b: c !important;\n}"), "a {\n  b: c !important;\n}");
    }

    #[test]
    fn emits_root_then_html_body() {
        let css = assemble(&[decl("--primary", "#007bff")], "");
        assert_eq!(
            css,
            ":root {\n  --primary: #007bff;\n}\n\nhtml, body {\n  --primary: #007bff;\n}\n"
        );
    }

    #[test]
    fn rules_follow_declaration_blocks() {
        let css = assemble(&[decl("--a", "1")], "p {\n  x: y !important;\n}");
        assert!(css.ends_with("}\n\np {\n  x: y !important;\n}"));
    }

    #[test]
    fn duplicates_are_all_retained_in_order() {
        let css = assemble(&[decl("--a", "1"), decl("--a", "2")], "");
        let root = &css[..css.find("html, body").unwrap()];
        let first = root.find("--a: 1;").unwrap();
        let second = root.find("--a: 2;").unwrap();
        assert!(first < second);
        assert_eq!(css.matches("--a: 2;").count(), 2);
    }
}
