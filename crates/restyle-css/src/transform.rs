//! Raw theme source → final stylesheet.
//!
//! The source is split line by line into custom-property declarations and
//! a rule remainder. The remainder gets `!important` appended to every
//! property so the theme beats the page's own rules; declarations are left
//! untouched and re-emitted at maximal scope by [`crate::assemble`].

use crate::assemble::assemble;
use crate::declaration::Declaration;

// =============================================================================
// SPLITTING
// =============================================================================

/// Theme source split into its two halves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSource {
    /// Declarations in source order; duplicates are kept.
    pub declarations: Vec<Declaration>,
    /// Every non-declaration line, in source order, newline-joined.
    pub remainder: String,
}

/// Separate declaration lines from the rule remainder.
///
/// A `--name` line without a colon is not a declaration; it stays in the
/// remainder verbatim and is reported by [`crate::validate`].
pub fn split_source(raw: &str) -> ParsedSource {
    let mut declarations = Vec::new();
    let mut remainder: Vec<&str> = Vec::new();

    for line in raw.lines() {
        match Declaration::parse_line(line) {
            Some(declaration) => declarations.push(declaration),
            None => remainder.push(line),
        }
    }

    ParsedSource {
        declarations,
        remainder: remainder.join("\n"),
    }
}

// =============================================================================
// IMPORTANCE INJECTION
// =============================================================================

/// Rewrite every rule in `remainder` so each property carries `!important`.
///
/// Chunks that do not split into a selector and a non-empty body are passed
/// through as-is, as is a trailing chunk with no closing `}`. Running this
/// on its own output is a no-op.
pub fn transform_remainder_only(remainder: &str) -> String {
    let chunks: Vec<&str> = remainder.split('}').collect();
    let last = chunks.len().saturating_sub(1);
    let mut rules: Vec<String> = Vec::with_capacity(chunks.len());

    for (index, chunk) in chunks.iter().enumerate() {
        let trimmed = chunk.trim();
        if trimmed.is_empty() {
            continue;
        }
        let terminated = index < last;

        if !terminated {
            rules.push(trimmed.to_string());
            continue;
        }

        match split_rule(trimmed) {
            Some((selector, body)) => rules.push(rewrite_rule(selector, body)),
            None => rules.push(format!("{trimmed}}}")),
        }
    }

    rules.join("\n")
}

/// Split a chunk once on its first `{`. Both halves must be non-blank.
fn split_rule(chunk: &str) -> Option<(&str, &str)> {
    let (selector, body) = chunk.split_once('{')?;
    let selector = selector.trim();
    if selector.is_empty() || body.trim().is_empty() {
        return None;
    }
    Some((selector, body))
}

fn rewrite_rule(selector: &str, body: &str) -> String {
    let properties: Vec<String> = body
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(|statement| {
            if has_important(statement) {
                statement.to_string()
            } else {
                format!("{statement} !important")
            }
        })
        .collect();

    format!("{selector} {{\n  {};\n}}", properties.join("; "))
}

/// True if the statement already ends in `!important` (any case, `! important` too).
fn has_important(statement: &str) -> bool {
    let lower = statement.to_ascii_lowercase();
    match lower.strip_suffix("important") {
        Some(rest) => rest.trim_end().ends_with('!'),
        None => false,
    }
}

// =============================================================================
// FULL PIPELINE
// =============================================================================

/// Transform raw theme source into the final, injectable stylesheet.
///
/// Deterministic and total: malformed input degrades to pass-through text.
pub fn transform(raw: &str) -> String {
    let parsed = split_source(raw);
    let rules = transform_remainder_only(&parsed.remainder);
    assemble(&parsed.declarations, &rules)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn squash(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    // --- Splitting ---

    #[test]
    fn split_separates_declarations_from_rules() {
        let parsed = split_source("--primary: #007bff;\nbody { color: red }\n  --gap: 4px;");
        assert_eq!(parsed.declarations.len(), 2);
        assert_eq!(parsed.declarations[0].name, "--primary");
        assert_eq!(parsed.declarations[1].name, "--gap");
        assert_eq!(parsed.remainder, "body { color: red }");
    }

    #[test]
    fn split_keeps_colonless_custom_property_in_remainder() {
        let parsed = split_source("--orphan\nbody { color: red }");
        assert!(parsed.declarations.is_empty());
        assert_eq!(parsed.remainder, "--orphan\nbody { color: red }");
    }

    #[test]
    fn split_keeps_duplicate_declarations() {
        let parsed = split_source("--a: 1;\n--a: 2;");
        assert_eq!(parsed.declarations.len(), 2);
        assert_eq!(parsed.declarations[1].value, "2");
    }

    // --- Importance injection ---

    #[test]
    fn adds_important_to_each_property() {
        let out = transform_remainder_only("a { color: red; margin: 0 }");
        assert_eq!(out, "a {\n  color: red !important; margin: 0 !important;\n}");
    }

    #[test]
    fn does_not_duplicate_existing_important() {
        let out = transform_remainder_only("a { color: red !important; top: 0 ! IMPORTANT }");
        assert_eq!(out, "a {\n  color: red !important; top: 0 ! IMPORTANT;\n}");
    }

    #[test]
    fn importance_injection_is_idempotent() {
        let input = "body { color: red }\n.btn, .link { padding: 2px 4px; border: none; }";
        let once = transform_remainder_only(input);
        let twice = transform_remainder_only(&once);
        assert_eq!(once, twice);
        assert_eq!(once.matches("!important").count(), 3);
    }

    #[test]
    fn preserves_rule_order() {
        let out = transform_remainder_only("a { x: 1 }\nb { y: 2 }\nc { z: 3 }");
        let a = out.find("a {").unwrap();
        let b = out.find("b {").unwrap();
        let c = out.find("c {").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn unterminated_rule_is_kept_as_trailing_text() {
        let out = transform_remainder_only("a { color: red }\nbody { color: blue");
        assert!(out.starts_with("a {\n  color: red !important;\n}"));
        assert!(out.ends_with("body { color: blue"));
    }

    #[test]
    fn chunk_without_brace_passes_through() {
        let out = transform_remainder_only("just text }");
        assert_eq!(out, "just text}");
    }

    #[test]
    fn empty_body_passes_through() {
        let out = transform_remainder_only("a {}");
        assert_eq!(out, "a {}");
    }

    #[test]
    fn stray_closing_braces_are_dropped() {
        let out = transform_remainder_only("a { color: red }}}");
        assert_eq!(out, "a {\n  color: red !important;\n}");
    }

    #[test]
    fn empty_remainder_is_empty() {
        assert_eq!(transform_remainder_only(""), "");
        assert_eq!(transform_remainder_only("  \n \n"), "");
    }

    // --- Full pipeline ---

    #[test]
    fn transform_example_with_declaration_and_rule() {
        let out = transform("--primary: #007bff;\nbody { color: red }");
        let flat = squash(&out);
        assert!(flat.contains(":root { --primary: #007bff; }"));
        assert!(flat.contains("html, body { --primary: #007bff; }"));
        assert!(flat.contains("body { color: red !important; }"));
        assert!(flat.find(":root").unwrap() < flat.find("html, body").unwrap());
    }

    #[test]
    fn transform_without_declarations_emits_rules_only() {
        let out = transform("p { margin: 0 }");
        assert_eq!(out, "p {\n  margin: 0 !important;\n}");
        assert!(!out.contains(":root"));
    }

    #[test]
    fn declarations_never_get_important() {
        let out = transform("--a: 1;\n--b: 2;");
        assert!(!out.contains("!important"));
        assert_eq!(out.matches("--a: 1;").count(), 2);
    }

    #[test]
    fn transform_is_deterministic() {
        let input = "--x: 1px;\n.a { b: c }\n--y: red;\nbroken { ";
        assert_eq!(transform(input), transform(input));
    }

    #[test]
    fn transform_of_empty_source_is_empty() {
        assert_eq!(transform(""), "");
    }
}
