//! Best-effort denylist sanitization of theme CSS before injection.
//!
//! Strips, case-insensitively:
//! - `<script>…</script>` spans (and stray script tags)
//! - `javascript:` URL schemes, rewriting `url(javascript:` to `url(`
//! - `expression(` (legacy IE dynamic properties)
//!
//! This is NOT a security boundary. The user authors their own CSS; the
//! denylist only keeps obviously hostile pasted snippets inert.

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// PATTERNS
// =============================================================================

static URL_JAVASCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)url\(\s*javascript:").unwrap());

static SCRIPT_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());

static SCRIPT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?script\b[^>]*>").unwrap());

static JAVASCRIPT_SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").unwrap());

static EXPRESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)expression\(").unwrap());

/// Human-readable names of the denylisted constructs, for diagnostics.
static DENYLIST: &[(&str, &LazyLock<Regex>)] = &[
    ("<script>", &SCRIPT_TAG_RE),
    ("javascript:", &JAVASCRIPT_SCHEME_RE),
    ("expression(", &EXPRESSION_RE),
];

// =============================================================================
// SANITIZATION
// =============================================================================

/// Remove denylisted constructs from `css`.
///
/// Passes repeat until nothing changes, so stripping a token cannot splice
/// its neighbours into a new one. Every effective pass shortens the text.
pub fn sanitize_css(css: &str) -> String {
    let mut out = strip_once(css);
    loop {
        let next = strip_once(&out);
        if next == out {
            return out;
        }
        out = next;
    }
}

fn strip_once(css: &str) -> String {
    // Order matters: the url( rewrite must run before the bare scheme strip.
    let out = URL_JAVASCRIPT_RE.replace_all(css, "url(");
    let out = SCRIPT_SPAN_RE.replace_all(&out, "");
    let out = SCRIPT_TAG_RE.replace_all(&out, "");
    let out = JAVASCRIPT_SCHEME_RE.replace_all(&out, "");
    let out = EXPRESSION_RE.replace_all(&out, "");
    out.into_owned()
}

/// Names of denylisted constructs present in `css` (what sanitizing would strip).
pub fn find_denylisted(css: &str) -> Vec<&'static str> {
    DENYLIST
        .iter()
        .filter(|(_, re)| re.is_match(css))
        .map(|(name, _)| *name)
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_ordinary_css_untouched() {
        let css = "body {\n  color: red !important;\n  background: url(https://x.test/a.png);\n}";
        assert_eq!(sanitize_css(css), css);
    }

    #[test]
    fn strips_script_spans() {
        let css = "a { color: red }<script>alert(1)</script>b { x: y }";
        assert_eq!(sanitize_css(css), "a { color: red }b { x: y }");
    }

    #[test]
    fn strips_multiline_script_case_insensitive() {
        let css = "a{}<SCRIPT type=\"text/javascript\">\nalert(1)\n</Script >b{}";
        assert_eq!(sanitize_css(css), "a{}b{}");
    }

    #[test]
    fn strips_unclosed_script_tag() {
        assert_eq!(sanitize_css("a{}<script>"), "a{}");
    }

    #[test]
    fn rewrites_url_javascript() {
        let css = "a { background: url(javascript:alert(1)) }";
        assert_eq!(sanitize_css(css), "a { background: url(alert(1)) }");
    }

    #[test]
    fn rewrites_url_javascript_with_whitespace_and_case() {
        let css = "a { background: URL(  JavaScript:evil()) }";
        assert_eq!(sanitize_css(css), "a { background: url(evil()) }");
    }

    #[test]
    fn strips_bare_javascript_scheme() {
        assert_eq!(sanitize_css("a { b: javascript:void(0) }"), "a { b: void(0) }");
    }

    #[test]
    fn strips_expression() {
        let css = "a { width: expression(document.body.clientWidth) }";
        assert_eq!(sanitize_css(css), "a { width: document.body.clientWidth) }");
        assert!(!sanitize_css("a { w: EXPRESSION(1) }").to_lowercase().contains("expression("));
    }

    #[test]
    fn spliced_tokens_are_stripped_too() {
        let out = sanitize_css("url(javajavascript:script:alert(1))");
        assert_eq!(out, "url(alert(1))");
        assert!(find_denylisted(&out).is_empty());

        let out = sanitize_css("expexpression(ression(1)");
        assert_eq!(out, "1)");
        assert!(find_denylisted(&out).is_empty());

        let out = sanitize_css("a{}<scr<script></script>ipt>b{}");
        assert!(find_denylisted(&out).is_empty());
    }

    #[test]
    fn find_denylisted_reports_each_construct() {
        let found = find_denylisted("<script>x</script> a { b: expression(1); c: javascript:1 }");
        assert_eq!(found, vec!["<script>", "javascript:", "expression("]);
        assert!(find_denylisted("a { color: red }").is_empty());
    }
}
