//! Theme target pattern matching against the current page URL.
//!
//! A pattern is one of:
//! - empty, `all sites` or `for all sites` (any case): every page
//! - a wildcard pattern such as `*://*.example.com/*`, tested as an anchored,
//!   case-insensitive regex over the full page URL
//! - a URL or bare host (`example.com`, `https://docs.example.com/guide`),
//!   matched by exact URL, exact host, or subdomain relation in either
//!   direction
//!
//! Anything that fails to parse falls back to plain substring checks, so
//! matching is total: it never panics and never errors.

use regex::RegexBuilder;
use url::Url;

/// Patterns that mean "apply everywhere".
const ALL_SITES_PATTERNS: &[&str] = &["all sites", "for all sites"];

/// Decide whether a theme with `pattern` applies to `page_url`.
pub fn matches(page_url: &str, pattern: &str) -> bool {
    let pattern = pattern.trim();

    if pattern.is_empty()
        || ALL_SITES_PATTERNS
            .iter()
            .any(|all| pattern.eq_ignore_ascii_case(all))
    {
        return true;
    }

    // Wildcard patterns are usually not parseable URLs (`*://…`), so they
    // are tested before the parse step.
    if pattern.contains('*') && wildcard_matches(page_url, pattern) {
        return true;
    }

    match (Url::parse(page_url), parse_pattern(pattern)) {
        (Ok(page), Ok(target)) => urls_match(&page, &target),
        _ => textual_fallback(page_url, pattern),
    }
}

/// Parse a pattern as an absolute URL, assuming `https://` if no scheme.
fn parse_pattern(pattern: &str) -> Result<Url, url::ParseError> {
    if pattern.contains("://") {
        Url::parse(pattern)
    } else {
        Url::parse(&format!("https://{pattern}"))
    }
}

fn urls_match(page: &Url, target: &Url) -> bool {
    if page.as_str() == target.as_str() {
        return true;
    }

    match (page.host_str(), target.host_str()) {
        (Some(page_host), Some(target_host)) => hosts_related(page_host, target_host),
        _ => false,
    }
}

/// Same host, or one is a dot-suffix (subdomain) of the other.
///
/// Deliberately symmetric: a pattern for `a.example.com` also matches
/// `example.com`.
fn hosts_related(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.eq_ignore_ascii_case(b) {
        return true;
    }
    let a = a.to_ascii_lowercase();
    let b = b.to_ascii_lowercase();
    a.ends_with(&format!(".{b}")) || b.ends_with(&format!(".{a}"))
}

/// Compile `pattern` to `^…$` with each `*` as `.*` and test the full URL.
fn wildcard_matches(page_url: &str, pattern: &str) -> bool {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    match RegexBuilder::new(&format!("^{body}$"))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.is_match(page_url),
        Err(_) => false,
    }
}

/// Substring matching used when either side is not a parseable URL.
fn textual_fallback(page_url: &str, pattern: &str) -> bool {
    if page_url.contains(pattern) {
        return true;
    }
    let host = Url::parse(page_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();
    !host.is_empty() && pattern.contains(&host)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- All sites ---

    #[test]
    fn empty_pattern_matches_everything() {
        assert!(matches("https://example.com/", ""));
        assert!(matches("about:blank", "   "));
        assert!(matches("not a url", ""));
    }

    #[test]
    fn all_sites_keywords_match_everything() {
        assert!(matches("https://a.test/", "all sites"));
        assert!(matches("https://a.test/", "For All Sites"));
        assert!(matches("https://a.test/", "ALL SITES"));
    }

    // --- Hosts ---

    #[test]
    fn bare_host_matches_subdomain_page() {
        assert!(matches("https://www.example.com/path", "example.com"));
    }

    #[test]
    fn exact_host_matches_any_path() {
        assert!(matches("https://example.com/a/b?c=d", "example.com"));
        assert!(matches("http://example.com/", "https://example.com/other"));
    }

    #[test]
    fn subdomain_relation_is_symmetric() {
        assert!(matches("https://a.b.com/", "b.com"));
        assert!(matches("https://b.com/", "a.b.com"));
    }

    #[test]
    fn host_comparison_ignores_case() {
        assert!(matches("https://WWW.Example.COM/", "example.com"));
    }

    #[test]
    fn suffix_must_be_on_a_dot_boundary() {
        assert!(!matches("https://notexample.com/", "example.com"));
        assert!(!matches("https://example.com.evil.test/", "example.com"));
    }

    #[test]
    fn unrelated_hosts_do_not_match() {
        assert!(!matches("https://example.org/", "example.com"));
    }

    #[test]
    fn identical_full_urls_match() {
        assert!(matches("https://example.com/page", "https://example.com/page"));
    }

    // --- Wildcards ---

    #[test]
    fn wildcard_scheme_and_subdomain() {
        assert!(matches("https://foo.example.com/x", "*://*.example.com/*"));
        assert!(!matches("https://foo.example.org/x", "*://*.example.com/*"));
    }

    #[test]
    fn wildcard_is_anchored_and_case_insensitive() {
        assert!(matches("https://EXAMPLE.com/docs/a", "https://example.com/docs/*"));
        assert!(!matches("https://other.test/docs/a", "https://example.com/docs/*"));
    }

    #[test]
    fn wildcard_pattern_still_matches_on_host() {
        // Host equality applies to parseable wildcard patterns too.
        assert!(matches("https://example.com/blog/a", "https://example.com/docs/*"));
    }

    #[test]
    fn wildcard_escapes_regex_metacharacters() {
        assert!(matches("https://a.test/?q=(1)", "https://a.test/?q=(*)"));
        assert!(!matches("https://aXtest/", "https://a.test/*"));
    }

    // --- Fallback ---

    #[test]
    fn unparseable_page_uses_substring_fallback() {
        assert!(matches("intranet page example.com", "example.com"));
        assert!(!matches("intranet page", "example.com"));
    }

    #[test]
    fn unparseable_pattern_matches_when_it_contains_page_host() {
        assert!(matches("https://example.com/", "https://exa mple.com example.com"));
    }

    #[test]
    fn page_without_host_does_not_match_host_pattern() {
        assert!(!matches("about:blank", "example.com"));
        assert!(!matches("data:text/html,hi", "example.com"));
    }

    #[test]
    fn never_panics_on_garbage() {
        for pattern in ["[", "*", "**", "://", "https://", "\u{0}", "*[(*"] {
            let _ = matches("https://example.com/", pattern);
            let _ = matches("::::", pattern);
        }
    }
}
