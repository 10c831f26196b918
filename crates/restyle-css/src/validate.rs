//! Minimal syntactic checks for theme source.
//!
//! Reports problems the transformer would silently pass through. It never
//! rewrites input and never blocks application; callers decide whether to
//! surface the issues.

use crate::sanitize::find_denylisted;

/// What kind of problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// A `--name` line with no `:`; it is not applied as a variable.
    MissingColon,
    /// A `}` with no matching `{`.
    UnmatchedClose,
    /// A `{` never closed before end of input.
    UnclosedBlock,
    /// A `{` with no selector text before it.
    EmptySelector,
    /// A construct that sanitization will strip.
    Denylisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl IssueKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::MissingColon | Self::UnmatchedClose | Self::UnclosedBlock => Severity::Error,
            Self::EmptySelector | Self::Denylisted => Severity::Warning,
        }
    }
}

/// One reported problem, with a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssIssue {
    pub line: usize,
    pub kind: IssueKind,
    pub message: String,
}

impl CssIssue {
    fn new(line: usize, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// Check raw theme source, returning every issue found in line order.
pub fn validate(raw: &str) -> Vec<CssIssue> {
    let mut issues = Vec::new();
    let mut open_lines: Vec<usize> = Vec::new();
    let mut selector = String::new();

    for (index, line) in raw.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();

        if trimmed.starts_with("--") && !trimmed.contains(':') {
            issues.push(CssIssue::new(
                line_no,
                IssueKind::MissingColon,
                format!("custom property '{trimmed}' has no ':' and will not be applied"),
            ));
            continue;
        }

        for ch in line.chars() {
            match ch {
                '{' => {
                    if selector.trim().is_empty() {
                        issues.push(CssIssue::new(
                            line_no,
                            IssueKind::EmptySelector,
                            "block has no selector",
                        ));
                    }
                    open_lines.push(line_no);
                    selector.clear();
                }
                '}' => {
                    if open_lines.pop().is_none() {
                        issues.push(CssIssue::new(
                            line_no,
                            IssueKind::UnmatchedClose,
                            "'}' without a matching '{'",
                        ));
                    }
                    selector.clear();
                }
                ';' if open_lines.is_empty() => selector.clear(),
                _ => selector.push(ch),
            }
        }
        selector.push('\n');
    }

    for line_no in open_lines {
        issues.push(CssIssue::new(
            line_no,
            IssueKind::UnclosedBlock,
            "'{' is never closed",
        ));
    }

    for name in find_denylisted(raw) {
        issues.push(CssIssue::new(
            0,
            IssueKind::Denylisted,
            format!("'{name}' will be stripped before injection"),
        ));
    }

    issues.sort_by_key(|issue| issue.line);
    issues
}

/// True when `validate` reports no errors (warnings are allowed).
pub fn is_valid(raw: &str) -> bool {
    validate(raw)
        .iter()
        .all(|issue| issue.severity() != Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(raw: &str) -> Vec<IssueKind> {
        validate(raw).into_iter().map(|i| i.kind).collect()
    }

    #[test]
    fn clean_source_has_no_issues() {
        assert!(validate("--a: 1;\nbody {\n  color: red;\n}\n").is_empty());
        assert!(is_valid("--a: 1;\nbody { color: red }"));
    }

    #[test]
    fn empty_source_is_valid() {
        assert!(validate("").is_empty());
    }

    #[test]
    fn flags_custom_property_without_colon() {
        let issues = validate("body { color: red }\n--orphan");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingColon);
        assert_eq!(issues[0].line, 2);
        assert!(!is_valid("--orphan"));
    }

    #[test]
    fn flags_unmatched_close() {
        assert_eq!(kinds("a { color: red }\n}"), vec![IssueKind::UnmatchedClose]);
    }

    #[test]
    fn flags_unclosed_block_at_its_opening_line() {
        let issues = validate("a { color: red }\nb {\n  color: blue;");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::UnclosedBlock);
        assert_eq!(issues[0].line, 2);
    }

    #[test]
    fn flags_empty_selector_as_warning() {
        let issues = validate("{ color: red }");
        assert_eq!(issues[0].kind, IssueKind::EmptySelector);
        assert_eq!(issues[0].severity(), Severity::Warning);
        assert!(is_valid("{ color: red }"));
    }

    #[test]
    fn multiline_selector_is_not_empty() {
        assert!(validate("h1,\nh2\n{ margin: 0 }").is_empty());
    }

    #[test]
    fn reports_denylisted_constructs_first() {
        let issues = validate("a { b: expression(1) }");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Denylisted);
        assert_eq!(issues[0].line, 0);
    }
}
