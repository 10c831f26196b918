//! `transform`, `check` and `match`.

use std::io::Write;
use std::process::ExitCode;

use restyle_common::RestyleError;
use restyle_css::{matches, validate, Severity};

use super::write_out;

/// Print the final stylesheet for `source`.
pub fn transform(source: &str, out: &mut dyn Write) -> Result<ExitCode, RestyleError> {
    write_out(out, restyle_css::transform(source).trim_end())?;
    Ok(ExitCode::SUCCESS)
}

/// Print every issue in `source`. Fails if any is an error.
pub fn check(source: &str, out: &mut dyn Write) -> Result<ExitCode, RestyleError> {
    let issues = validate(source);
    if issues.is_empty() {
        write_out(out, "ok")?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut failed = false;
    for issue in &issues {
        let severity = match issue.severity() {
            Severity::Error => {
                failed = true;
                "error"
            }
            Severity::Warning => "warning",
        };
        write_out(out, &format!("line {}: {severity}: {}", issue.line, issue.message))?;
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Print whether `pattern` targets `url`; the exit code says the same.
pub fn match_url(url: &str, pattern: &str, out: &mut dyn Write) -> Result<ExitCode, RestyleError> {
    if matches(url, pattern) {
        write_out(out, "match")?;
        Ok(ExitCode::SUCCESS)
    } else {
        write_out(out, "no match")?;
        Ok(ExitCode::FAILURE)
    }
}
