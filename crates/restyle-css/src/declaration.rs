use std::fmt;

/// A `--name: value` custom-property statement taken from theme source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, always starting with `--`.
    pub name: String,
    /// Raw value text, without the terminating `;`.
    pub value: String,
}

impl Declaration {
    /// Parse one source line as a declaration.
    ///
    /// A line qualifies iff, once trimmed, it starts with `--` and contains
    /// a `:`. Anything else returns `None` and belongs to the rule remainder.
    pub fn parse_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if !trimmed.starts_with("--") {
            return None;
        }
        let (name, value) = trimmed.split_once(':')?;
        let value = value.trim();
        let value = value.strip_suffix(';').unwrap_or(value).trim_end();
        Some(Self {
            name: name.trim().to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.name, self.value)
    }
}
