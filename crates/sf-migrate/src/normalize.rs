//! Statement normalization for migration bodies.
//!
//! Only whole-line `--` comments are removed. A comment that follows SQL on
//! the same line is left in place. Statement splitting lives in
//! [`crate::parser`].

/// Statement separator appended to normalized bodies.
pub const SEPARATOR: char = ';';

fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with("--")
}

/// Remove every line whose first non-whitespace characters are `--`.
pub fn strip_comment_lines(raw: &str) -> String {
    raw.lines()
        .filter(|line| !is_comment_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip comment lines, trim, and guarantee a trailing separator.
///
/// Returns an empty string when nothing but comments and whitespace remain.
///
/// # Examples
/// ```
/// use sf_migrate::normalize::normalize;
/// assert_eq!(normalize("-- users\nCREATE TABLE users (id INTEGER)"), "CREATE TABLE users (id INTEGER);");
/// assert_eq!(normalize("-- nothing here"), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let stripped = strip_comment_lines(raw);
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.ends_with(SEPARATOR) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{SEPARATOR}")
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
