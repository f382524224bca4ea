use super::*;

#[test]
fn test_full_line_comment_is_stripped() {
    let raw = "-- create the users table\nCREATE TABLE users (id INTEGER PRIMARY KEY)";
    let normalized = normalize(raw);
    assert_eq!(normalized, "CREATE TABLE users (id INTEGER PRIMARY KEY);");
    assert!(!normalized.contains("create the users table"));
}

#[test]
fn test_indented_comment_is_stripped() {
    let raw = "    -- indented\nSELECT 1;";
    assert_eq!(normalize(raw), "SELECT 1;");
}

#[test]
fn test_existing_separator_not_duplicated() {
    assert_eq!(normalize("SELECT 1;  \n\n"), "SELECT 1;");
}

#[test]
fn test_mid_statement_comment_is_kept() {
    let raw = "CREATE TABLE t (\n  id INTEGER -- primary id\n)";
    let normalized = normalize(raw);
    assert!(normalized.contains("-- primary id"));
    assert!(normalized.ends_with(");"));
}

#[test]
fn test_comment_only_body_normalizes_to_empty() {
    assert_eq!(normalize("-- a\n   -- b\n\n"), "");
}

#[test]
fn test_strip_comment_lines_preserves_other_lines() {
    let raw = "CREATE TABLE a (id INTEGER);\n-- gap\nCREATE TABLE b (id INTEGER);";
    assert_eq!(
        strip_comment_lines(raw),
        "CREATE TABLE a (id INTEGER);\nCREATE TABLE b (id INTEGER);"
    );
}
