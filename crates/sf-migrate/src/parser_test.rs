use super::*;

// ── split_statements ───────────────────────────────────────────────────

#[test]
fn test_split_statements_in_order() {
    let raw = "CREATE TABLE a (id INTEGER);\nCREATE TABLE b (id INTEGER);\nINSERT INTO a VALUES (1);";
    assert_eq!(
        split_statements(raw),
        vec![
            "CREATE TABLE a (id INTEGER)",
            "CREATE TABLE b (id INTEGER)",
            "INSERT INTO a VALUES (1)",
        ]
    );
}

#[test]
fn test_split_statements_drops_blank_and_comment_fragments() {
    let raw = "-- header\nSELECT 1;;\n  ;\nSELECT 2; -- trailing note";
    assert_eq!(split_statements(raw), vec!["SELECT 1", "SELECT 2"]);
}

#[test]
fn test_split_statements_ignores_separator_in_literal() {
    let raw = "INSERT INTO notes VALUES ('a;b');\nINSERT INTO notes VALUES ('it''s; fine')";
    assert_eq!(
        split_statements(raw),
        vec![
            "INSERT INTO notes VALUES ('a;b')",
            "INSERT INTO notes VALUES ('it''s; fine')",
        ]
    );
}

#[test]
fn test_split_statements_ignores_separator_in_quoted_identifier() {
    let raw = r#"CREATE TABLE "odd;name" (id INTEGER); SELECT 1"#;
    assert_eq!(
        split_statements(raw),
        vec![r#"CREATE TABLE "odd;name" (id INTEGER)"#, "SELECT 1"]
    );
}

#[test]
fn test_split_statements_without_trailing_separator() {
    assert_eq!(split_statements("SELECT 1"), vec!["SELECT 1"]);
}

#[test]
fn test_apostrophe_in_trailing_comment_does_not_merge_statements() {
    let raw = "CREATE TABLE a (x INT); -- don't\nCREATE TABLE b (y INT);";
    assert_eq!(
        split_statements(raw),
        vec!["CREATE TABLE a (x INT)", "CREATE TABLE b (y INT)"]
    );
}

#[test]
fn test_separator_in_block_comment_does_not_split() {
    let raw = "CREATE TABLE a (x INT /* one; two */);\nSELECT 1;";
    assert_eq!(
        split_statements(raw),
        vec!["CREATE TABLE a (x INT /* one; two */)", "SELECT 1"]
    );
}

#[test]
fn test_comment_inside_statement_is_kept() {
    let raw = "CREATE TABLE t (\n  id INTEGER -- primary id\n);";
    assert_eq!(
        split_statements(raw),
        vec!["CREATE TABLE t (\n  id INTEGER -- primary id\n)"]
    );
}

#[test]
fn test_comment_only_body_has_no_statements() {
    assert!(split_statements("-- a\n/* b */\n  ;\n").is_empty());
}

#[test]
fn test_untokenizable_body_is_one_statement() {
    let raw = "-- broken\nINSERT INTO notes VALUES ('unterminated);";
    assert_eq!(
        split_statements(raw),
        vec!["INSERT INTO notes VALUES ('unterminated)"]
    );
}

// ── parse_create_table ─────────────────────────────────────────────────

#[test]
fn test_parse_create_table_column_and_table_references() {
    let sql = r#"CREATE TABLE order_items (
        order_id INTEGER REFERENCES orders(id),
        product_id INTEGER,
        other_id INTEGER REFERENCES orders (id),
        FOREIGN KEY (product_id) REFERENCES "shop"."products" (id)
    )"#;
    let definition = parse_create_table(sql).unwrap();
    assert_eq!(definition.table, "order_items");
    assert_eq!(
        definition.references,
        vec!["orders".to_string(), "shop.products".to_string()]
    );
}

#[test]
fn test_parse_create_table_quoted_name_with_spaces() {
    let sql = r#"CREATE TABLE "order lines" (id INTEGER, cart_id INTEGER REFERENCES "saved carts"(id))"#;
    let definition = parse_create_table(sql).unwrap();
    assert_eq!(definition.table, "order lines");
    assert_eq!(definition.references, vec!["saved carts".to_string()]);
}

#[test]
fn test_parse_create_table_ignores_references_in_literals() {
    let sql = "CREATE TABLE notes (
        body VARCHAR DEFAULT 'REFERENCES users',
        kind VARCHAR CHECK (kind <> 'references carts')
    )";
    let definition = parse_create_table(sql).unwrap();
    assert_eq!(definition.table, "notes");
    assert!(definition.references.is_empty());
}

#[test]
fn test_parse_create_table_schema_qualified() {
    let definition = parse_create_table("CREATE TABLE shop.carts (id INTEGER PRIMARY KEY)").unwrap();
    assert_eq!(definition.table, "shop.carts");
    assert!(definition.references.is_empty());
}

#[test]
fn test_parse_create_table_other_statements() {
    assert!(parse_create_table("CREATE INDEX a_idx ON a (id)").is_none());
    assert!(parse_create_table("INSERT INTO table_log VALUES (1)").is_none());
    assert!(parse_create_table("CRATE TABLE a (id INTEGER)").is_none());
}
