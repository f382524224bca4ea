//! Table names and literals as the schema probe writes them into SQL.

/// Schema assumed for unqualified table names.
pub const DEFAULT_SCHEMA: &str = "main";

/// A table name, optionally `schema.table`.
///
/// # Examples
/// ```
/// use sf_migrate::sql_utils::TableName;
/// let name = TableName::parse("shop.orders");
/// assert_eq!(name.schema(), "shop");
/// assert_eq!(name.quoted(), r#""shop"."orders""#);
/// assert_eq!(TableName::parse("users").schema(), "main");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableName<'a> {
    schema: Option<&'a str>,
    table: &'a str,
}

impl<'a> TableName<'a> {
    /// Split on the last `.`, so `a.b.c` is table `c` in schema `a.b`.
    pub fn parse(name: &'a str) -> Self {
        match name.rfind('.') {
            Some(pos) => Self {
                schema: Some(&name[..pos]),
                table: &name[pos + 1..],
            },
            None => Self {
                schema: None,
                table: name,
            },
        }
    }

    pub fn schema(&self) -> &'a str {
        self.schema.unwrap_or(DEFAULT_SCHEMA)
    }

    pub fn table(&self) -> &'a str {
        self.table
    }

    /// Quoted relation text. An unqualified name stays unqualified so the
    /// connection's search path applies.
    pub fn quoted(&self) -> String {
        match self.schema {
            Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(self.table)),
            None => quote_ident(self.table),
        }
    }

    /// `information_schema` predicate matching this table case-insensitively.
    pub fn metadata_predicate(&self) -> String {
        format!(
            "lower(table_schema) = lower({}) AND lower(table_name) = lower({})",
            string_literal(self.schema()),
            string_literal(self.table)
        )
    }
}

/// Quote a SQL identifier, doubling embedded double quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// A single-quoted SQL string literal.
pub fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
