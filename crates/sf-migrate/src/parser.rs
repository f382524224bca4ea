//! SQL parsing for migration bodies, on sqlparser's DuckDB dialect.
//!
//! Statement boundaries come from the tokenizer, so separators inside string
//! literals, quoted identifiers and comments never split a statement. The
//! tokenizer runs with unescaping disabled, which lets each statement be
//! rebuilt from its tokens exactly as written.

use crate::normalize::{strip_comment_lines, SEPARATOR};
use sqlparser::ast::Statement;
use sqlparser::dialect::DuckDbDialect;
use sqlparser::keywords::Keyword;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer, Word};
use std::iter::Peekable;

/// What the engine needs to know about a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    /// The created table, unquoted, optionally `schema.table`.
    pub table: String,
    /// Foreign key targets from column options and table constraints, in
    /// order of appearance and without duplicates.
    pub references: Vec<String>,
}

fn tokenize(sql: &str) -> Option<Vec<Token>> {
    let dialect = DuckDbDialect {};
    match Tokenizer::new(&dialect, sql).with_unescape(false).tokenize() {
        Ok(tokens) => Some(tokens),
        Err(err) => {
            log::debug!("Failed to tokenize SQL: {err}");
            None
        }
    }
}

/// Split a body into individual statements, in source order.
///
/// Comments and whitespace between statements are dropped, as are empty
/// statements. The returned statements carry no trailing separator. A body
/// the tokenizer rejects (e.g. an unterminated literal) comes back as a single
/// statement so the driver reports the error.
pub fn split_statements(raw: &str) -> Vec<String> {
    let Some(tokens) = tokenize(raw) else {
        let stripped = strip_comment_lines(raw);
        let body = stripped.trim().trim_end_matches(SEPARATOR).trim_end();
        return if body.is_empty() {
            Vec::new()
        } else {
            vec![body.to_string()]
        };
    };

    let mut statements = Vec::new();
    let mut current = String::new();
    // Whitespace and comments seen since the last code token.
    let mut pending = String::new();

    for token in &tokens {
        match token {
            Token::SemiColon => {
                if !current.is_empty() {
                    statements.push(std::mem::take(&mut current));
                }
                pending.clear();
            }
            Token::Whitespace(_) => {
                if !current.is_empty() {
                    pending.push_str(&token.to_string());
                }
            }
            Token::EOF => {}
            code => {
                current.push_str(&pending);
                pending.clear();
                current.push_str(&code.to_string());
            }
        }
    }
    if !current.is_empty() {
        statements.push(current);
    }
    statements
}

/// Parse `statement` and describe it if it is a `CREATE TABLE`.
///
/// Returns `None` for any other statement and for SQL the parser rejects.
///
/// # Examples
/// ```
/// use sf_migrate::parser::parse_create_table;
/// let sql = "CREATE TABLE cart_items (cart_id INTEGER REFERENCES carts(id))";
/// let definition = parse_create_table(sql).unwrap();
/// assert_eq!(definition.table, "cart_items");
/// assert_eq!(definition.references, vec!["carts".to_string()]);
/// ```
pub fn parse_create_table(statement: &str) -> Option<TableDefinition> {
    let dialect = DuckDbDialect {};
    let parsed = match Parser::parse_sql(&dialect, statement) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::debug!("Failed to parse statement: {err}");
            return None;
        }
    };
    let Some(Statement::CreateTable(create)) = parsed.into_iter().next() else {
        return None;
    };

    let column_options = create
        .columns
        .iter()
        .flat_map(|column| column.options.iter())
        .map(|option| option.to_string());
    let constraints = create.constraints.iter().map(|constraint| constraint.to_string());

    let mut references = Vec::new();
    for clause in column_options.chain(constraints) {
        for table in referenced_names(&clause) {
            if !references.contains(&table) {
                references.push(table);
            }
        }
    }

    Some(TableDefinition {
        table: object_name_text(&create.name.to_string())?,
        references,
    })
}

/// Names following each `REFERENCES` keyword in a rendered clause.
fn referenced_names(clause: &str) -> Vec<String> {
    let Some(tokens) = tokenize(clause) else {
        return Vec::new();
    };
    let mut code = tokens
        .iter()
        .filter(|t| !matches!(t, Token::Whitespace(_)))
        .peekable();

    let mut names = Vec::new();
    while let Some(token) = code.next() {
        if let Token::Word(word) = token {
            if word.quote_style.is_none() && word.keyword == Keyword::REFERENCES {
                if let Some(name) = object_name(&mut code) {
                    names.push(name);
                }
            }
        }
    }
    names
}

/// Unquoted `schema.table` text of a rendered object name.
fn object_name_text(rendered: &str) -> Option<String> {
    let tokens = tokenize(rendered)?;
    let mut code = tokens
        .iter()
        .filter(|t| !matches!(t, Token::Whitespace(_)))
        .peekable();
    object_name(&mut code)
}

fn object_name<'a, I>(tokens: &mut Peekable<I>) -> Option<String>
where
    I: Iterator<Item = &'a Token>,
{
    let mut parts = Vec::new();
    while let Some(Token::Word(word)) = tokens.next_if(|t| matches!(t, Token::Word(_))) {
        parts.push(unquote(word));
        if tokens.next_if(|t| matches!(t, Token::Period)).is_none() {
            break;
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}

fn unquote(word: &Word) -> String {
    match word.quote_style {
        Some('"') => word.value.replace("\"\"", "\""),
        _ => word.value.clone(),
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
