//! Row extraction from `INSERT INTO ... VALUES` statements
//!
//! The script is parsed with `sqlparser` under the generic dialect, so
//! string literals are never mistaken for statements.

use crate::model::Table;
use sqlparser::ast::{Expr, Insert, SetExpr, Statement, Value};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::{Parser, ParserError};

/// Rows of the first table targeted by INSERT statements
///
/// Returns `Ok(None)` when the script has no `INSERT ... VALUES`. Columns come
/// from the statement's column list, else `column_1..n`. `NULL` becomes an
/// empty cell. Statements targeting other tables are skipped.
pub fn extract_insert_rows(sql: &str) -> Result<Option<Table>, ParserError> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)?;
    let mut table: Option<(String, Table)> = None;

    for statement in statements {
        let Statement::Insert(insert) = statement else {
            continue;
        };
        let Some(tuples) = value_rows(&insert) else {
            continue;
        };
        if tuples.is_empty() {
            continue;
        }
        let target = insert.table.to_string();

        match &mut table {
            None => {
                let names = if insert.columns.is_empty() {
                    let width = tuples.iter().map(Vec::len).max().unwrap_or(0);
                    (1..=width).map(|i| format!("column_{}", i)).collect()
                } else {
                    insert.columns.iter().map(|ident| ident.value.clone()).collect()
                };
                table = Some((target, Table::with_rows(names, tuples)));
            }
            Some((name, existing)) if *name == target => existing.rows.extend(tuples),
            Some(_) => {}
        }
    }

    Ok(table.map(|(_, table)| table))
}

/// Cells of a `VALUES` source; `None` for `INSERT ... SELECT`
fn value_rows(insert: &Insert) -> Option<Vec<Vec<String>>> {
    let query = insert.source.as_ref()?;
    match query.body.as_ref() {
        SetExpr::Values(values) => Some(
            values
                .rows
                .iter()
                .map(|row| row.iter().map(cell_text).collect())
                .collect(),
        ),
        _ => None,
    }
}

fn cell_text(expr: &Expr) -> String {
    match expr {
        Expr::Value(literal) => match &literal.value {
            Value::Null => String::new(),
            Value::SingleQuotedString(s) | Value::DoubleQuotedString(s) => s.clone(),
            other => other.to_string(),
        },
        other => other.to_string(),
    }
}
