//! Quoting and escaping for generated scripts
//!
//! Script scaffolds embed content as Python triple-quoted strings and SQL
//! string literals.

/// Escape text for the body of a Python `"""` string
///
/// A trailing quote is escaped too, so it cannot merge with the closing
/// delimiter.
pub fn python_triple_quoted(value: &str) -> String {
    let mut escaped = value.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"");
    if let Some(body) = escaped.strip_suffix('"') {
        let backslashes = body.chars().rev().take_while(|c| *c == '\\').count();
        if backslashes % 2 == 0 {
            escaped.insert(escaped.len() - 1, '\\');
        }
    }
    escaped
}

/// SQL string literal with doubled single quotes
pub fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Identifier safe to use unquoted in SQL
///
/// Characters outside `[A-Za-z0-9_]` become `_`; a leading digit gets a `_`
/// prefix. Blank names fall back to `fallback`.
pub fn sql_identifier(name: &str, fallback: &str) -> String {
    let mut identifier: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if identifier.is_empty() {
        return fallback.to_string();
    }
    if identifier.starts_with(|c: char| c.is_ascii_digit()) {
        identifier.insert(0, '_');
    }
    identifier
}

/// Prefix every line of `text` with `prefix`
pub fn comment_block(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
