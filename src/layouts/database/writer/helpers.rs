// src/layouts/database/writer/helpers.rs
// Helper functions for SQL generation and parameter preparation

use rusqlite::ToSql;

/// Quote a SQL identifier by wrapping it in double quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Build a string of SQL placeholders (?, ?, ?, ...).
///
/// # Example
/// ```
/// use datasheet_layout::layouts::database::writer::helpers::build_placeholders;
/// assert_eq!(build_placeholders(3), "?, ?, ?");
/// ```
pub fn build_placeholders(count: usize) -> String {
    (0..count).map(|_| "?").collect::<Vec<_>>().join(", ")
}

/// Collects `column = ?` assignments for a partial UPDATE.
#[derive(Default)]
pub struct UpdateBuilder {
    assignments: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl UpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: ToSql + 'static>(&mut self, column: &str, value: T) -> &mut Self {
        self.assignments.push(format!("{} = ?", quote_identifier(column)));
        self.params.push(Box::new(value));
        self
    }

    /// Assignment with a literal SQL expression and no parameter.
    pub fn set_expr(&mut self, column: &str, expr: &str) -> &mut Self {
        self.assignments
            .push(format!("{} = {}", quote_identifier(column), expr));
        self
    }

    /// Final SQL plus parameters; `where_params` are appended after the
    /// SET parameters.
    pub fn build(
        mut self,
        table_name: &str,
        where_clause: &str,
        where_params: Vec<Box<dyn ToSql>>,
    ) -> (String, Vec<Box<dyn ToSql>>) {
        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            quote_identifier(table_name),
            self.assignments.join(", "),
            where_clause
        );
        self.params.extend(where_params);
        (sql, self.params)
    }
}

/// Serialize an optional JSON blob for a TEXT column.
pub fn json_text<T: serde::Serialize>(value: Option<&T>) -> serde_json::Result<Option<String>> {
    value.map(serde_json::to_string).transpose()
}
