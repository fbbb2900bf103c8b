//! Schema descriptions fed to the SQL-synthesis prompt

use std::collections::BTreeSet;
use std::fmt::Write;

/// Foreign-key relationship from a column to another table's column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: String,
    pub foreign_table: String,
    pub foreign_column: String,
}

/// Catalog information for a single table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    /// (column name, declared type) in ordinal order
    pub columns: Vec<(String, String)>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.columns.push((name.into(), data_type.into()));
        self
    }

    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key.push(column.into());
        self
    }

    pub fn foreign_key(
        mut self,
        column: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.into(),
            foreign_table: foreign_table.into(),
            foreign_column: foreign_column.into(),
        });
        self
    }
}

/// Prompt-ready schema text plus the lower-cased identifiers it mentions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDescription {
    pub text: String,
    pub tables: BTreeSet<String>,
    pub columns: BTreeSet<String>,
}

impl SchemaDescription {
    /// The degraded form used when introspection fails
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.tables.is_empty()
    }

    /// Serialize tables into the human-readable block used in prompts
    pub fn from_tables(tables: &[TableSchema]) -> Self {
        let mut description = Self::empty();

        for table in tables {
            description.tables.insert(table.name.to_lowercase());
            let _ = writeln!(description.text, "Table: {}", table.name);

            for (column, data_type) in &table.columns {
                description.columns.insert(column.to_lowercase());
                let _ = writeln!(description.text, " - {} ({})", column, data_type);
            }

            if !table.primary_key.is_empty() {
                description.text.push_str(" - Primary Key:\n");
                for column in &table.primary_key {
                    let _ = writeln!(description.text, "   - {}", column);
                }
            }

            if !table.foreign_keys.is_empty() {
                description.text.push_str(" - Foreign Keys:\n");
                for fk in &table.foreign_keys {
                    let _ = writeln!(
                        description.text,
                        "   - {} -> {}({})",
                        fk.column, fk.foreign_table, fk.foreign_column
                    );
                }
            }

            description.text.push('\n');
        }

        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_schema() {
        let schema = SchemaDescription::from_tables(&[]);
        assert!(schema.is_empty());
        assert_eq!(schema, SchemaDescription::empty());
    }

    #[test]
    fn test_schema_text_layout() {
        let tables = vec![
            TableSchema::new("Events")
                .column("id", "integer")
                .column("Event_Amount", "numeric")
                .column("venue_id", "integer")
                .primary_key("id")
                .foreign_key("venue_id", "venues", "id"),
            TableSchema::new("venues").column("id", "integer"),
        ];

        let schema = SchemaDescription::from_tables(&tables);
        assert_eq!(
            schema.text,
            "Table: Events\n - id (integer)\n - Event_Amount (numeric)\n - venue_id (integer)\n \
             - Primary Key:\n   - id\n - Foreign Keys:\n   - venue_id -> venues(id)\n\n\
             Table: venues\n - id (integer)\n\n"
        );
        assert!(schema.tables.contains("events"));
        assert!(schema.columns.contains("event_amount"));
        assert_eq!(schema.columns.len(), 3);
    }
}
