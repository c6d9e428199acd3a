use super::types::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let pk = if col.name == schema.primary_key {
            " PRIMARY KEY"
        } else {
            ""
        };
        let null_constraint = if !col.nullable {
            " NOT NULL"
        } else {
            ""
        };
        let unique = if col.unique { " UNIQUE" } else { "" };
        let check = col
            .check
            .map(|expr| format!(" CHECK ({})", expr))
            .unwrap_or_default();

        columns.push(format!(
            "    {} {}{}{}{}{}",
            col.name,
            col.col_type.sql_type(),
            pk,
            null_constraint,
            unique,
            check
        ));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {}",
            fk.column,
            fk.references_table,
            fk.references_column,
            fk.on_delete.as_sql()
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements: a unique index on a text key, one per
/// foreign key column, then any declared indexes
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let mut indexes = Vec::new();

    if schema.has_text_key() {
        indexes.push(format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
            schema.name, schema.primary_key, schema.name, schema.primary_key
        ));
    }

    for fk in schema.foreign_keys {
        indexes.push(format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
            schema.name, fk.column, schema.name, fk.column
        ));
    }

    for index in schema.indexes {
        indexes.push(format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {}({})",
            if index.unique { "UNIQUE " } else { "" },
            index.name,
            schema.name,
            index.columns.join(", ")
        ));
    }

    indexes
}

/// Generate a multi-row INSERT for `row_count` rows of the insertable columns
pub fn generate_insert(schema: &TableSchema, row_count: usize) -> String {
    let columns = schema.insert_columns();
    let placeholders = format!("({})", vec!["?"; columns.len()].join(", "));

    format!(
        "INSERT INTO {} ({}) VALUES {}",
        schema.name,
        columns.join(", "),
        vec![placeholders.as_str(); row_count].join(", ")
    )
}

/// Generate a SELECT of every column through `alias`, keeping the bare
/// column names as result names
pub fn generate_select(schema: &TableSchema, alias: &str) -> String {
    let columns: Vec<String> = schema
        .columns
        .iter()
        .map(|c| format!("{}.{} AS {}", alias, c.name, c.name))
        .collect();

    format!("SELECT {} FROM {} {}", columns.join(", "), schema.name, alias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{SECTORS, SUBSECTOR_NAMES, SYSTEMS, TABLE_SCHEMAS, TRADE_CODES};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&SYSTEMS);
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS systems"));
        assert!(sql.contains("id TEXT PRIMARY KEY"));
        assert!(sql.contains("hex_x INTEGER NOT NULL"));
        assert!(sql.contains("FOREIGN KEY (sector_id) REFERENCES sectors(id) ON DELETE CASCADE"));
        assert!(sql.contains(
            "FOREIGN KEY (allegiance_id) REFERENCES allegiances(id) ON DELETE SET NULL"
        ));
    }

    #[test]
    fn test_generate_create_table_check_constraint() {
        let sql = generate_create_table(&SUBSECTOR_NAMES);
        assert!(sql.contains("id INTEGER PRIMARY KEY"));
        assert!(sql.contains("code INTEGER NOT NULL CHECK (code BETWEEN 0 AND 15)"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes(&SECTORS);
        assert!(indexes
            .iter()
            .any(|i| i.contains("CREATE UNIQUE INDEX IF NOT EXISTS idx_sectors_id")));
        assert!(indexes.iter().any(|i| i.contains("idx_sectors_universe_id")));
        assert!(indexes.iter().any(|i| i
            .contains("UNIQUE INDEX IF NOT EXISTS idx_sectors_position ON sectors(universe_id, milieu, sector_x, sector_y)")));
    }

    #[test]
    fn test_integer_key_tables_skip_key_index() {
        let indexes = generate_indexes(&TRADE_CODES);
        assert!(!indexes.iter().any(|i| i.contains("idx_trade_codes_id ")));
        assert!(indexes.iter().any(|i| i.contains("idx_trade_codes_system_id")));

        let indexes = generate_indexes(&TABLE_SCHEMAS);
        assert!(indexes.iter().any(|i| i.contains("idx_table_schemas_name")));
    }

    #[test]
    fn test_generate_select_aliases_columns() {
        let sql = generate_select(&TRADE_CODES, "t");
        assert_eq!(
            sql,
            "SELECT t.id AS id, t.system_id AS system_id, t.code AS code FROM trade_codes t"
        );
    }

    #[test]
    fn test_generate_insert_skips_integer_key() {
        let sql = generate_insert(&TRADE_CODES, 2);
        assert_eq!(
            sql,
            "INSERT INTO trade_codes (system_id, code) VALUES (?, ?), (?, ?)"
        );
    }
}
