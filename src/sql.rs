//! INSERT rendering for entry meta rows.

use crate::config::{DATE_UPDATED_SENTINEL, DEFAULT_TABLE_NAME};
use crate::encoder::sql_escape;

/// `date_created` format, `YYYY-MM-DD HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column list of the entry meta table, in insert order.
pub const META_COLUMNS: [&str; 6] = [
    "meta_id",
    "entry_id",
    "meta_key",
    "meta_value",
    "date_created",
    "date_updated",
];

/// Trait for rendering rows to SQL.
pub trait ToSql {
    /// Convert this row to a SQL statement.
    fn to_sql(&self) -> String;
}

/// One `wp_frmt_form_entry_meta` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaRow {
    pub meta_id: u64,
    pub entry_id: u64,
    pub meta_key: String,
    /// Unescaped value; serialized arrays are kept as their raw text.
    pub meta_value: String,
    pub date_created: String,
    pub date_updated: &'static str,
}

impl MetaRow {
    pub fn new(
        meta_id: u64,
        entry_id: u64,
        meta_key: impl Into<String>,
        meta_value: impl Into<String>,
        date_created: impl Into<String>,
    ) -> Self {
        Self {
            meta_id,
            entry_id,
            meta_key: meta_key.into(),
            meta_value: meta_value.into(),
            date_created: date_created.into(),
            date_updated: DATE_UPDATED_SENTINEL,
        }
    }

    /// Render the INSERT statement for `table`.
    pub fn insert_into(&self, table: &str) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ({}, {}, '{}', '{}', '{}', '{}');",
            table,
            META_COLUMNS.join(", "),
            self.meta_id,
            self.entry_id,
            sql_escape(&self.meta_key),
            sql_escape(&self.meta_value),
            sql_escape(&self.date_created),
            self.date_updated,
        )
    }
}

impl ToSql for MetaRow {
    fn to_sql(&self) -> String {
        self.insert_into(DEFAULT_TABLE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::serialize_array;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_insert() {
        let row = MetaRow::new(6036, 668, "email-1", "x@example.com", "2025-07-21 14:05:09");
        assert_eq!(
            row.to_sql(),
            "INSERT INTO wp_frmt_form_entry_meta (meta_id, entry_id, meta_key, meta_value, date_created, date_updated) \
             VALUES (6036, 668, 'email-1', 'x@example.com', '2025-07-21 14:05:09', '0000-00-00 00:00:00');"
        );
    }

    #[test]
    fn test_serialized_value_escaped_as_a_whole() {
        let blob = serialize_array([("first-name", "D'Arcy"), ("last-name", r"Back\slash")]);
        let row = MetaRow::new(1, 2, "name-1", blob, "2025-01-01 00:00:00");
        let sql = row.insert_into("wp_frmt_form_entry_meta");
        assert!(sql.contains(
            r#"'a:2:{s:10:"first-name";s:6:"D\'Arcy";s:9:"last-name";s:10:"Back\\slash";}'"#
        ));
    }

    #[test]
    fn test_custom_table() {
        let row = MetaRow::new(1, 2, "select-5", "1", "2025-01-01 00:00:00");
        assert!(row.insert_into("wp2_frmt_form_entry_meta").starts_with("INSERT INTO wp2_frmt_form_entry_meta ("));
    }
}
