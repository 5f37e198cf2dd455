//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format rows as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[derive(Tabled)]
struct Field<'a> {
    #[tabled(rename = "FIELD")]
    name: &'a str,
    #[tabled(rename = "VALUE")]
    value: &'a str,
}

/// Format a label/value listing, e.g. a status summary
pub fn format_fields(fields: &[(&str, String)]) -> String {
    let rows: Vec<Field> = fields
        .iter()
        .map(|(name, value)| Field {
            name,
            value: value.as_str(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct RegionRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "NAME")]
        name: String,
    }

    #[test]
    fn test_format_table_empty() {
        let rows: Vec<RegionRow> = vec![];
        assert_eq!(format_table(&rows), "No results found.");
    }

    #[test]
    fn test_format_table_rows() {
        let rows = vec![
            RegionRow {
                id: 1,
                name: "Москва".to_string(),
            },
            RegionRow {
                id: 2,
                name: "Казань".to_string(),
            },
        ];

        let result = format_table(&rows);

        assert!(result.contains("ID"));
        assert!(result.contains("Москва"));
        assert!(result.contains("Казань"));
        // Rounded style corners
        assert!(result.contains("╭"));
        assert!(result.contains("╰"));
    }

    #[test]
    fn test_format_fields() {
        let result = format_fields(&[
            ("Network", "ONLINE".to_string()),
            ("Pending", "3".to_string()),
        ]);

        assert!(result.contains("FIELD"));
        assert!(result.contains("Network"));
        assert!(result.contains("ONLINE"));
        assert!(result.contains("Pending"));
    }
}
