//! Schema inference from a `.schema` export
//!
//! A schema export is the CSV result of the column-listing query: one
//! `name,datatype` pair per line, both fields usually double-quoted.
//! Each pair becomes a nullable warehouse field with the type inferred
//! by substring matching.

use crate::domain::schema::{FieldType, SchemaField};

/// Parse a schema export body into warehouse schema fields
///
/// Blank lines are skipped; a line with no comma is ignored rather than
/// failing the whole file.
pub fn infer_schema(body: &str) -> Vec<SchemaField> {
    body.lines().filter_map(parse_schema_line).collect()
}

/// Parse one `name,datatype` line
///
/// Splits on the first comma only: column names cannot contain commas,
/// but datatypes like `DECIMAL(10,2)` can.
fn parse_schema_line(line: &str) -> Option<SchemaField> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (name, datatype) = line.split_once(',')?;
    let name = unquote(name);
    if name.is_empty() {
        return None;
    }

    Some(SchemaField::nullable(name, FieldType::infer(&unquote(datatype))))
}

fn unquote(field: &str) -> String {
    field.trim().trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_integer_column() {
        let fields = infer_schema("\"col_a\",\"INT(11)\"\n");
        assert_eq!(fields, vec![SchemaField::nullable("col_a", FieldType::Integer)]);
    }

    #[test]
    fn test_quoted_varchar_column() {
        let fields = infer_schema("\"x\",\"VARCHAR(255)\"\n");
        assert_eq!(fields, vec![SchemaField::nullable("x", FieldType::String)]);
    }

    #[test]
    fn test_unquoted_pairs() {
        let fields = infer_schema("created_at,DATETIME\namount,DECIMAL(10,2)\n");
        assert_eq!(
            fields,
            vec![
                SchemaField::nullable("created_at", FieldType::Datetime),
                SchemaField::nullable("amount", FieldType::Float),
            ]
        );
    }

    #[test]
    fn test_datatype_with_comma_survives_split() {
        let fields = infer_schema("\"price\",\"DECIMAL(10,2)\"\n");
        assert_eq!(fields, vec![SchemaField::nullable("price", FieldType::Float)]);
    }

    #[test]
    fn test_blank_and_malformed_lines_skipped() {
        let fields = infer_schema("\n\"id\",\"INT\"\nnot-a-pair\n");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "id");
    }

    #[test]
    fn test_column_order_preserved() {
        let fields = infer_schema("\"b\",\"INT\"\n\"a\",\"TEXT\"\n");
        assert_eq!(fields[0].name, "b");
        assert_eq!(fields[1].name, "a");
    }
}
