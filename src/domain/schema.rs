//! Warehouse schema model
//!
//! The cleaner turns a `.schema` export (column name/datatype pairs) into
//! the JSON schema document the warehouse loader attaches to a load job.
//! Both sides share these types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Warehouse column type
///
/// Source datatypes are mapped by substring, first match wins, falling
/// back to `String` so an unmapped column never blocks a load; it can be
/// fixed up in the warehouse afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Datetime,
    Date,
    Integer,
    Float,
    String,
}

impl FieldType {
    /// Infer a warehouse type from a source database datatype string
    ///
    /// DATETIME is tested before DATE (it contains it), and FLOAT, DOUBLE
    /// and DECIMAL all land on `Float`.
    pub fn infer(datatype: &str) -> Self {
        let dt = datatype.to_ascii_uppercase();
        if dt.contains("DATETIME") {
            FieldType::Datetime
        } else if dt.contains("DATE") {
            FieldType::Date
        } else if dt.contains("INT") {
            FieldType::Integer
        } else if dt.contains("FLOAT") || dt.contains("DOUBLE") || dt.contains("DECIMAL") {
            FieldType::Float
        } else {
            FieldType::String
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::Datetime => "DATETIME",
            FieldType::Date => "DATE",
            FieldType::Integer => "INTEGER",
            FieldType::Float => "FLOAT",
            FieldType::String => "STRING",
        };
        write!(f, "{s}")
    }
}

/// One column in a warehouse load schema
///
/// Every inferred field is NULLABLE: the source exports carry no
/// nullability information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Column name
    pub name: String,

    /// Warehouse column type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Column mode, always `NULLABLE` for inferred schemas
    pub mode: String,
}

impl SchemaField {
    /// Build a nullable field with an inferred type
    pub fn nullable(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            mode: "NULLABLE".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("DATETIME", FieldType::Datetime; "datetime before date")]
    #[test_case("DATE", FieldType::Date; "plain date")]
    #[test_case("INT(11)", FieldType::Integer; "sized int")]
    #[test_case("BIGINT", FieldType::Integer; "bigint")]
    #[test_case("tinyint(1)", FieldType::Integer; "lowercase tinyint")]
    #[test_case("FLOAT", FieldType::Float; "float")]
    #[test_case("DOUBLE", FieldType::Float; "double")]
    #[test_case("DECIMAL(10,2)", FieldType::Float; "decimal")]
    #[test_case("VARCHAR(255)", FieldType::String; "varchar")]
    #[test_case("TEXT", FieldType::String; "text")]
    #[test_case("BLOB", FieldType::String; "blob fallback")]
    fn test_infer(datatype: &str, expected: FieldType) {
        assert_eq!(FieldType::infer(datatype), expected);
    }

    #[test]
    fn test_schema_field_serializes_with_type_key() {
        let field = SchemaField::nullable("col_a", FieldType::Integer);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "col_a", "type": "INTEGER", "mode": "NULLABLE"})
        );
    }

    #[test]
    fn test_schema_field_deserializes() {
        let field: SchemaField =
            serde_json::from_str(r#"{"name": "x", "type": "STRING", "mode": "NULLABLE"}"#).unwrap();
        assert_eq!(field.field_type, FieldType::String);
    }
}
