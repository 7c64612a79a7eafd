//! Schema data model: tables, fields, and column constraint domains.
//!
//! Everything here is loaded once from the container and held read-only for
//! the life of the process. Field and domain ordering follows the container
//! source order, which the UI and the JSON output both preserve.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of content table, from `gpkg_contents.data_type`.
///
/// Tile pyramids also appear in `gpkg_contents` but carry no column schema,
/// so the loader skips them and they never reach this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// Vector feature table (has a geometry column)
    Features,
    /// Plain attribute table
    Attributes,
}

impl TableKind {
    /// Map a `gpkg_contents.data_type` value to a kind, `None` for
    /// non-schema content such as `tiles`.
    pub fn from_data_type(value: &str) -> Option<TableKind> {
        match value {
            "features" => Some(TableKind::Features),
            "attributes" => Some(TableKind::Attributes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Features => "features",
            TableKind::Attributes => "attributes",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column type tag, parsed from the declared SQLite column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Boolean,
    TinyInt,
    SmallInt,
    MediumInt,
    Integer,
    Float,
    Double,
    Text,
    Blob,
    Date,
    DateTime,
    Geometry,
}

/// Geometry type names a feature column may declare.
const GEOMETRY_TYPES: &[&str] = &[
    "GEOMETRY",
    "POINT",
    "LINESTRING",
    "POLYGON",
    "MULTIPOINT",
    "MULTILINESTRING",
    "MULTIPOLYGON",
    "GEOMETRYCOLLECTION",
    "CIRCULARSTRING",
    "COMPOUNDCURVE",
    "CURVEPOLYGON",
    "MULTICURVE",
    "MULTISURFACE",
    "CURVE",
    "SURFACE",
];

impl FieldType {
    /// Parse a declared column type such as `TEXT(64)`, `MEDIUMINT`, or
    /// `POINT` into a type tag and an optional declared length.
    ///
    /// Returns `None` for declarations outside the GeoPackage type set; the
    /// loader turns that into a structured error with table/column context.
    pub fn parse_declared(declared: &str) -> Option<(FieldType, Option<u32>)> {
        let declared = declared.trim();
        let (base, length) = match declared.split_once('(') {
            Some((base, rest)) => {
                let digits = rest.strip_suffix(')')?;
                (base.trim(), Some(digits.trim().parse::<u32>().ok()?))
            }
            None => (declared, None),
        };

        let upper = base.to_ascii_uppercase();
        let field_type = match upper.as_str() {
            "BOOLEAN" => FieldType::Boolean,
            "TINYINT" => FieldType::TinyInt,
            "SMALLINT" => FieldType::SmallInt,
            "MEDIUMINT" => FieldType::MediumInt,
            "INT" | "INTEGER" => FieldType::Integer,
            "FLOAT" => FieldType::Float,
            "DOUBLE" | "REAL" => FieldType::Double,
            "TEXT" => FieldType::Text,
            "BLOB" => FieldType::Blob,
            "DATE" => FieldType::Date,
            "DATETIME" => FieldType::DateTime,
            other if GEOMETRY_TYPES.contains(&other) => FieldType::Geometry,
            _ => return None,
        };

        // A length suffix is only meaningful on text and blob columns.
        let length = match field_type {
            FieldType::Text | FieldType::Blob => length,
            _ => None,
        };

        Some((field_type, length))
    }

    /// Representable bounds for integer-valued types.
    pub fn integer_bounds(&self) -> Option<(i64, i64)> {
        match self {
            FieldType::Boolean => Some((0, 1)),
            FieldType::TinyInt => Some((i64::from(i8::MIN), i64::from(i8::MAX))),
            FieldType::SmallInt => Some((i64::from(i16::MIN), i64::from(i16::MAX))),
            FieldType::MediumInt => Some((i64::from(i32::MIN), i64::from(i32::MAX))),
            FieldType::Integer => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    /// Largest representable magnitude for float-valued types. `Double`
    /// accepts any finite f64.
    pub fn float_magnitude(&self) -> Option<f64> {
        match self {
            FieldType::Float => Some(f64::from(f32::MAX)),
            FieldType::Double => Some(f64::MAX),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::TinyInt => "tinyint",
            FieldType::SmallInt => "smallint",
            FieldType::MediumInt => "mediumint",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Text => "text",
            FieldType::Blob => "blob",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Geometry => "geometry",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a content table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Column name
    pub name: String,
    /// Display alias from `gpkg_data_columns.title`, if registered
    pub alias: Option<String>,
    /// Parsed type tag
    pub field_type: FieldType,
    /// Declared length for `TEXT(n)` / `BLOB(n)` columns
    pub length: Option<u32>,
    /// Whether NULL is an acceptable stored value
    pub nullable: bool,
    /// False for system-maintained columns (the integer primary key)
    pub editable: bool,
    /// Declared column default, as its SQL literal
    pub default: Option<String>,
    /// Constraint (domain) name reference, if any
    pub domain: Option<String>,
}

impl Field {
    /// Display name: the alias when registered, the column name otherwise.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One content table and its ordered fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Table name as it appears in `gpkg_contents`
    pub name: String,
    pub kind: TableKind,
    /// Human-readable identifier from `gpkg_contents`
    pub identifier: Option<String>,
    pub description: Option<String>,
    /// Columns in container source order
    pub fields: Vec<Field>,
}

impl Table {
    /// Find a field by name, case-insensitively (SQLite identifier
    /// semantics).
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// One code → label pair of a coded-value domain.
///
/// Codes are kept as their stored text; validation compares them against
/// record values numerically when the constrained field is numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedValue {
    pub code: String,
    pub label: String,
}

/// Constraint payload of a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum DomainKind {
    /// Coded-value domain: a finite set of stored codes with labels,
    /// in constraint row order
    Coded { values: Vec<CodedValue> },
    /// Numeric range with inclusivity flags
    Range {
        min: Option<f64>,
        min_inclusive: bool,
        max: Option<f64>,
        max_inclusive: bool,
    },
    /// Glob pattern over the stored text
    Glob { pattern: String },
}

impl DomainKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainKind::Coded { .. } => "coded",
            DomainKind::Range { .. } => "range",
            DomainKind::Glob { .. } => "glob",
        }
    }
}

/// A named column constraint from `gpkg_data_column_constraints`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    #[serde(flatten)]
    pub kind: DomainKind,
}

impl Domain {
    /// The ordered code → label rows, for coded-value domains only.
    pub fn coded_values(&self) -> Option<&[CodedValue]> {
        match &self.kind {
            DomainKind::Coded { values } => Some(values),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_types() {
        assert_eq!(
            FieldType::parse_declared("MEDIUMINT"),
            Some((FieldType::MediumInt, None))
        );
        assert_eq!(
            FieldType::parse_declared("double"),
            Some((FieldType::Double, None))
        );
        assert_eq!(
            FieldType::parse_declared("DATETIME"),
            Some((FieldType::DateTime, None))
        );
    }

    #[test]
    fn parse_text_with_length() {
        assert_eq!(
            FieldType::parse_declared("TEXT(64)"),
            Some((FieldType::Text, Some(64)))
        );
        assert_eq!(
            FieldType::parse_declared("BLOB(1024)"),
            Some((FieldType::Blob, Some(1024)))
        );
        // Length suffix on non-sized types is parsed but dropped
        assert_eq!(
            FieldType::parse_declared("INTEGER(10)"),
            Some((FieldType::Integer, None))
        );
    }

    #[test]
    fn parse_geometry_names() {
        for decl in ["GEOMETRY", "POINT", "MULTIPOLYGON", "linestring"] {
            assert_eq!(
                FieldType::parse_declared(decl),
                Some((FieldType::Geometry, None)),
                "declared type {decl}"
            );
        }
    }

    #[test]
    fn parse_rejects_foreign_types() {
        assert_eq!(FieldType::parse_declared("VARCHAR2"), None);
        assert_eq!(FieldType::parse_declared("TEXT(abc)"), None);
        assert_eq!(FieldType::parse_declared("TEXT(64"), None);
    }

    #[test]
    fn integer_bounds_by_width() {
        assert_eq!(FieldType::SmallInt.integer_bounds(), Some((-32_768, 32_767)));
        assert_eq!(
            FieldType::MediumInt.integer_bounds(),
            Some((-2_147_483_648, 2_147_483_647))
        );
        assert_eq!(FieldType::Text.integer_bounds(), None);
    }

    #[test]
    fn field_display_name_prefers_alias() {
        let field = Field {
            name: "area_ha".into(),
            alias: Some("Area (ha)".into()),
            field_type: FieldType::Double,
            length: None,
            nullable: true,
            editable: true,
            default: None,
            domain: None,
        };
        assert_eq!(field.display_name(), "Area (ha)");
    }
}
