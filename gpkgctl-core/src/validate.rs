//! Record validation against a table's schema.
//!
//! A validator is built from the catalog for one table and checks JSON
//! objects against it: unknown keys, system-maintained columns, nullability,
//! per-type value checks, and domain constraints. All problems found in a
//! record are collected, not just the first.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use tracing::warn;

use crate::catalog::SchemaCatalog;
use crate::error::{GpkgError, Result};
use crate::model::{DomainKind, Field, FieldType, Table};

/// Validation behavior toggles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions {
    /// When set, a non-nullable field that declares a column default may be
    /// omitted or null; the database fills it in. When unset every
    /// non-nullable field must carry an explicit value.
    pub allow_defaults: bool,
}

/// One problem found in a record.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// The record is not a JSON object
    NotAnObject,

    /// Key does not name a column of the table
    UnknownField { field: String },

    /// Key names a system-maintained column
    ReadOnly { field: String },

    /// Non-nullable field missing from the record
    MissingRequired { field: String },

    /// Non-nullable field carries an explicit null
    NullNotAllowed { field: String },

    /// Value has the wrong JSON shape for the column type
    TypeMismatch { field: String, expected: FieldType },

    /// Integer value outside the type's representable width
    IntegerOutOfBounds { field: String, min: i64, max: i64 },

    /// Float value outside the type's representable magnitude
    FloatOutOfBounds { field: String },

    /// Text value longer than the declared column length
    TooLong {
        field: String,
        max: u32,
        actual: usize,
    },

    /// Value fails to parse in the column's expected format
    InvalidFormat { field: String, reason: String },

    /// Value is not one of the coded-value domain's codes
    NotInDomain {
        field: String,
        domain: String,
        value: String,
    },

    /// Value falls outside a range domain
    OutsideRange {
        field: String,
        domain: String,
        min: Option<f64>,
        max: Option<f64>,
    },

    /// Value does not match a glob domain's pattern
    PatternMismatch { field: String, pattern: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "record is not a JSON object"),
            Self::UnknownField { field } => write!(f, "unknown field '{}'", field),
            Self::ReadOnly { field } => {
                write!(f, "'{}' is system-maintained and cannot be provided", field)
            }
            Self::MissingRequired { field } => write!(f, "'{}' is required", field),
            Self::NullNotAllowed { field } => write!(f, "'{}' cannot be null", field),
            Self::TypeMismatch { field, expected } => {
                write!(f, "'{}' expects a {} value", field, expected)
            }
            Self::IntegerOutOfBounds { field, min, max } => {
                write!(f, "'{}' must be between {} and {}", field, min, max)
            }
            Self::FloatOutOfBounds { field } => {
                write!(f, "'{}' exceeds the representable float magnitude", field)
            }
            Self::TooLong { field, max, actual } => {
                write!(
                    f,
                    "'{}' exceeds maximum length of {} characters (got {})",
                    field, max, actual
                )
            }
            Self::InvalidFormat { field, reason } => write!(f, "'{}': {}", field, reason),
            Self::NotInDomain {
                field,
                domain,
                value,
            } => {
                write!(f, "'{}': {} is not a code of domain '{}'", field, value, domain)
            }
            Self::OutsideRange {
                field,
                domain,
                min,
                max,
            } => {
                write!(
                    f,
                    "'{}' is outside range domain '{}' ({:?}..{:?})",
                    field, domain, min, max
                )
            }
            Self::PatternMismatch { field, pattern } => {
                write!(f, "'{}' does not match pattern '{}'", field, pattern)
            }
        }
    }
}

impl std::error::Error for ValidationIssue {}

/// Checks JSON records against one table of the catalog.
pub struct TableValidator<'a> {
    table: &'a Table,
    catalog: &'a SchemaCatalog,
    opts: ValidateOptions,
}

impl<'a> TableValidator<'a> {
    pub fn new(catalog: &'a SchemaCatalog, table: &str) -> Result<Self> {
        Self::with_options(catalog, table, ValidateOptions::default())
    }

    pub fn with_options(
        catalog: &'a SchemaCatalog,
        table: &str,
        opts: ValidateOptions,
    ) -> Result<Self> {
        let table = catalog
            .table(table)
            .ok_or_else(|| GpkgError::table_not_found(table))?;
        Ok(Self {
            table,
            catalog,
            opts,
        })
    }

    /// The table this validator checks against.
    pub fn table(&self) -> &Table {
        self.table
    }

    /// Validate one record. An empty result means the record conforms.
    pub fn validate(&self, record: &Map<String, Value>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for key in record.keys() {
            match self.table.field(key) {
                None => issues.push(ValidationIssue::UnknownField { field: key.clone() }),
                Some(field) if !field.editable => issues.push(ValidationIssue::ReadOnly {
                    field: field.name.clone(),
                }),
                Some(_) => {}
            }
        }

        for field in self.table.fields.iter().filter(|f| f.editable) {
            let value = record
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(&field.name))
                .map(|(_, v)| v);

            match value {
                None | Some(Value::Null) => {
                    let satisfied = field.nullable
                        || (self.opts.allow_defaults && field.default.is_some());
                    if !satisfied {
                        issues.push(match value {
                            None => ValidationIssue::MissingRequired {
                                field: field.name.clone(),
                            },
                            _ => ValidationIssue::NullNotAllowed {
                                field: field.name.clone(),
                            },
                        });
                    }
                }
                Some(value) => self.check_value(field, value, &mut issues),
            }
        }

        issues
    }

    /// Validate an arbitrary JSON value as a record.
    pub fn validate_value(&self, value: &Value) -> Vec<ValidationIssue> {
        match value.as_object() {
            Some(record) => self.validate(record),
            None => vec![ValidationIssue::NotAnObject],
        }
    }

    fn check_value(&self, field: &Field, value: &Value, issues: &mut Vec<ValidationIssue>) {
        // Geometry is presence-checked only.
        if field.field_type == FieldType::Geometry {
            return;
        }

        match self.catalog.domain_for(field).map(|d| (&d.name, &d.kind)) {
            Some((domain, DomainKind::Coded { values })) => {
                if !values.iter().any(|cv| code_matches(&cv.code, value)) {
                    issues.push(ValidationIssue::NotInDomain {
                        field: field.name.clone(),
                        domain: domain.clone(),
                        value: value.to_string(),
                    });
                }
                // Coded text columns still honor the declared length.
                if field.field_type == FieldType::Text {
                    check_text_length(field, value, issues);
                }
            }
            Some((
                domain,
                DomainKind::Range {
                    min,
                    min_inclusive,
                    max,
                    max_inclusive,
                },
            )) => match value.as_f64() {
                Some(v) => {
                    let below = min.map_or(false, |m| if *min_inclusive { v < m } else { v <= m });
                    let above = max.map_or(false, |m| if *max_inclusive { v > m } else { v >= m });
                    if below || above {
                        issues.push(ValidationIssue::OutsideRange {
                            field: field.name.clone(),
                            domain: domain.clone(),
                            min: *min,
                            max: *max,
                        });
                    }
                }
                None => issues.push(ValidationIssue::TypeMismatch {
                    field: field.name.clone(),
                    expected: field.field_type,
                }),
            },
            Some((domain, DomainKind::Glob { pattern })) => match value.as_str() {
                Some(s) => match glob::Pattern::new(pattern) {
                    Ok(p) => {
                        if !p.matches(s) {
                            issues.push(ValidationIssue::PatternMismatch {
                                field: field.name.clone(),
                                pattern: pattern.clone(),
                            });
                        }
                    }
                    Err(err) => {
                        warn!(domain = %domain, %err, "unparseable glob pattern, skipping check");
                    }
                },
                None => issues.push(ValidationIssue::TypeMismatch {
                    field: field.name.clone(),
                    expected: field.field_type,
                }),
            },
            None => self.check_type(field, value, issues),
        }
    }

    fn check_type(&self, field: &Field, value: &Value, issues: &mut Vec<ValidationIssue>) {
        let mismatch = || ValidationIssue::TypeMismatch {
            field: field.name.clone(),
            expected: field.field_type,
        };

        match field.field_type {
            FieldType::Boolean => {
                let ok = value.is_boolean() || matches!(value.as_i64(), Some(0) | Some(1));
                if !ok {
                    issues.push(mismatch());
                }
            }
            FieldType::TinyInt
            | FieldType::SmallInt
            | FieldType::MediumInt
            | FieldType::Integer => match value.as_i64() {
                Some(v) => {
                    // Width bounds are always defined for integer types.
                    let (min, max) = field.field_type.integer_bounds().unwrap_or((i64::MIN, i64::MAX));
                    if v < min || v > max {
                        issues.push(ValidationIssue::IntegerOutOfBounds {
                            field: field.name.clone(),
                            min,
                            max,
                        });
                    }
                }
                None => issues.push(mismatch()),
            },
            FieldType::Float | FieldType::Double => match value.as_f64() {
                Some(v) => {
                    let limit = field.field_type.float_magnitude().unwrap_or(f64::MAX);
                    if v.abs() > limit {
                        issues.push(ValidationIssue::FloatOutOfBounds {
                            field: field.name.clone(),
                        });
                    }
                }
                None => issues.push(mismatch()),
            },
            FieldType::Text => {
                if value.as_str().is_none() {
                    issues.push(mismatch());
                } else {
                    check_text_length(field, value, issues);
                }
            }
            FieldType::Blob => match value.as_str() {
                Some(s) => {
                    if BASE64.decode(s).is_err() {
                        issues.push(ValidationIssue::InvalidFormat {
                            field: field.name.clone(),
                            reason: "not valid base64".into(),
                        });
                    }
                }
                None => issues.push(mismatch()),
            },
            FieldType::Date => match value.as_str() {
                Some(s) => {
                    if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                        issues.push(ValidationIssue::InvalidFormat {
                            field: field.name.clone(),
                            reason: format!("'{}' is not a YYYY-MM-DD date", s),
                        });
                    }
                }
                None => issues.push(mismatch()),
            },
            FieldType::DateTime => match value.as_str() {
                Some(s) => {
                    if DateTime::parse_from_rfc3339(s).is_err() {
                        issues.push(ValidationIssue::InvalidFormat {
                            field: field.name.clone(),
                            reason: format!("'{}' is not an RFC 3339 datetime", s),
                        });
                    }
                }
                None => issues.push(mismatch()),
            },
            FieldType::Geometry => {}
        }
    }
}

fn check_text_length(field: &Field, value: &Value, issues: &mut Vec<ValidationIssue>) {
    let (Some(max), Some(s)) = (field.length, value.as_str()) else {
        return;
    };
    let actual = s.chars().count();
    if actual > max as usize {
        issues.push(ValidationIssue::TooLong {
            field: field.name.clone(),
            max,
            actual,
        });
    }
}

/// Compare a stored code (kept as text) against a record value, numerically
/// when the value is a number.
fn code_matches(code: &str, value: &Value) -> bool {
    match value {
        Value::String(s) => code == s,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                code.parse::<i64>() == Ok(i)
            } else {
                n.as_f64()
                    .and_then(|v| code.parse::<f64>().ok().map(|c| c == v))
                    .unwrap_or(false)
            }
        }
        _ => false,
    }
}
