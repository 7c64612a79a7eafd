//! In-memory schema catalog and cross-reference lookups.
//!
//! Built once by the loader and read-only afterwards. Name lookups are
//! case-insensitive, matching SQLite identifier semantics.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::model::{CodedValue, Domain, Field, Table};

/// Cross-reference over the loaded tables and domains.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    tables: Vec<Table>,
    domains: Vec<Domain>,
    table_index: HashMap<String, usize>,
    domain_index: HashMap<String, usize>,
}

impl SchemaCatalog {
    /// Build the catalog and its name indexes. Fields referencing a domain
    /// name that is not in `domains` are left in place; the dangling
    /// reference resolves to `None` at lookup and is logged once here.
    pub fn new(tables: Vec<Table>, domains: Vec<Domain>) -> Self {
        let table_index = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.to_ascii_lowercase(), i))
            .collect();
        let domain_index: HashMap<String, usize> = domains
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.to_ascii_lowercase(), i))
            .collect();

        for table in &tables {
            for field in &table.fields {
                if let Some(name) = &field.domain {
                    if !domain_index.contains_key(&name.to_ascii_lowercase()) {
                        warn!(
                            table = %table.name,
                            field = %field.name,
                            domain = %name,
                            "field references a constraint with no definition"
                        );
                    }
                }
            }
        }

        Self {
            tables,
            domains,
            table_index,
            domain_index,
        }
    }

    /// All tables, in container source order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// All domains, in container source order.
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.table_index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.tables[i])
    }

    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domain_index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.domains[i])
    }

    /// Field names of a table in source order. An unknown table name yields
    /// an empty list, since selection options are sourced from this same
    /// catalog.
    pub fn field_names(&self, table: &str) -> Vec<&str> {
        self.table(table)
            .map(|t| t.fields.iter().map(|f| f.name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn field(&self, table: &str, field: &str) -> Option<&Field> {
        self.table(table)?.field(field)
    }

    /// Resolve a field's domain reference. `None` when the field carries no
    /// reference or the referenced name has no definition.
    pub fn domain_for(&self, field: &Field) -> Option<&Domain> {
        self.domain(field.domain.as_deref()?)
    }

    /// The selection cross-reference: a field's display properties plus its
    /// resolved domain, if any.
    pub fn describe(&self, table: &str, field: &str) -> Option<FieldDetail<'_>> {
        let table = self.table(table)?;
        let field = table.field(field)?;
        Some(FieldDetail {
            table: &table.name,
            field,
            domain: self.domain_for(field),
        })
    }
}

/// Result of [`SchemaCatalog::describe`]: one field with its resolved domain.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDetail<'a> {
    pub table: &'a str,
    #[serde(flatten)]
    pub field: &'a Field,
    pub domain: Option<&'a Domain>,
}

impl FieldDetail<'_> {
    /// Code → label rows when the field's domain is coded-value.
    pub fn coded_values(&self) -> Option<&[CodedValue]> {
        self.domain.and_then(|d| d.coded_values())
    }
}
