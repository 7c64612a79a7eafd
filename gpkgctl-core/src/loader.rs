//! One-time metadata load from a GeoPackage container.
//!
//! The container is an ordinary SQLite file; schema metadata lives in
//! `gpkg_contents` (tables), `PRAGMA table_info` (columns),
//! `gpkg_data_columns` (aliases and constraint references, optional), and
//! `gpkg_data_column_constraints` (domains, optional).

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info};

use crate::catalog::SchemaCatalog;
use crate::error::{GpkgError, Result};
use crate::model::{CodedValue, Domain, DomainKind, Field, FieldType, Table, TableKind};

/// Read-only handle on a GeoPackage container.
#[derive(Debug)]
pub struct GeoPackage {
    pool: SqlitePool,
}

impl GeoPackage {
    /// Open an existing container read-only. Fails if the path does not
    /// exist or the file lacks the `gpkg_contents` metadata table.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(GpkgError::container_not_found(path));
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))?
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let gpkg = Self { pool };
        if !gpkg.table_exists("gpkg_contents").await? {
            return Err(GpkgError::invalid_container(path, "missing gpkg_contents"));
        }

        Ok(gpkg)
    }

    /// Load the full schema catalog: tables with their fields, plus domains.
    pub async fn load_catalog(&self) -> Result<SchemaCatalog> {
        let domains = self.load_domains().await?;
        let tables = self.load_tables().await?;
        info!(
            tables = tables.len(),
            domains = domains.len(),
            "loaded container schema"
        );
        Ok(SchemaCatalog::new(tables, domains))
    }

    async fn table_exists(&self, name: &str) -> Result<bool> {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn load_tables(&self) -> Result<Vec<Table>> {
        let rows = sqlx::query(
            "SELECT table_name, data_type, identifier, description \
             FROM gpkg_contents ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let has_data_columns = self.table_exists("gpkg_data_columns").await?;

        let mut tables = Vec::new();
        for row in rows {
            let name: String = row.try_get("table_name")?;
            let data_type: String = row.try_get("data_type")?;
            let Some(kind) = TableKind::from_data_type(&data_type) else {
                debug!(table = %name, data_type = %data_type, "skipping non-schema content");
                continue;
            };
            let identifier: Option<String> = row.try_get("identifier")?;
            let description: Option<String> = row.try_get("description")?;
            let fields = self.load_fields(&name, has_data_columns).await?;

            tables.push(Table {
                name,
                kind,
                identifier,
                description: description.filter(|d| !d.is_empty()),
                fields,
            });
        }

        Ok(tables)
    }

    async fn load_fields(&self, table: &str, has_data_columns: bool) -> Result<Vec<Field>> {
        // Alias and constraint-name registrations, keyed by column name.
        let mut registered: HashMap<String, (Option<String>, Option<String>)> = HashMap::new();
        if has_data_columns {
            let rows = sqlx::query(
                "SELECT column_name, title, constraint_name \
                 FROM gpkg_data_columns WHERE table_name = ?",
            )
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
            for row in rows {
                let column: String = row.try_get("column_name")?;
                let title: Option<String> = row.try_get("title")?;
                let constraint: Option<String> = row.try_get("constraint_name")?;
                registered.insert(
                    column,
                    (
                        title.filter(|t| !t.is_empty()),
                        constraint.filter(|c| !c.is_empty()),
                    ),
                );
            }
        }

        // PRAGMA does not support bind parameters; escape the identifier.
        let pragma = format!("PRAGMA table_info(\"{}\")", table.replace('"', "\"\""));
        let rows = sqlx::query(&pragma).fetch_all(&self.pool).await?;

        let mut fields = Vec::new();
        for row in rows {
            let name: String = row.try_get("name")?;
            let declared: String = row.try_get("type")?;
            let notnull: i64 = row.try_get("notnull")?;
            let pk: i64 = row.try_get("pk")?;
            let default: Option<String> = row.try_get("dflt_value")?;

            let (field_type, length) = FieldType::parse_declared(&declared)
                .ok_or_else(|| GpkgError::unknown_field_type(table, &name, &declared))?;
            let (alias, domain) = registered.remove(&name).unwrap_or((None, None));

            fields.push(Field {
                name,
                alias,
                field_type,
                length,
                // The integer primary key is implicitly NOT NULL in SQLite
                // even when the flag is unset.
                nullable: notnull == 0 && pk == 0,
                editable: pk == 0,
                default,
                domain,
            });
        }

        Ok(fields)
    }

    async fn load_domains(&self) -> Result<Vec<Domain>> {
        if !self.table_exists("gpkg_data_column_constraints").await? {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT constraint_name, constraint_type, value, \
                    min, min_is_inclusive, max, max_is_inclusive, description \
             FROM gpkg_data_column_constraints ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut domains: Vec<Domain> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for row in rows {
            let name: String = row.try_get("constraint_name")?;
            let kind_tag: String = row.try_get("constraint_type")?;

            match kind_tag.as_str() {
                "enum" => {
                    let code: String = row
                        .try_get::<Option<String>, _>("value")?
                        .ok_or_else(|| {
                            GpkgError::malformed_domain(&name, "enum row without a value")
                        })?;
                    let label = row
                        .try_get::<Option<String>, _>("description")?
                        .filter(|d| !d.is_empty())
                        .unwrap_or_else(|| code.clone());
                    let coded = CodedValue { code, label };

                    match index.get(&name) {
                        Some(&i) => match &mut domains[i].kind {
                            DomainKind::Coded { values } => values.push(coded),
                            _ => {
                                return Err(GpkgError::malformed_domain(
                                    &name,
                                    "mixes enum rows with another constraint type",
                                ))
                            }
                        },
                        None => {
                            index.insert(name.clone(), domains.len());
                            domains.push(Domain {
                                name,
                                kind: DomainKind::Coded {
                                    values: vec![coded],
                                },
                            });
                        }
                    }
                }
                "range" | "glob" => {
                    if index.contains_key(&name) {
                        return Err(GpkgError::malformed_domain(
                            &name,
                            "more than one range/glob row for one constraint",
                        ));
                    }
                    let kind = if kind_tag == "range" {
                        DomainKind::Range {
                            min: row.try_get("min")?,
                            min_inclusive: row
                                .try_get::<Option<bool>, _>("min_is_inclusive")?
                                .unwrap_or(true),
                            max: row.try_get("max")?,
                            max_inclusive: row
                                .try_get::<Option<bool>, _>("max_is_inclusive")?
                                .unwrap_or(true),
                        }
                    } else {
                        let pattern: String =
                            row.try_get::<Option<String>, _>("value")?.ok_or_else(|| {
                                GpkgError::malformed_domain(&name, "glob row without a pattern")
                            })?;
                        DomainKind::Glob { pattern }
                    };
                    index.insert(name.clone(), domains.len());
                    domains.push(Domain { name, kind });
                }
                other => {
                    return Err(GpkgError::unknown_constraint_type(&name, other));
                }
            }
        }

        Ok(domains)
    }
}
