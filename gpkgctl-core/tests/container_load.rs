//! End-to-end loader tests against a fixture container built on disk.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::tempdir;

use gpkgctl_core::{
    FieldType, GeoPackage, GpkgError, TableKind, TableValidator, ValidationIssue,
};

const FIXTURE_SCHEMA: &str = r#"
CREATE TABLE gpkg_contents (
    table_name TEXT NOT NULL PRIMARY KEY,
    data_type TEXT NOT NULL,
    identifier TEXT UNIQUE,
    description TEXT DEFAULT '',
    last_change DATETIME,
    min_x DOUBLE, min_y DOUBLE, max_x DOUBLE, max_y DOUBLE,
    srs_id INTEGER
);

CREATE TABLE gpkg_data_columns (
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    name TEXT,
    title TEXT,
    description TEXT,
    mime_type TEXT,
    constraint_name TEXT,
    PRIMARY KEY (table_name, column_name)
);

CREATE TABLE gpkg_data_column_constraints (
    constraint_name TEXT NOT NULL,
    constraint_type TEXT NOT NULL,
    value TEXT,
    min NUMERIC,
    min_is_inclusive BOOLEAN,
    max NUMERIC,
    max_is_inclusive BOOLEAN,
    description TEXT
);

CREATE TABLE parks (
    fid INTEGER PRIMARY KEY AUTOINCREMENT,
    geom POINT,
    name TEXT(64) NOT NULL,
    status TEXT(16),
    coverage DOUBLE,
    visitors MEDIUMINT
);

CREATE TABLE inspections (
    fid INTEGER PRIMARY KEY,
    park_name TEXT NOT NULL,
    inspected_on DATE,
    passed BOOLEAN DEFAULT 1
);

CREATE TABLE basemap_tiles (
    id INTEGER PRIMARY KEY,
    zoom_level INTEGER,
    tile_data BLOB
);

INSERT INTO gpkg_contents (table_name, data_type, identifier, description, srs_id)
    VALUES ('parks', 'features', 'City parks', 'Managed park polygons', 4326);
INSERT INTO gpkg_contents (table_name, data_type)
    VALUES ('inspections', 'attributes');
INSERT INTO gpkg_contents (table_name, data_type, identifier)
    VALUES ('basemap_tiles', 'tiles', 'Basemap');

INSERT INTO gpkg_data_columns (table_name, column_name, title, constraint_name)
    VALUES ('parks', 'status', 'Operational status', 'park_status');
INSERT INTO gpkg_data_columns (table_name, column_name, title, constraint_name)
    VALUES ('parks', 'coverage', 'Canopy coverage (%)', 'pct');

INSERT INTO gpkg_data_column_constraints
    VALUES ('park_status', 'enum', 'O', NULL, NULL, NULL, NULL, 'Open');
INSERT INTO gpkg_data_column_constraints
    VALUES ('park_status', 'enum', 'C', NULL, NULL, NULL, NULL, 'Closed');
INSERT INTO gpkg_data_column_constraints
    VALUES ('pct', 'range', NULL, 0, 1, 100, 1, NULL);
"#;

async fn write_fixture(path: &Path, schema: &str) {
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await.unwrap();
    sqlx::raw_sql(schema).execute(&pool).await.unwrap();
    pool.close().await;
}

#[tokio::test]
async fn loads_tables_in_source_order_and_skips_tiles() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("city.gpkg");
    write_fixture(&path, FIXTURE_SCHEMA).await;

    let gpkg = GeoPackage::open(&path).await.unwrap();
    let catalog = gpkg.load_catalog().await.unwrap();

    let names: Vec<&str> = catalog.tables().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["parks", "inspections"]);
    assert_eq!(catalog.tables()[0].kind, TableKind::Features);
    assert_eq!(catalog.tables()[1].kind, TableKind::Attributes);
    assert_eq!(
        catalog.field_names("parks"),
        vec!["fid", "geom", "name", "status", "coverage", "visitors"]
    );
}

#[tokio::test]
async fn field_properties_come_from_pragma_and_data_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("city.gpkg");
    write_fixture(&path, FIXTURE_SCHEMA).await;

    let catalog = GeoPackage::open(&path)
        .await
        .unwrap()
        .load_catalog()
        .await
        .unwrap();

    let fid = catalog.field("parks", "fid").unwrap();
    assert_eq!(fid.field_type, FieldType::Integer);
    assert!(!fid.editable);
    assert!(!fid.nullable);

    let geom = catalog.field("parks", "geom").unwrap();
    assert_eq!(geom.field_type, FieldType::Geometry);

    let name = catalog.field("parks", "name").unwrap();
    assert_eq!(name.field_type, FieldType::Text);
    assert_eq!(name.length, Some(64));
    assert!(!name.nullable);

    let status = catalog.field("parks", "status").unwrap();
    assert_eq!(status.alias.as_deref(), Some("Operational status"));
    assert_eq!(status.domain.as_deref(), Some("park_status"));

    let visitors = catalog.field("parks", "visitors").unwrap();
    assert_eq!(visitors.field_type, FieldType::MediumInt);

    let passed = catalog.field("inspections", "passed").unwrap();
    assert_eq!(passed.field_type, FieldType::Boolean);
    assert_eq!(passed.default.as_deref(), Some("1"));
}

#[tokio::test]
async fn describe_cross_references_domains() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("city.gpkg");
    write_fixture(&path, FIXTURE_SCHEMA).await;

    let catalog = GeoPackage::open(&path)
        .await
        .unwrap()
        .load_catalog()
        .await
        .unwrap();

    assert_eq!(catalog.domains().len(), 2);

    let status = catalog.describe("parks", "status").unwrap();
    let codes: Vec<&str> = status
        .coded_values()
        .unwrap()
        .iter()
        .map(|v| v.code.as_str())
        .collect();
    assert_eq!(codes, vec!["O", "C"]);

    let name = catalog.describe("parks", "name").unwrap();
    assert!(name.domain.is_none());
    assert!(name.coded_values().is_none());

    let coverage = catalog.describe("parks", "coverage").unwrap();
    assert_eq!(coverage.domain.unwrap().kind.as_str(), "range");
}

#[tokio::test]
async fn validates_records_against_loaded_schema() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("city.gpkg");
    write_fixture(&path, FIXTURE_SCHEMA).await;

    let catalog = GeoPackage::open(&path)
        .await
        .unwrap()
        .load_catalog()
        .await
        .unwrap();

    let validator = TableValidator::new(&catalog, "parks").unwrap();

    let good = serde_json::json!({
        "geom": "POINT(153.02 -27.47)",
        "name": "Roma Street Parkland",
        "status": "O",
        "coverage": 62.5,
        "visitors": 350000,
    });
    assert!(validator.validate_value(&good).is_empty());

    let bad = serde_json::json!({ "name": "Elm", "status": "X", "coverage": 250.0 });
    let issues = validator.validate_value(&bad);
    assert!(issues
        .iter()
        .any(|i| matches!(i, ValidationIssue::NotInDomain { field, .. } if field == "status")));
    assert!(issues
        .iter()
        .any(|i| matches!(i, ValidationIssue::OutsideRange { field, .. } if field == "coverage")));
}

#[tokio::test]
async fn missing_file_is_a_structured_error() {
    let dir = tempdir().unwrap();
    let err = GeoPackage::open(dir.path().join("absent.gpkg"))
        .await
        .unwrap_err();
    assert!(matches!(err, GpkgError::ContainerNotFound { .. }));
}

#[tokio::test]
async fn sqlite_file_without_contents_table_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plain.db");
    write_fixture(&path, "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT);").await;

    let err = GeoPackage::open(&path).await.unwrap_err();
    assert!(matches!(err, GpkgError::InvalidContainer { .. }));
}

#[tokio::test]
async fn unknown_declared_type_fails_the_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("odd.gpkg");
    let schema = r#"
CREATE TABLE gpkg_contents (
    table_name TEXT NOT NULL PRIMARY KEY,
    data_type TEXT NOT NULL,
    identifier TEXT,
    description TEXT
);
CREATE TABLE widgets (id INTEGER PRIMARY KEY, payload VARCHAR2);
INSERT INTO gpkg_contents (table_name, data_type) VALUES ('widgets', 'attributes');
"#;
    write_fixture(&path, schema).await;

    let gpkg = GeoPackage::open(&path).await.unwrap();
    let err = gpkg.load_catalog().await.unwrap_err();
    assert!(matches!(err, GpkgError::UnknownFieldType { .. }));
}
