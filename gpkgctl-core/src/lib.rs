pub mod catalog;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use catalog::{FieldDetail, SchemaCatalog};
pub use error::{GpkgError, Result};
pub use loader::GeoPackage;
pub use model::{CodedValue, Domain, DomainKind, Field, FieldType, Table, TableKind};
pub use validate::{TableValidator, ValidateOptions, ValidationIssue};
