//! FASTCO Core: entity models, the schema registry, validation and the
//! repository traits shared by every FASTCO crate.

pub mod error;
pub mod models;
pub mod password;
pub mod registry;
pub mod relations;
pub mod repository;
pub mod validation;

pub use error::{FastcoError, FastcoResult};
pub use models::base::{Entity, EntityMeta, SCHEMA_VERSION};
pub use registry::{EntityKind, FieldDef, FieldType, SchemaRegistry};
pub use repository::{EntityRepository, ListFilter, PaginatedResult, Pagination};
