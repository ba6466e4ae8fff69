//! Service layer for the product catalog.
//! - `file::ProductStore` keeps products in one JSON file and rewrites it on every change.
//! - `catalog::ProductCatalog` is the seam callers program against.
//! - Record types and merge rules live in the `models` crate.

pub mod errors;
pub mod catalog;
pub mod file;
pub mod runtime;
pub mod storage;

pub use catalog::{DynProductCatalog, ProductCatalog};
pub use errors::{Action, ServiceError};
pub use file::{ProductStore, StoreOptions};
pub use storage::{ReadMode, WriteMode};
