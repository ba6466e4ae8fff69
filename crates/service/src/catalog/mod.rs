pub mod product_catalog;

pub use product_catalog::{DynProductCatalog, ProductCatalog};
