use std::sync::Arc;

use async_trait::async_trait;
use models::{DeleteAck, Product, ProductFields};

use crate::errors::ServiceError;

pub type DynProductCatalog = Arc<dyn ProductCatalog>;

/// Trait abstraction for product storage (CRUD keyed by numeric id).
/// Implementations decide where the collection lives; callers only see these five operations.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ServiceError>;
    async fn get_by_id(&self, id: u64) -> Result<Option<Product>, ServiceError>;
    async fn add(&self, fields: ProductFields) -> Result<Product, ServiceError>;
    async fn update(&self, id: u64, fields: ProductFields) -> Result<Product, ServiceError>;
    async fn delete(&self, id: u64) -> Result<DeleteAck, ServiceError>;
}
