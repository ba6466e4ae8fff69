use std::{path::{Path, PathBuf}, sync::Arc};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use models::{next_id, DeleteAck, Product, ProductFields};

use crate::catalog::ProductCatalog;
use crate::errors::{Action, ServiceError};
use crate::storage::{JsonListStore, ReadMode, WriteMode};

/// Knobs for the backing file. The defaults keep the plain
/// read-modify-write behaviour: lenient reads, in-place writes, no locking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    pub read_mode: ReadMode,
    pub write_mode: WriteMode,
    /// Queue mutating calls on this store (and its clones) behind one mutex.
    pub serialize_writes: bool,
}

impl From<&configs::StoreConfig> for StoreOptions {
    fn from(cfg: &configs::StoreConfig) -> Self {
        Self {
            read_mode: cfg.read_mode,
            write_mode: cfg.write_mode,
            serialize_writes: cfg.serialize_writes,
        }
    }
}

/// Product collection persisted as a JSON array in a single file.
///
/// Every call reloads the file; every mutation rewrites all of it. Two
/// concurrent mutations without `serialize_writes` can read the same snapshot
/// and the later write wins.
#[derive(Debug, Clone)]
pub struct ProductStore {
    records: JsonListStore<Product>,
    write_lock: Option<Arc<Mutex<()>>>,
}

impl ProductStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self::with_options(path, StoreOptions::default())
    }

    pub fn with_options<P: Into<PathBuf>>(path: P, options: StoreOptions) -> Self {
        let records = JsonListStore::new(path, options.read_mode, options.write_mode);
        let write_lock = options.serialize_writes.then(|| Arc::new(Mutex::new(())));
        Self { records, write_lock }
    }

    pub fn path(&self) -> &Path {
        self.records.path()
    }

    async fn writer(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    /// All products in insertion order. A missing, empty or (in lenient mode)
    /// corrupt file yields an empty list.
    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.records.load(Action::Listing).await
    }

    /// First product with the given id, or `None`.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<Product>, ServiceError> {
        let products = self.records.load(Action::Fetching).await?;
        Ok(products.into_iter().find(|p| p.id == id))
    }

    /// Append a new product. Its id is one past the current maximum; an `id`
    /// among `fields` is ignored. Fails without writing when the maximum is `u64::MAX`.
    pub async fn add(&self, fields: ProductFields) -> Result<Product, ServiceError> {
        let _guard = self.writer().await;
        let mut products = self.records.load(Action::Adding).await?;

        let product = Product::new(next_id(&products)?, fields);
        products.push(product.clone());
        self.records.save(&products, Action::Adding).await?;

        info!(id = product.id, count = products.len(), "product added");
        Ok(product)
    }

    /// Shallow-merge `fields` into the product, keeping its id and position.
    pub async fn update(&self, id: u64, fields: ProductFields) -> Result<Product, ServiceError> {
        let _guard = self.writer().await;
        let mut products = self.records.load(Action::Updating).await?;

        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or(ServiceError::NotFound(id))?;
        products[index].merge(fields);
        let updated = products[index].clone();
        self.records.save(&products, Action::Updating).await?;

        info!(id, "product updated");
        Ok(updated)
    }

    /// Remove exactly one product; the others keep their ids and order.
    pub async fn delete(&self, id: u64) -> Result<DeleteAck, ServiceError> {
        let _guard = self.writer().await;
        let mut products = self.records.load(Action::Deleting).await?;

        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or(ServiceError::NotFound(id))?;
        products.remove(index);
        self.records.save(&products, Action::Deleting).await?;

        debug!(id, remaining = products.len(), "product deleted");
        Ok(DeleteAck::deleted())
    }
}

#[async_trait::async_trait]
impl ProductCatalog for ProductStore {
    async fn list(&self) -> Result<Vec<Product>, ServiceError> { self.list().await }
    async fn get_by_id(&self, id: u64) -> Result<Option<Product>, ServiceError> { self.get_by_id(id).await }
    async fn add(&self, fields: ProductFields) -> Result<Product, ServiceError> { self.add(fields).await }
    async fn update(&self, id: u64, fields: ProductFields) -> Result<Product, ServiceError> { self.update(id, fields).await }
    async fn delete(&self, id: u64) -> Result<DeleteAck, ServiceError> { self.delete(id).await }
}
