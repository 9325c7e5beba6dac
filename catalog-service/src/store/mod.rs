//! Persistence collaborators. Handlers and the auth components only see the
//! traits; `main` picks Postgres or the in-memory backend at start-up.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Category, Identity, NewIdentity, Product, ProductInput};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate {0}")]
    Duplicate(&'static str),
    #[error("category {0} does not exist")]
    UnknownCategory(i64),
    #[error("store backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Identity>>;

    /// Registration only. A taken username is [`StoreError::Duplicate`].
    async fn save(&self, identity: NewIdentity) -> StoreResult<Identity>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_category(&self, name: &str) -> StoreResult<Category>;
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn get_category(&self, id: i64) -> StoreResult<Option<Category>>;
    /// Removes the category and its products. `false` if it did not exist.
    async fn delete_category(&self, id: i64) -> StoreResult<bool>;

    async fn create_product(&self, input: ProductInput) -> StoreResult<Product>;
    async fn update_product(&self, id: i64, input: ProductInput) -> StoreResult<Option<Product>>;
    async fn delete_product(&self, id: i64) -> StoreResult<bool>;
    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>>;
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn products_in_category(&self, category_id: i64) -> StoreResult<Vec<Product>>;
}
