use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CatalogStore, StoreError, StoreResult, UserStore};
use crate::models::{Category, Identity, NewIdentity, Product, ProductInput};

#[derive(Default)]
struct State {
    users: HashMap<String, Identity>,
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    last_user_id: i64,
    last_category_id: i64,
    last_product_id: i64,
}

/// Process-local store used when no `DATABASE_URL` is configured and by tests.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn build_product(id: i64, input: ProductInput) -> Product {
    Product {
        id,
        name: input.name,
        description: input.description,
        price: input.price,
        category_id: input.category_id,
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Identity>> {
        Ok(self.state.read().await.users.get(username).cloned())
    }

    async fn save(&self, identity: NewIdentity) -> StoreResult<Identity> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&identity.username) {
            return Err(StoreError::Duplicate("username"));
        }
        state.last_user_id += 1;
        let saved = Identity {
            id: state.last_user_id,
            username: identity.username,
            password_hash: identity.password_hash,
            role: identity.role,
        };
        state.users.insert(saved.username.clone(), saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn create_category(&self, name: &str) -> StoreResult<Category> {
        let mut state = self.state.write().await;
        if state.categories.values().any(|c| c.name == name) {
            return Err(StoreError::Duplicate("category name"));
        }
        state.last_category_id += 1;
        let category = Category {
            id: state.last_category_id,
            name: name.to_string(),
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.state.read().await.categories.values().cloned().collect())
    }

    async fn get_category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.categories.remove(&id).is_none() {
            return Ok(false);
        }
        state.products.retain(|_, p| p.category_id != id);
        Ok(true)
    }

    async fn create_product(&self, input: ProductInput) -> StoreResult<Product> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&input.category_id) {
            return Err(StoreError::UnknownCategory(input.category_id));
        }
        state.last_product_id += 1;
        let product = build_product(state.last_product_id, input);
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i64, input: ProductInput) -> StoreResult<Option<Product>> {
        let mut state = self.state.write().await;
        if !state.products.contains_key(&id) {
            return Ok(None);
        }
        if !state.categories.contains_key(&input.category_id) {
            return Err(StoreError::UnknownCategory(input.category_id));
        }
        let product = build_product(id, input);
        state.products.insert(id, product.clone());
        Ok(Some(product))
    }

    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        Ok(self.state.write().await.products.remove(&id).is_some())
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.state.read().await.products.values().cloned().collect())
    }

    async fn products_in_category(&self, category_id: i64) -> StoreResult<Vec<Product>> {
        Ok(self
            .state
            .read()
            .await
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_auth::Role;

    fn input(name: &str, category_id: i64) -> ProductInput {
        ProductInput {
            name: name.into(),
            description: None,
            price: 9.5,
            category_id,
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        let new = NewIdentity {
            username: "alice".into(),
            password_hash: "x".into(),
            role: Role::Seller,
        };
        let saved = store.save(new.clone()).await.unwrap();
        assert_eq!(saved.id, 1);
        assert!(matches!(store.save(new).await, Err(StoreError::Duplicate(_))));
    }

    #[tokio::test]
    async fn deleting_category_cascades_to_products() {
        let store = MemoryStore::new();
        let tools = store.create_category("tools").await.unwrap();
        let toys = store.create_category("toys").await.unwrap();
        store.create_product(input("hammer", tools.id)).await.unwrap();
        store.create_product(input("yo-yo", toys.id)).await.unwrap();

        assert!(store.delete_category(tools.id).await.unwrap());
        let remaining = store.list_products().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "yo-yo");
        assert!(!store.delete_category(tools.id).await.unwrap());
    }

    #[tokio::test]
    async fn product_requires_existing_category() {
        let store = MemoryStore::new();
        let err = store.create_product(input("ghost", 42)).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownCategory(42)));
    }
}
