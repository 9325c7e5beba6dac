use async_trait::async_trait;
use common_auth::Role;
use sqlx::PgPool;

use super::{CatalogStore, StoreError, StoreResult, UserStore};
use crate::models::{Category, Identity, NewIdentity, Product, ProductInput};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

const PRODUCT_COLUMNS: &str = "id, name, description, price, category_id";

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = StoreError;

    fn try_from(row: IdentityRow) -> StoreResult<Self> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        Ok(Identity {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role,
        })
    }
}

fn db_error_code(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.db).await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Identity>> {
        sqlx::query_as::<_, IdentityRow>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(backend)?
        .map(Identity::try_from)
        .transpose()
    }

    async fn save(&self, identity: NewIdentity) -> StoreResult<Identity> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "INSERT INTO users (username, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING id, username, password_hash, role",
        )
        .bind(&identity.username)
        .bind(&identity.password_hash)
        .bind(identity.role.name())
        .fetch_one(&self.db)
        .await
        .map_err(|err| match db_error_code(&err).as_deref() {
            Some(UNIQUE_VIOLATION) => StoreError::Duplicate("username"),
            _ => backend(err),
        })?;
        Identity::try_from(row)
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn create_category(&self, name: &str) -> StoreResult<Category> {
        sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.db)
            .await
            .map_err(|err| match db_error_code(&err).as_deref() {
                Some(UNIQUE_VIOLATION) => StoreError::Duplicate("category name"),
                _ => backend(err),
            })
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.db)
            .await
            .map_err(backend)
    }

    async fn get_category(&self, id: i64) -> StoreResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(backend)
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        // products go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_product(&self, input: ProductInput) -> StoreResult<Product> {
        let category_id = input.category_id;
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, description, price, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(input.name)
        .bind(input.description)
        .bind(input.price)
        .bind(category_id)
        .fetch_one(&self.db)
        .await
        .map_err(|err| match db_error_code(&err).as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => StoreError::UnknownCategory(category_id),
            _ => backend(err),
        })
    }

    async fn update_product(&self, id: i64, input: ProductInput) -> StoreResult<Option<Product>> {
        let category_id = input.category_id;
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET name = $2, description = $3, price = $4, category_id = $5
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.price)
        .bind(category_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| match db_error_code(&err).as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => StoreError::UnknownCategory(category_id),
            _ => backend(err),
        })
    }

    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(backend)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
            .fetch_all(&self.db)
            .await
            .map_err(backend)
    }

    async fn products_in_category(&self, category_id: i64) -> StoreResult<Vec<Product>> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = $1 ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(&self.db)
        .await
        .map_err(backend)
    }
}
