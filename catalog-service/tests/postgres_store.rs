use std::env;

use anyhow::{Context, Result};
use catalog_service::models::{NewIdentity, ProductInput};
use catalog_service::store::{CatalogStore, PgStore, StoreError, UserStore};
use common_auth::Role;
use sqlx::postgres::PgPoolOptions;

async fn connect() -> Result<Option<PgStore>> {
    let Ok(url) = env::var("CATALOG_TEST_DATABASE_URL") else {
        eprintln!("Skipping catalog-service Postgres tests: set CATALOG_TEST_DATABASE_URL to run them.");
        return Ok(None);
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .context("connect to CATALOG_TEST_DATABASE_URL")?;
    let store = PgStore::new(pool.clone());
    store.migrate().await?;
    sqlx::query("TRUNCATE users, products, categories RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await?;
    Ok(Some(store))
}

#[tokio::test(flavor = "multi_thread")]
#[cfg_attr(not(feature = "integration"), ignore = "enable with --features integration (requires Postgres)")]
async fn users_round_trip_and_reject_duplicates() -> Result<()> {
    let Some(store) = connect().await? else {
        return Ok(());
    };

    let new = NewIdentity {
        username: "alice".into(),
        password_hash: "$argon2id$placeholder".into(),
        role: Role::Admin,
    };
    let saved = store.save(new.clone()).await?;
    let found = store.find_by_username("alice").await?.expect("saved user");
    assert_eq!(found, saved);
    assert_eq!(found.role, Role::Admin);

    assert!(matches!(store.save(new).await, Err(StoreError::Duplicate(_))));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[cfg_attr(not(feature = "integration"), ignore = "enable with --features integration (requires Postgres)")]
async fn category_delete_cascades() -> Result<()> {
    let Some(store) = connect().await? else {
        return Ok(());
    };

    let category = store.create_category("tools").await?;
    assert!(matches!(
        store.create_category("tools").await,
        Err(StoreError::Duplicate(_))
    ));
    store
        .create_product(ProductInput {
            name: "hammer".into(),
            description: None,
            price: 12.0,
            category_id: category.id,
        })
        .await?;
    assert!(matches!(
        store
            .create_product(ProductInput {
                name: "ghost".into(),
                description: None,
                price: 1.0,
                category_id: category.id + 100,
            })
            .await,
        Err(StoreError::UnknownCategory(_))
    ));

    assert!(store.delete_category(category.id).await?);
    assert!(store.list_products().await?.is_empty());
    Ok(())
}
