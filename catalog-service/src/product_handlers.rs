use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common_auth::Role;
use common_http_errors::ApiError;
use common_security::{ensure_role, SecurityCtxExtractor};
use tracing::info;

use crate::models::{Product, ProductInput};
use crate::store::StoreError;
use crate::AppState;

fn product_not_found(id: i64) -> ApiError {
    ApiError::not_found("product_not_found", format!("Product {id} not found"))
}

fn validate(input: &ProductInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::bad_request("invalid_product", "Product name must not be empty"));
    }
    if !input.price.is_finite() || input.price < 0.0 {
        return Err(ApiError::bad_request("invalid_price", "Price must be a non-negative number"));
    }
    Ok(())
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::UnknownCategory(id) => {
            ApiError::not_found("category_not_found", format!("Category {id} not found"))
        }
        other => ApiError::internal(other),
    }
}

pub async fn create_product(
    State(state): State<AppState>,
    SecurityCtxExtractor(ctx): SecurityCtxExtractor,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    ensure_role(&ctx, Role::Seller)?;
    validate(&input)?;

    let product = state.catalog.create_product(input).await.map_err(store_error)?;
    info!(product_id = product.id, category_id = product.category_id, username = %ctx.username, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    SecurityCtxExtractor(ctx): SecurityCtxExtractor,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>, ApiError> {
    ensure_role(&ctx, Role::Seller)?;
    validate(&input)?;

    let product = state
        .catalog
        .update_product(id, input)
        .await
        .map_err(store_error)?
        .ok_or_else(|| product_not_found(id))?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    SecurityCtxExtractor(ctx): SecurityCtxExtractor,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ensure_role(&ctx, Role::Seller)?;

    if !state.catalog.delete_product(id).await.map_err(store_error)? {
        return Err(product_not_found(id));
    }
    info!(product_id = id, username = %ctx.username, "product deleted");
    Ok(StatusCode::OK)
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    state
        .catalog
        .get_product(id)
        .await
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| product_not_found(id))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    state
        .catalog
        .list_products()
        .await
        .map(Json)
        .map_err(store_error)
}

pub async fn products_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<Vec<Product>>, ApiError> {
    state
        .catalog
        .products_in_category(category_id)
        .await
        .map(Json)
        .map_err(store_error)
}
