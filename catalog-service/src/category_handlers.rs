use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common_auth::Role;
use common_http_errors::ApiError;
use common_security::{ensure_role, SecurityCtxExtractor};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Category, Product};
use crate::store::StoreError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub products: Vec<Product>,
}

impl CategoryResponse {
    fn new(category: Category, products: Vec<Product>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            products,
        }
    }
}

fn category_not_found(id: i64) -> ApiError {
    ApiError::not_found("category_not_found", format!("Category {id} not found"))
}

pub async fn create_category(
    State(state): State<AppState>,
    SecurityCtxExtractor(ctx): SecurityCtxExtractor,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    ensure_role(&ctx, Role::Admin)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("invalid_category", "Category name must not be empty"));
    }

    let category = state
        .catalog
        .create_category(name)
        .await
        .map_err(|err| match err {
            StoreError::Duplicate(_) => ApiError::conflict(
                "category_exists",
                format!("Category with name '{name}' already exists"),
            ),
            other => ApiError::internal(other),
        })?;

    info!(category_id = category.id, username = %ctx.username, "category created");
    Ok((StatusCode::CREATED, Json(CategoryResponse::new(category, Vec::new()))))
}

pub async fn delete_category(
    State(state): State<AppState>,
    SecurityCtxExtractor(ctx): SecurityCtxExtractor,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ensure_role(&ctx, Role::Admin)?;

    let removed = state
        .catalog
        .delete_category(id)
        .await
        .map_err(ApiError::internal)?;
    if !removed {
        return Err(category_not_found(id));
    }

    info!(category_id = id, username = %ctx.username, "category deleted");
    Ok(StatusCode::OK)
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = state
        .catalog
        .get_category(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| category_not_found(id))?;
    let products = state
        .catalog
        .products_in_category(id)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(CategoryResponse::new(category, products)))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state
        .catalog
        .list_categories()
        .await
        .map_err(ApiError::internal)?;

    let mut out = Vec::with_capacity(categories.len());
    for category in categories {
        let products = state
            .catalog
            .products_in_category(category.id)
            .await
            .map_err(ApiError::internal)?;
        out.push(CategoryResponse::new(category, products));
    }
    Ok(Json(out))
}
