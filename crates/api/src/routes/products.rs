//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::{Product, ProductId};
use serde::{Deserialize, Serialize};
use table_store::TableStore;
use usecase::UpdateProduct;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::{PageResponse, cursor_param, effective_limit};

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: u32,
}

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<u32>,
}

#[derive(Deserialize)]
pub struct RestockRequest {
    pub amount: u32,
}

#[derive(Deserialize)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub in_stock: bool,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub stock: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            price_cents: product.price().cents(),
            stock: product.stock(),
            created_at: product.created_at().to_rfc3339(),
            updated_at: product.updated_at().to_rfc3339(),
        }
    }
}

/// POST /products — add a product to the catalog.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state
        .products
        .create(&req.name, &req.description, req.price_cents, req.stock)
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /products — list the catalog (`?in_stock=true` filters to
/// available products), with `limit`/`cursor` pagination.
#[tracing::instrument(skip(state, query))]
pub async fn list<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<PageResponse<ProductResponse>>, ApiError> {
    let limit = effective_limit(query.limit);
    let cursor = cursor_param(query.cursor);
    let page = if query.in_stock {
        state.products.list_in_stock(limit, cursor).await?
    } else {
        state.products.list(limit, cursor).await?
    };
    Ok(Json(PageResponse::new(
        page.items.into_iter().map(Into::into).collect(),
        page.cursor,
    )))
}

/// GET /products/:id — fetch a product.
#[tracing::instrument(skip(state))]
pub async fn get<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_product_id(&id)?;
    let product = state.products.get(&id).await?;
    Ok(Json(product.into()))
}

/// PUT /products/:id — partially update a product.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_product_id(&id)?;
    let product = state
        .products
        .update(
            &id,
            UpdateProduct {
                name: req.name,
                description: req.description,
                price_cents: req.price_cents,
                stock: req.stock,
            },
        )
        .await?;
    Ok(Json(product.into()))
}

/// POST /products/:id/restock — add units to the stock level.
#[tracing::instrument(skip(state, req))]
pub async fn restock<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<RestockRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_product_id(&id)?;
    let product = state.products.restock(&id, req.amount).await?;
    Ok(Json(product.into()))
}

/// DELETE /products/:id — remove a product.
#[tracing::instrument(skip(state))]
pub async fn delete<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_product_id(&id)?;
    state.products.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    ProductId::new(id).map_err(|e| ApiError::BadRequest(format!("invalid product id: {e}")))
}
