//! Order placement, retrieval, and lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::{CustomerId, Order, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use table_store::TableStore;
use usecase::{OrderLine, PlaceOrderRequest};

use crate::AppState;
use crate::error::ApiError;
use crate::routes::{PageResponse, cursor_param, effective_limit};

#[derive(Deserialize)]
pub struct PlaceOrderBody {
    pub customer_id: String,
    pub items: Vec<OrderLineBody>,
}

#[derive(Deserialize)]
pub struct OrderLineBody {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Listing filters: at least one of `customer_id` and `status`;
/// combined they narrow a customer's orders to one status.
#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub customer_id: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub total_cents: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let items = order
            .items()
            .iter()
            .map(|item| OrderItemResponse {
                product_id: item.product_id().to_string(),
                quantity: item.quantity(),
                unit_price_cents: item.unit_price().cents(),
                total_cents: item.total_price().cents(),
            })
            .collect();
        Self {
            id: order.id().to_string(),
            customer_id: order.customer_id().to_string(),
            status: order.status().to_string(),
            items,
            total_cents: order.total().cents(),
            created_at: order.created_at().to_rfc3339(),
            updated_at: order.updated_at().to_rfc3339(),
        }
    }
}

/// POST /orders — place an order.
#[tracing::instrument(skip(state, req))]
pub async fn place<S: TableStore + Clone>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<PlaceOrderBody>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let customer_id = CustomerId::new(&req.customer_id)
        .map_err(|e| ApiError::BadRequest(format!("invalid customer id: {e}")))?;
    let mut lines = Vec::with_capacity(req.items.len());
    for item in &req.items {
        lines.push(OrderLine {
            product_id: domain::ProductId::new(&item.product_id)
                .map_err(|e| ApiError::BadRequest(format!("invalid product id: {e}")))?,
            quantity: item.quantity,
        });
    }

    let order = state
        .place_order
        .execute(PlaceOrderRequest { customer_id, lines })
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/:id — fetch an order.
#[tracing::instrument(skip(state))]
pub async fn get<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = parse_order_id(&id)?;
    let order = state.orders.get(&id).await?;
    Ok(Json(order.into()))
}

/// GET /orders — list orders by customer, by status, or by both,
/// paginated.
#[tracing::instrument(skip(state, query))]
pub async fn list<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<PageResponse<OrderResponse>>, ApiError> {
    let limit = effective_limit(query.limit);
    let cursor = cursor_param(query.cursor);
    let page = match (&query.customer_id, query.status) {
        (Some(customer_id), status) => {
            let customer_id = CustomerId::new(customer_id)
                .map_err(|e| ApiError::BadRequest(format!("invalid customer id: {e}")))?;
            match status {
                Some(status) => {
                    state
                        .orders
                        .list_by_customer_and_status(&customer_id, status, limit, cursor)
                        .await?
                }
                None => {
                    state
                        .orders
                        .list_by_customer(&customer_id, limit, cursor)
                        .await?
                }
            }
        }
        (None, Some(status)) => state.orders.list_by_status(status, limit, cursor).await?,
        (None, None) => {
            return Err(ApiError::BadRequest(
                "customer_id or status is required".to_string(),
            ));
        }
    };
    Ok(Json(PageResponse::new(
        page.items.into_iter().map(Into::into).collect(),
        page.cursor,
    )))
}

/// POST /orders/:id/status — drive the order through its state machine.
#[tracing::instrument(skip(state, req))]
pub async fn update_status<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = parse_order_id(&id)?;
    let order = state.orders.update_status(&id, req.status).await?;
    Ok(Json(order.into()))
}

/// DELETE /orders/:id — remove an order record.
#[tracing::instrument(skip(state))]
pub async fn delete<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_order_id(&id)?;
    state.orders.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    OrderId::new(id).map_err(|e| ApiError::BadRequest(format!("invalid order id: {e}")))
}
