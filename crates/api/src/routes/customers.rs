//! Customer CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{Customer, CustomerId, Email};
use serde::{Deserialize, Serialize};
use table_store::TableStore;
use usecase::UpdateCustomer;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::{PageResponse, cursor_param, effective_limit};

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub email: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateCustomerRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct ListCustomersQuery {
    pub email: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id().to_string(),
            email: customer.email().to_string(),
            name: customer.name().to_string(),
            created_at: customer.created_at().to_rfc3339(),
            updated_at: customer.updated_at().to_rfc3339(),
        }
    }
}

/// POST /customers — register a customer.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = state.customers.create(&req.email, &req.name).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// GET /customers/:id — fetch a customer.
#[tracing::instrument(skip(state))]
pub async fn get<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = parse_customer_id(&id)?;
    let customer = state.customers.get(&id).await?;
    Ok(Json(customer.into()))
}

/// GET /customers — list customers paginated, or look a single one up
/// with `?email=`.
#[tracing::instrument(skip(state, query))]
pub async fn list<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListCustomersQuery>,
) -> Result<Response, ApiError> {
    if let Some(email) = &query.email {
        let email =
            Email::new(email).map_err(|e| ApiError::BadRequest(format!("invalid email: {e}")))?;
        let customer = state.customers.get_by_email(&email).await?;
        return Ok(Json(CustomerResponse::from(customer)).into_response());
    }

    let page = state
        .customers
        .list(effective_limit(query.limit), cursor_param(query.cursor))
        .await?;
    Ok(Json(PageResponse::new(
        page.items.into_iter().map(CustomerResponse::from).collect(),
        page.cursor,
    ))
    .into_response())
}

/// PUT /customers/:id — partially update a customer.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = parse_customer_id(&id)?;
    let customer = state
        .customers
        .update(
            &id,
            UpdateCustomer {
                email: req.email,
                name: req.name,
            },
        )
        .await?;
    Ok(Json(customer.into()))
}

/// DELETE /customers/:id — remove a customer.
#[tracing::instrument(skip(state))]
pub async fn delete<S: TableStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_customer_id(&id)?;
    state.customers.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_customer_id(id: &str) -> Result<CustomerId, ApiError> {
    CustomerId::new(id).map_err(|e| ApiError::BadRequest(format!("invalid customer id: {e}")))
}
