use crate::dtos::{LabelQuery, ResolveQuery};
use crate::models::{Customer, Product, Supplier};
use crate::services::catalog::{filter_by_label, resolve_exact};
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<LabelQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.catalog.list_products().await?;
    let query = params.q.unwrap_or_default();
    let filtered: Vec<Product> = filter_by_label(&products, &query)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(filtered))
}

/// Exact typeahead resolution. A `null` body means no match: the caller
/// treats it as a cleared selection, not a failure.
pub async fn resolve_product(
    State(state): State<AppState>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<Option<Product>>, AppError> {
    let products = state.catalog.list_products().await?;
    Ok(Json(resolve_exact(&products, &params.text).cloned()))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(params): Query<LabelQuery>,
) -> Result<Json<Vec<Supplier>>, AppError> {
    let suppliers = state.catalog.list_suppliers().await?;
    let query = params.q.unwrap_or_default();
    let filtered: Vec<Supplier> = filter_by_label(&suppliers, &query)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(filtered))
}

pub async fn resolve_supplier(
    State(state): State<AppState>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<Option<Supplier>>, AppError> {
    let suppliers = state.catalog.list_suppliers().await?;
    Ok(Json(resolve_exact(&suppliers, &params.text).cloned()))
}

pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<LabelQuery>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = state.catalog.list_customers().await?;
    let query = params.q.unwrap_or_default();
    let filtered: Vec<Customer> = filter_by_label(&customers, &query)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(filtered))
}

pub async fn resolve_customer(
    State(state): State<AppState>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<Option<Customer>>, AppError> {
    let customers = state.catalog.list_customers().await?;
    Ok(Json(resolve_exact(&customers, &params.text).cloned()))
}
