// src/handlers/customers.rs
//
// Rotas administrativas de clientes do painel da loja. A loja alvo vem do
// cabeçalho x-tenant-id (extrator TenantContext); tudo aqui responde sobre
// a visão reconciliada, nunca sobre as partições cruas.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantContext,
    models::customer::{AdminCustomer, CustomerRecord, ReconciliationReport},
    models::stats::{CustomerStatsOverview, LoyaltyDistribution},
    services::stats::LedgerScope,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@email.com")]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "555-0101")]
    pub phone: String,

    pub address: Option<String>,
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Clientes",
    responses(
        (status = 200, description = "Visão reconciliada dos clientes da loja", body = Vec<CustomerRecord>),
        (status = 404, description = "Tenant não encontrado")
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID da Loja")
    )
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.customer_ledger.list_customers(&tenant.0).await?;

    Ok((StatusCode::OK, Json(customers)))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Clientes",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = AdminCustomer),
        (status = 409, description = "Já existe cliente com este e-mail nesta loja")
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID da Loja")
    )
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state
        .customer_ledger
        .create_admin_customer(
            &tenant.0,
            &payload.name,
            &payload.email,
            &payload.phone,
            payload.address,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers/stats/overview
#[utoipa::path(
    get,
    path = "/api/customers/stats/overview",
    tag = "Clientes",
    responses(
        (status = 200, description = "Visão geral de clientes da loja", body = CustomerStatsOverview)
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID da Loja")
    )
)]
pub async fn customer_stats(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let overview = app_state.stats_service.tenant_stats(&tenant.0).await?;

    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/customers/loyalty/tiers
#[utoipa::path(
    get,
    path = "/api/customers/loyalty/tiers",
    tag = "Clientes",
    responses(
        (status = 200, description = "Distribuição de fidelidade da loja", body = LoyaltyDistribution)
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID da Loja")
    )
)]
pub async fn loyalty_tiers(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let distribution = app_state
        .stats_service
        .loyalty_distribution(&tenant.0, LedgerScope::All)
        .await?;

    Ok((StatusCode::OK, Json(distribution)))
}

// POST /api/customers/reconcile
#[utoipa::path(
    post,
    path = "/api/customers/reconcile",
    tag = "Clientes",
    responses(
        (status = 200, description = "Relatório da reconciliação", body = ReconciliationReport),
        (status = 404, description = "Tenant não encontrado")
    ),
    params(
        ("x-tenant-id" = String, Header, description = "ID da Loja")
    )
)]
pub async fn reconcile(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.customer_ledger.reconcile_tenant(&tenant.0).await?;

    Ok((StatusCode::OK, Json(report)))
}
