// src/handlers/storefront.rs
//
// Rotas públicas da vitrine: resolução de loja por slug e a visão de
// fidelidade restrita a quem tem cadastro de storefront.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    models::stats::LoyaltyDistribution,
    models::tenancy::canonical_slug,
    services::stats::LedgerScope,
};

// Só o que a vitrine pode saber da loja; nada de dados internos do tenant.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicStorefront {
    pub slug: String,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlugAvailability {
    pub slug: String,
    pub available: bool,
}

// GET /api/storefront/{slug}
#[utoipa::path(
    get,
    path = "/api/storefront/{slug}",
    tag = "Storefront",
    params(("slug" = String, Path, description = "Slug público da loja")),
    responses(
        (status = 200, description = "Dados públicos da loja", body = PublicStorefront),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn get_storefront(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.tenant_directory.resolve_by_slug(&slug).await?;

    let storefront = PublicStorefront {
        slug: tenant.slug,
        name: tenant.name,
        is_active: tenant.is_active,
    };

    Ok((StatusCode::OK, Json(storefront)))
}

// GET /api/storefront/{slug}/available
#[utoipa::path(
    get,
    path = "/api/storefront/{slug}/available",
    tag = "Storefront",
    params(("slug" = String, Path, description = "Slug desejado")),
    responses(
        (status = 200, description = "Disponibilidade do slug", body = SlugAvailability)
    )
)]
pub async fn slug_available(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let available = app_state.tenant_directory.slug_is_available(&slug).await?;

    let response = SlugAvailability {
        slug: canonical_slug(&slug),
        available,
    };

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/storefront/{slug}/loyalty/tiers
//
// Visão da vitrine: só clientes com proveniência de storefront contam
// (quem foi cadastrado apenas pela equipe não aparece aqui).
#[utoipa::path(
    get,
    path = "/api/storefront/{slug}/loyalty/tiers",
    tag = "Storefront",
    params(("slug" = String, Path, description = "Slug público da loja")),
    responses(
        (status = 200, description = "Distribuição de fidelidade da vitrine", body = LoyaltyDistribution),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn storefront_loyalty_tiers(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.tenant_directory.resolve_by_slug(&slug).await?;

    let distribution = app_state
        .stats_service
        .loyalty_distribution(&tenant.id, LedgerScope::StorefrontOnly)
        .await?;

    Ok((StatusCode::OK, Json(distribution)))
}
