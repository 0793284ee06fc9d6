// src/docs.rs

use axum::Json;
use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clientes (painel da loja) ---
        handlers::customers::list_customers,
        handlers::customers::create_customer,
        handlers::customers::customer_stats,
        handlers::customers::loyalty_tiers,
        handlers::customers::reconcile,

        // --- Storefront (público) ---
        handlers::customer_auth::signup,
        handlers::customer_auth::login,
        handlers::customer_auth::logout,
        handlers::customer_auth::get_profile,
        handlers::customer_auth::update_profile,
        handlers::storefront::get_storefront,
        handlers::storefront::slug_available,
        handlers::storefront::storefront_loyalty_tiers,
    ),
    components(
        schemas(
            // --- Clientes ---
            models::customer::LoyaltyTier,
            models::customer::CustomerStatus,
            models::customer::IntakeSource,
            models::customer::Provenance,
            models::customer::AdminCustomer,
            models::customer::CustomerRecord,
            models::customer::ReconciliationReport,
            models::customer::ReconciliationConflict,
            handlers::customers::CreateCustomerPayload,

            // --- Stats ---
            models::stats::CustomerStatsOverview,
            models::stats::TierBucket,
            models::stats::LoyaltyDistribution,

            // --- Storefront ---
            models::customer_auth::CustomerProfile,
            models::tenancy::Tenant,
            handlers::customer_auth::SignupPayload,
            handlers::customer_auth::LoginPayload,
            handlers::customer_auth::UpdateProfilePayload,
            handlers::customer_auth::CustomerAuthResponse,
            handlers::storefront::PublicStorefront,
            handlers::storefront::SlugAvailability,
        )
    ),
    tags(
        (name = "Clientes", description = "Visão reconciliada de clientes da loja"),
        (name = "Storefront", description = "Vitrine pública e sessão do cliente final")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "customer_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

// GET /api/docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
