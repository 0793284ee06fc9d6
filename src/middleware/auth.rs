// src/middleware/auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError, config::AppState, models::customer_auth::CustomerIdentity,
};

// Guarda das rotas de sessão do cliente do storefront (perfil etc.).
// Valida o Bearer token e injeta a identidade nos extensions.
pub async fn customer_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let identity = app_state.customer_auth.validate_token(token).await?;

            request.extensions_mut().insert(identity);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extrator para obter o cliente autenticado diretamente nos handlers
pub struct AuthenticatedCustomer(pub CustomerIdentity);

impl<S> FromRequestParts<S> for AuthenticatedCustomer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CustomerIdentity>()
            .cloned()
            .map(AuthenticatedCustomer)
            .ok_or(AppError::InvalidToken)
    }
}
