// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::common::error::AppError;

// O nome do nosso cabeçalho HTTP customizado
const TENANT_ID_HEADER: &str = "x-tenant-id";

// Extrator do tenant que a requisição administrativa quer acessar.
// O id é opaco (string): a validação de existência fica nos serviços,
// que falham com TenantNotFound.
#[derive(Debug, Clone)]
pub struct TenantContext(pub String);

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(TENANT_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match header_value {
            Some(value) => Ok(TenantContext(value.to_string())),
            None => Err(AppError::MissingTenantHeader),
        }
    }
}
