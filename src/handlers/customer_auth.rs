// src/handlers/customer_auth.rs
//
// Autenticação do cliente final contra a vitrine pública. O slug da loja
// vem no corpo (como no app legado); o tenant é resolvido antes de
// qualquer outra coisa.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedCustomer,
    models::customer_auth::CustomerProfile,
    services::customer_auth::SignupData,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "acme")]
    pub store_slug: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@email.com")]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "555-0101")]
    pub phone: String,

    #[validate(length(min = 8, message = "password_too_short"))]
    pub password: String,

    pub address: Option<String>,

    // Verificação de idade
    #[schema(value_type = Option<String>, format = Date, example = "1990-05-20")]
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "acme")]
    pub store_slug: String,

    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<NaiveDate>,
}

// Mesmo formato de resposta do app legado
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAuthResponse {
    pub success: bool,
    pub message: String,
    pub customer: Option<CustomerProfile>,
    pub token: Option<String>,
}

// POST /api/customer/signup
#[utoipa::path(
    post,
    path = "/api/customer/signup",
    tag = "Storefront",
    request_body = SignupPayload,
    responses(
        (status = 201, description = "Conta de cliente criada", body = CustomerAuthResponse),
        (status = 404, description = "Loja não encontrada"),
        (status = 409, description = "Já existe cliente com este e-mail nesta loja")
    )
)]
pub async fn signup(
    State(app_state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (identity, token) = app_state
        .customer_auth
        .signup(
            &payload.store_slug,
            SignupData {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
                password: payload.password,
                address: payload.address,
                date_of_birth: payload.date_of_birth,
            },
        )
        .await?;

    let response = CustomerAuthResponse {
        success: true,
        message: "Conta de cliente criada com sucesso".to_string(),
        customer: Some(identity.into()),
        token: Some(token),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

// POST /api/customer/login
#[utoipa::path(
    post,
    path = "/api/customer/login",
    tag = "Storefront",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado", body = CustomerAuthResponse),
        (status = 401, description = "Credenciais inválidas ou conta inativa"),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (identity, token) = app_state
        .customer_auth
        .login(&payload.store_slug, &payload.email, &payload.password)
        .await?;

    let response = CustomerAuthResponse {
        success: true,
        message: "Login efetuado com sucesso".to_string(),
        customer: Some(identity.into()),
        token: Some(token),
    };

    Ok((StatusCode::OK, Json(response)))
}

// POST /api/customer/logout
//
// A sessão é um JWT sem estado: o logout é só o aceite para o cliente
// descartar o token.
#[utoipa::path(
    post,
    path = "/api/customer/logout",
    tag = "Storefront",
    responses((status = 200, description = "Logout efetuado"))
)]
pub async fn logout() -> impl IntoResponse {
    Json(json!({ "success": true, "message": "Logout efetuado com sucesso" }))
}

// GET /api/customer/profile
#[utoipa::path(
    get,
    path = "/api/customer/profile",
    tag = "Storefront",
    responses(
        (status = 200, description = "Perfil do cliente autenticado", body = CustomerProfile),
        (status = 401, description = "Token inválido")
    ),
    security(("customer_jwt" = []))
)]
pub async fn get_profile(
    AuthenticatedCustomer(identity): AuthenticatedCustomer,
) -> Json<CustomerProfile> {
    Json(identity.into())
}

// PUT /api/customer/profile
#[utoipa::path(
    put,
    path = "/api/customer/profile",
    tag = "Storefront",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = CustomerProfile),
        (status = 401, description = "Token inválido")
    ),
    security(("customer_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthenticatedCustomer(identity): AuthenticatedCustomer,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let updated = app_state
        .customer_auth
        .update_profile(
            identity,
            payload.name,
            payload.phone,
            payload.address,
            payload.date_of_birth,
        )
        .await?;

    Ok((StatusCode::OK, Json(CustomerProfile::from(updated))))
}
