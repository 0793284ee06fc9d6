// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // A loja (tenant) referida pelo id não existe
    #[error("Tenant não encontrado")]
    TenantNotFound,

    // A vitrine referida pelo slug não existe (erro visível ao público)
    #[error("Loja não encontrada")]
    StoreNotFound,

    // Já existe cliente com este e-mail para esta loja, no mesmo caminho
    // de entrada. O chamador pode tratar como "já existe", não como falha.
    #[error("Cliente já cadastrado")]
    DuplicateCustomer,

    // Resposta única para e-mail desconhecido E senha errada, de propósito:
    // não damos sinal de enumeração de contas.
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Conta de cliente não está ativa")]
    AccountNotActive,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Cabeçalho X-Tenant-ID ausente")]
    MissingTenantHeader,

    // Erros de conectividade/armazenamento. NUNCA viram "não encontrado":
    // o chamador precisa distinguir "sem dados" de "banco fora do ar".
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::TenantNotFound => (StatusCode::NOT_FOUND, "Tenant não encontrado."),
            AppError::StoreNotFound => (StatusCode::NOT_FOUND, "Loja não encontrada."),
            AppError::DuplicateCustomer => {
                (StatusCode::CONFLICT, "Já existe um cliente com este e-mail nesta loja.")
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.")
            }
            AppError::AccountNotActive => {
                (StatusCode::UNAUTHORIZED, "A conta do cliente não está ativa.")
            }
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.")
            }
            AppError::MissingTenantHeader => {
                (StatusCode::BAD_REQUEST, "O cabeçalho X-Tenant-ID é obrigatório.")
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
