use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Todas as classes de falha do sistema passam por aqui: validação,
// sessão, não-encontrado, chave duplicada e erros de infraestrutura.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Missing required fields (name, phone)")]
    MissingRequiredFields,

    #[error("No valid fields to update")]
    EmptyUpdate,

    #[error("Spend must be a number (0 or more).")]
    InvalidSpend,

    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    #[error("Login failed")]
    InvalidCredentials,

    #[error("Invalid session")]
    InvalidSession,

    #[error("Lead not found")]
    LeadNotFound,

    #[error("Campaign not found")]
    CampaignNotFound,

    #[error("{0}")]
    UniqueConstraintViolation(String),

    // A API de terceiros (vPIC) caiu ou respondeu lixo
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    // Variante para erros de banco de dados
    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
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
                    "ok": false,
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Sessão ausente/inválida: resposta uniforme independente da ação,
            // sempre apontando para a tela de login (o shell do admin redireciona).
            AppError::InvalidSession => {
                let body = Json(json!({
                    "ok": false,
                    "error": "Invalid session",
                    "redirect": "/admin/login",
                }));
                return (StatusCode::UNAUTHORIZED, body).into_response();
            }

            AppError::MissingRequiredFields => (
                StatusCode::BAD_REQUEST,
                "Missing required fields (name, phone)".to_string(),
            ),
            AppError::EmptyUpdate => {
                (StatusCode::BAD_REQUEST, "No valid fields to update".to_string())
            }
            AppError::InvalidSpend => (
                StatusCode::BAD_REQUEST,
                "Spend must be a number (0 or more).".to_string(),
            ),
            AppError::InvalidQueryParam(param) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid query parameter: {}", param),
            ),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Login failed".to_string()),
            AppError::LeadNotFound => (StatusCode::NOT_FOUND, "Lead not found".to_string()),
            AppError::CampaignNotFound => {
                (StatusCode::NOT_FOUND, "Campaign not found".to_string())
            }
            AppError::UniqueConstraintViolation(msg) => (StatusCode::CONFLICT, msg),
            AppError::UpstreamError(msg) => (StatusCode::BAD_GATEWAY, msg),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            ref e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "ok": false, "error": error_message }));
        (status, body).into_response()
    }
}
