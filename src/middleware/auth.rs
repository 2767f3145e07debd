// src/middleware/auth.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::{common::error::AppError, config::AppState};

// O cookie HTTP-only que carrega o token da sessão do admin
pub const ADMIN_COOKIE_NAME: &str = "pitstop_admin";

// Extrator que faz a guarda de admin: lê o cookie, valida assinatura e
// expiração do token. Qualquer handler que recebe um AdminSession só roda
// com sessão válida - ausência/invalidade viram o mesmo 401 uniforme
// (com o redirect para a tela de login no corpo).
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub role: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InvalidSession)?;

        let token = jar
            .get(ADMIN_COOKIE_NAME)
            .map(|cookie| cookie.value().to_owned())
            .ok_or(AppError::InvalidSession)?;

        let claims = state.auth_service.validate_token(&token)?;

        Ok(AdminSession { role: claims.role })
    }
}
