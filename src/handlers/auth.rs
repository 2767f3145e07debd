// src/handlers/auth.rs

use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, middleware::auth::ADMIN_COOKIE_NAME};

// Mesma duração do token: 7 dias
const SESSION_COOKIE_DAYS: i64 = 7;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

// POST /api/admin/login
#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão criada; token assinado vai no cookie HTTP-only"),
        (status = 401, description = "Senha incorreta")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state.auth_service.login(&payload.password).await?;

    // path=/ para a sessão valer em /admin/leads, /admin/marketing etc.
    let cookie = Cookie::build((ADMIN_COOKIE_NAME, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(SESSION_COOKIE_DAYS))
        .build();

    Ok((jar.add(cookie), Json(json!({ "ok": true }))))
}

// POST /api/admin/logout
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Cookie de sessão limpo")
    )
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    // Sobrescreve com valor vazio e max-age zero, para o site inteiro
    let cookie = Cookie::build((ADMIN_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();

    (jar.add(cookie), Json(json!({ "ok": true })))
}
