// src/handlers/leads.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminSession,
    models::lead::{CreateLeadPayload, Lead, UpdateLeadPayload},
};

// POST /api/leads (público - é o formulário do site)
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead gravado", body = Lead),
        (status = 400, description = "Faltou nome ou telefone")
    )
)]
pub async fn submit_lead(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = app_state.lead_service.submit(payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "ok": true, "lead": lead }))))
}

// GET /api/leads (admin)
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Todos os leads, mais recente primeiro", body = Vec<Lead>),
        (status = 401, description = "Sessão inválida")
    ),
    security(("admin_cookie" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    _session: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_service.list().await?;

    Ok(Json(json!({ "ok": true, "leads": leads })))
}

// PATCH /api/leads/{id} (admin)
#[utoipa::path(
    patch,
    path = "/api/leads/{id}",
    tag = "Leads",
    request_body = UpdateLeadPayload,
    params(
        ("id" = Uuid, Path, description = "ID do lead")
    ),
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 400, description = "PATCH sem nenhum campo"),
        (status = 404, description = "Lead não existe")
    ),
    security(("admin_cookie" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.update(id, payload).await?;

    Ok(Json(json!({ "ok": true, "lead": lead })))
}
