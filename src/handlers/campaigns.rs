// src/handlers/campaigns.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminSession,
    models::campaign::{Campaign, CreateCampaignPayload, UpdateCampaignPayload},
};

// GET /api/marketing-campaigns (admin)
#[utoipa::path(
    get,
    path = "/api/marketing-campaigns",
    tag = "Campanhas",
    responses(
        (status = 200, description = "Todas as campanhas, mais recente primeiro", body = Vec<Campaign>),
        (status = 401, description = "Sessão inválida")
    ),
    security(("admin_cookie" = []))
)]
pub async fn list_campaigns(
    State(app_state): State<AppState>,
    _session: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let campaigns = app_state.campaign_service.list().await?;

    Ok(Json(json!({ "ok": true, "campaigns": campaigns })))
}

// POST /api/marketing-campaigns (admin)
#[utoipa::path(
    post,
    path = "/api/marketing-campaigns",
    tag = "Campanhas",
    request_body = CreateCampaignPayload,
    responses(
        (status = 201, description = "Campanha criada", body = Campaign),
        (status = 400, description = "Nome/chave vazios ou spend negativo"),
        (status = 409, description = "utm_campaign já cadastrado")
    ),
    security(("admin_cookie" = []))
)]
pub async fn create_campaign(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Json(payload): Json<CreateCampaignPayload>,
) -> Result<impl IntoResponse, AppError> {
    let campaign = app_state.campaign_service.create(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "campaign": campaign })),
    ))
}

// PATCH /api/marketing-campaigns/{id} (admin)
#[utoipa::path(
    patch,
    path = "/api/marketing-campaigns/{id}",
    tag = "Campanhas",
    request_body = UpdateCampaignPayload,
    params(
        ("id" = Uuid, Path, description = "ID da campanha")
    ),
    responses(
        (status = 200, description = "Campanha atualizada", body = Campaign),
        (status = 404, description = "Campanha não existe"),
        (status = 409, description = "utm_campaign já cadastrado")
    ),
    security(("admin_cookie" = []))
)]
pub async fn update_campaign(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCampaignPayload>,
) -> Result<impl IntoResponse, AppError> {
    let campaign = app_state.campaign_service.update(id, payload).await?;

    Ok(Json(json!({ "ok": true, "campaign": campaign })))
}

// DELETE /api/marketing-campaigns/{id} (admin)
#[utoipa::path(
    delete,
    path = "/api/marketing-campaigns/{id}",
    tag = "Campanhas",
    params(
        ("id" = Uuid, Path, description = "ID da campanha")
    ),
    responses(
        (status = 200, description = "Campanha removida"),
        (status = 404, description = "Campanha não existe")
    ),
    security(("admin_cookie" = []))
)]
pub async fn delete_campaign(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.campaign_service.delete(id).await?;

    Ok(Json(json!({ "ok": true })))
}
