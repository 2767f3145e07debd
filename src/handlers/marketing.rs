// src/handlers/marketing.rs

use axum::{extract::{Query, State}, response::IntoResponse, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminSession,
    models::campaign::{CampaignStatus, Platform},
    models::marketing::{
        DashboardFilter, DashboardQuery, DateWindow, LeadAggregation, MarketingDashboard, SortKey,
    },
};

// Datas chegam como YYYY-MM-DD. Qualquer outra coisa vale como
// "sem filtro" - o painel antigo sempre foi leniente aqui.
fn parse_ymd(raw: Option<&str>) -> Option<NaiveDate> {
    let trimmed = raw.map(str::trim).unwrap_or("");
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LeadStatsParams {
    // Início da janela (YYYY-MM-DD), inclusivo
    pub start: Option<String>,
    // Fim da janela (YYYY-MM-DD), inclusivo
    pub end: Option<String>,
    // Filtro exato por utm_medium (ex.: "cpc")
    pub medium: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadStatsResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub stats: LeadAggregation,
}

// GET /api/lead-stats (admin)
#[utoipa::path(
    get,
    path = "/api/lead-stats",
    tag = "Marketing",
    params(LeadStatsParams),
    responses(
        (status = 200, description = "Contagens por campanha e por source", body = LeadStatsResponse),
        (status = 401, description = "Sessão inválida")
    ),
    security(("admin_cookie" = []))
)]
pub async fn lead_stats(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<LeadStatsParams>,
) -> Result<impl IntoResponse, AppError> {
    let start = parse_ymd(params.start.as_deref());
    let end = parse_ymd(params.end.as_deref());

    let stats = app_state
        .marketing_service
        .lead_stats(start, end, params.medium.as_deref())
        .await?;

    Ok(Json(LeadStatsResponse { ok: true, stats }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardParams {
    // "7", "30", "90" ou "all". Padrão: "30".
    pub range: Option<String>,
    // "All", "Facebook", "Google", "TikTok", "Nextdoor", "Other"
    pub platform: Option<String>,
    // "All", "active", "paused", "ended"
    pub status: Option<String>,
    // Busca por substring em nome/chave, case-insensitive
    pub q: Option<String>,
    // "leads_desc" (padrão), "cpl_asc", "spend_desc", "newest"
    pub sort: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub dashboard: MarketingDashboard,
}

fn parse_range(raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim).unwrap_or("") {
        "" => Ok(Some(30)),
        "all" => Ok(None),
        other => other
            .parse::<i64>()
            .ok()
            .filter(|days| *days > 0)
            .map(Some)
            .ok_or_else(|| AppError::InvalidQueryParam("range".into())),
    }
}

// GET /api/marketing/dashboard (admin)
#[utoipa::path(
    get,
    path = "/api/marketing/dashboard",
    tag = "Marketing",
    params(DashboardParams),
    responses(
        (status = 200, description = "Linhas compostas (leads, CPL, share) e os totais", body = DashboardResponse),
        (status = 400, description = "Parâmetro de filtro inválido"),
        (status = 401, description = "Sessão inválida")
    ),
    security(("admin_cookie" = []))
)]
pub async fn dashboard(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Query(params): Query<DashboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let days = parse_range(params.range.as_deref())?;

    let platform = Platform::parse_param(params.platform.as_deref().unwrap_or(""))
        .map_err(|_| AppError::InvalidQueryParam("platform".into()))?;
    let status = CampaignStatus::parse_param(params.status.as_deref().unwrap_or(""))
        .map_err(|_| AppError::InvalidQueryParam("status".into()))?;
    let sort = SortKey::parse_param(params.sort.as_deref().unwrap_or(""))
        .map_err(|_| AppError::InvalidQueryParam("sort".into()))?;

    let query = DashboardQuery {
        window: DateWindow::last_days(days),
        filter: DashboardFilter {
            platform,
            status,
            search: params.q.unwrap_or_default(),
        },
        sort,
    };

    let dashboard = app_state.marketing_service.dashboard(&query).await?;

    Ok(Json(DashboardResponse {
        ok: true,
        dashboard,
    }))
}
