// src/handlers/vehicles.rs

use axum::{extract::{Query, State}, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::{common::error::AppError, config::AppState};

// GET /api/vehicles/makes (público - alimenta o select do formulário)
#[utoipa::path(
    get,
    path = "/api/vehicles/makes",
    tag = "Veículos",
    responses(
        (status = 200, description = "Marcas de carro, em ordem alfabética"),
        (status = 502, description = "vPIC fora do ar")
    )
)]
pub async fn list_makes(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let makes = app_state.vehicle_lookup.makes().await?;

    Ok(Json(json!({ "ok": true, "makes": makes })))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ModelsParams {
    pub year: Option<String>,
    pub make: Option<String>,
}

// GET /api/vehicles/models?year=2020&make=Honda (público)
#[utoipa::path(
    get,
    path = "/api/vehicles/models",
    tag = "Veículos",
    params(ModelsParams),
    responses(
        (status = 200, description = "Modelos da marca no ano"),
        (status = 400, description = "Faltou year ou make"),
        (status = 502, description = "vPIC fora do ar")
    )
)]
pub async fn list_models(
    State(app_state): State<AppState>,
    Query(params): Query<ModelsParams>,
) -> Result<impl IntoResponse, AppError> {
    let year = params.year.as_deref().map(str::trim).unwrap_or("");
    let make = params.make.as_deref().map(str::trim).unwrap_or("");

    if year.is_empty() || make.is_empty() {
        return Err(AppError::InvalidQueryParam("year or make".into()));
    }

    let models = app_state.vehicle_lookup.models(year, make).await?;

    Ok(Json(json!({
        "ok": true,
        "year": year,
        "make": make,
        "models": models
    })))
}
