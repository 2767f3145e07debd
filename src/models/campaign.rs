// src/models/campaign.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE campaign_platform do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "campaign_platform", rename_all = "UPPERCASE")]
pub enum Platform {
    Facebook,
    Google,
    TikTok,
    Nextdoor,
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Google => "Google",
            Platform::TikTok => "TikTok",
            Platform::Nextdoor => "Nextdoor",
            Platform::Other => "Other",
        }
    }

    // Parse dos filtros da query string. "All" e vazio significam "sem filtro".
    pub fn parse_param(raw: &str) -> Result<Option<Self>, ()> {
        match raw.trim() {
            "" | "All" => Ok(None),
            "Facebook" => Ok(Some(Platform::Facebook)),
            "Google" => Ok(Some(Platform::Google)),
            "TikTok" => Ok(Some(Platform::TikTok)),
            "Nextdoor" => Ok(Some(Platform::Nextdoor)),
            "Other" => Ok(Some(Platform::Other)),
            _ => Err(()),
        }
    }
}

// Mapeia o CREATE TYPE campaign_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    Ended,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Ended => "ended",
        }
    }

    pub fn parse_param(raw: &str) -> Result<Option<Self>, ()> {
        match raw.trim() {
            "" | "All" => Ok(None),
            "active" => Ok(Some(CampaignStatus::Active)),
            "paused" => Ok(Some(CampaignStatus::Paused)),
            "ended" => Ok(Some(CampaignStatus::Ended)),
            _ => Err(()),
        }
    }
}

// --- A CAMPANHA ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Campaign {
    pub id: Uuid,

    pub name: String,
    // Chave de atribuição: casa com o utm_campaign dos leads. Única no banco.
    pub utm_campaign: String,

    pub platform: Platform,
    pub spend: Decimal,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    pub status: CampaignStatus,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- PAYLOADS ---

fn default_platform() -> Platform {
    Platform::Other
}

fn default_campaign_status() -> CampaignStatus {
    CampaignStatus::Active
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCampaignPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Brakes January")]
    pub name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "brakes-jan")]
    pub utm_campaign: String,

    #[serde(default = "default_platform")]
    pub platform: Platform,

    #[serde(default)]
    pub spend: Decimal,

    // Sem data? O banco usa CURRENT_DATE.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[serde(default = "default_campaign_status")]
    pub status: CampaignStatus,

    pub notes: Option<String>,
}

// O PATCH de campanha é uma edição completa (o modal do painel manda tudo)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCampaignPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    #[validate(length(min = 1, message = "required"))]
    pub utm_campaign: String,

    pub platform: Platform,
    pub spend: Decimal,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    pub status: CampaignStatus,
    pub notes: Option<String>,
}
