// src/models/marketing.rs

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::campaign::{Campaign, CampaignStatus, Platform};

// --- ENTRADA DO AGREGADOR ---

// Recorte mínimo de um lead para fins de atribuição.
// É o que o /api/lead-stats carrega do banco (e nada mais).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LeadTouch {
    pub created_at: DateTime<Utc>,
    pub utm_campaign: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
}

// Janela de datas inclusiva. Datas de calendário viram
// início-do-dia .. fim-do-dia em UTC, igual ao filtro do painel.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let start = start.map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let end = end.map(|d| {
            // 23:59:59.999999 - o último instante do dia
            let eod = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
                .unwrap_or(NaiveTime::MIN);
            d.and_time(eod).and_utc()
        });
        Self { start, end }
    }

    // "Últimos N dias" relativo ao agora, como os botões 7/30/90 do painel
    pub fn last_days(days: Option<i64>) -> Self {
        Self {
            start: days.map(|d| Utc::now() - chrono::Duration::days(d)),
            end: None,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if instant < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if instant > end {
                return false;
            }
        }
        true
    }
}

// --- SAÍDA DO AGREGADOR ---

// Contagens por chave normalizada. Leads sem chave ficam fora dos mapas,
// mas contam no total. Wire format idêntico ao /api/lead-stats original.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadAggregation {
    pub by_campaign: HashMap<String, u64>,
    pub by_source: HashMap<String, u64>,
    pub total: u64,

    // Fontes por campanha - alimenta a coluna "top sources" do dashboard.
    // Lead com campanha mas sem fonte cai no balde "—", então a soma das
    // fontes bate com o total de leads da campanha. Fica fora do wire
    // do /api/lead-stats.
    #[serde(skip)]
    pub sources_by_campaign: HashMap<String, HashMap<String, u64>>,
}

// --- LINHAS COMPOSTAS DO DASHBOARD ---

// Uma fonte e quantos leads ela trouxe ("facebook (3)" no painel)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SourceCount {
    pub source: String,
    pub leads: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CampaignMetricsRow {
    #[serde(flatten)]
    pub campaign: Campaign,

    // Leads atribuídos à campanha na janela ativa
    pub leads: u64,

    // spend / leads. None quando leads == 0 (o painel mostra "—").
    pub cpl: Option<Decimal>,

    // Fração dos leads exibidos que esta campanha gerou (0.0 quando nada é exibido)
    pub lead_share: f64,

    // As duas fontes mais fortes da campanha, em ordem decrescente
    pub top_sources: Vec<SourceCount>,
}

// Critério de ordenação, escolhido pelo chamador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    LeadsDesc,
    CplAsc,
    SpendDesc,
    Newest,
}

impl SortKey {
    pub fn parse_param(raw: &str) -> Result<Self, ()> {
        match raw.trim() {
            "" | "leads_desc" => Ok(SortKey::LeadsDesc),
            "cpl_asc" => Ok(SortKey::CplAsc),
            "spend_desc" => Ok(SortKey::SpendDesc),
            "newest" => Ok(SortKey::Newest),
            _ => Err(()),
        }
    }
}

// Filtros do redutor: tudo opcional, combinados por E lógico
#[derive(Debug, Clone, Default)]
pub struct DashboardFilter {
    pub platform: Option<Platform>,
    pub status: Option<CampaignStatus>,
    // Busca por substring, case-insensitive. Vazio = sem restrição.
    pub search: String,
}

// Parâmetros completos de uma recomputação do dashboard
#[derive(Debug, Clone, Default)]
pub struct DashboardQuery {
    pub window: DateWindow,
    pub filter: DashboardFilter,
    pub sort: SortKey,
}

// --- TOTAIS (os cards do topo do painel) ---

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardTotals {
    pub total_spend: Decimal,
    pub total_leads: u64,
    pub blended_cpl: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarketingDashboard {
    pub rows: Vec<CampaignMetricsRow>,
    pub totals: DashboardTotals,
}
