// src/docs.rs

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::middleware::auth::ADMIN_COOKIE_NAME;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,

        // --- Leads ---
        handlers::leads::submit_lead,
        handlers::leads::list_leads,
        handlers::leads::update_lead,

        // --- Campanhas ---
        handlers::campaigns::list_campaigns,
        handlers::campaigns::create_campaign,
        handlers::campaigns::update_campaign,
        handlers::campaigns::delete_campaign,

        // --- Marketing ---
        handlers::marketing::lead_stats,
        handlers::marketing::dashboard,

        // --- Veículos ---
        handlers::vehicles::list_makes,
        handlers::vehicles::list_models,
    ),
    components(
        schemas(
            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,

            // --- Campanhas ---
            models::campaign::Platform,
            models::campaign::CampaignStatus,
            models::campaign::Campaign,
            models::campaign::CreateCampaignPayload,
            models::campaign::UpdateCampaignPayload,

            // --- Marketing ---
            models::marketing::LeadAggregation,
            models::marketing::SourceCount,
            models::marketing::CampaignMetricsRow,
            models::marketing::SortKey,
            models::marketing::DashboardTotals,
            models::marketing::MarketingDashboard,

            // --- Payloads / respostas dos handlers ---
            handlers::auth::LoginPayload,
            handlers::marketing::LeadStatsResponse,
            handlers::marketing::DashboardResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Sessão do painel admin"),
        (name = "Leads", description = "Formulário público e gestão dos leads"),
        (name = "Campanhas", description = "CRUD de campanhas de marketing"),
        (name = "Marketing", description = "Atribuição e o dashboard de CPL"),
        (name = "Veículos", description = "Proxy do catálogo vPIC (NHTSA)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "admin_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(ADMIN_COOKIE_NAME))),
        );
    }
}
