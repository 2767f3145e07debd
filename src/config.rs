// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{CampaignRepository, LeadRepository},
    services::{
        auth::AuthService, campaign_service::CampaignService, lead_service::LeadService,
        marketing_service::MarketingService, notify::{LeadNotifier, SmtpConfig},
        vehicles::VehicleLookup,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub lead_service: LeadService,
    pub campaign_service: CampaignService,
    pub marketing_service: MarketingService,
    pub vehicle_lookup: VehicleLookup,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let admin_password_hash =
            env::var("ADMIN_PASSWORD_HASH").expect("ADMIN_PASSWORD_HASH deve ser definido");
        let jwt_secret = env::var("ADMIN_JWT_SECRET").expect("ADMIN_JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let lead_repo = LeadRepository::new(db_pool.clone());
        let campaign_repo = CampaignRepository::new(db_pool.clone());

        let auth_service = AuthService::new(admin_password_hash, jwt_secret);

        // SMTP é opcional: sem as variáveis, os leads só vão para o banco
        let notifier = match SmtpConfig::from_env() {
            Some(config) => {
                tracing::info!("📧 Notificação de leads por e-mail ativada");
                Some(LeadNotifier::new(config))
            }
            None => {
                tracing::warn!("📧 SMTP não configurado - leads novos não geram e-mail");
                None
            }
        };

        let lead_service = LeadService::new(lead_repo.clone(), notifier);
        let campaign_service = CampaignService::new(campaign_repo.clone());
        let marketing_service = MarketingService::new(lead_repo, campaign_repo);

        let vehicle_lookup = VehicleLookup::new()?;

        Ok(Self {
            db_pool,
            auth_service,
            lead_service,
            campaign_service,
            marketing_service,
            vehicle_lookup,
        })
    }
}
