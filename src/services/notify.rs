// src/services/notify.rs
//
// Notificação de lead novo por e-mail (SMTP). Melhor esforço: quem chama
// decide o que fazer com o erro - a submissão do lead nunca depende disso.

use thiserror::Error;

use crate::models::lead::Lead;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "noreply@pitstop.local";

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub to_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl SmtpConfig {
    // Sem SMTP_HOST ou LEAD_NOTIFY_TO a notificação fica desabilitada
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        let to_address = std::env::var("LEAD_NOTIFY_TO").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            to_address,
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

#[derive(Clone)]
pub struct LeadNotifier {
    config: SmtpConfig,
}

// Corpo em texto puro, com o que o mecânico precisa para ligar de volta
fn build_lead_email_body(lead: &Lead) -> String {
    let mut body = format!(
        "New lead from the website:\n\nName: {}\nPhone: {}\nAddress: {}\nVehicle: {}\nService: {}\n",
        lead.name, lead.phone, lead.address, lead.vehicle, lead.service,
    );

    if let Some(message) = &lead.message {
        body.push_str(&format!("Message: {}\n", message));
    }
    if let Some(campaign) = &lead.utm_campaign {
        body.push_str(&format!("\nCampaign: {}", campaign));
    }
    if let Some(source) = &lead.utm_source {
        body.push_str(&format!("\nSource: {}", source));
    }

    body
}

impl LeadNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    pub async fn notify_new_lead(&self, lead: &Lead) -> Result<(), NotifyError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let subject = format!("[PitStop] New lead: {}", lead.name);
        let body = build_lead_email_body(lead);

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(self.config.to_address.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!("📧 Notificação de lead enviada: {}", lead.id);
        Ok(())
    }
}
