// src/services/lead_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeadRepository,
    models::lead::{CreateLeadPayload, Lead, NewLead, UpdateLeadPayload},
    services::notify::LeadNotifier,
};

// Saneamento igual ao do formulário: trim em tudo,
// e nos campos opcionais vazio vira None.
fn clean_string(v: &str) -> String {
    v.trim().to_string()
}

fn clean_nullable(v: Option<&str>) -> Option<String> {
    let s = v.map(str::trim).unwrap_or("");
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
    // None = notificação desabilitada (sem SMTP configurado)
    notifier: Option<LeadNotifier>,
}

impl LeadService {
    pub fn new(repo: LeadRepository, notifier: Option<LeadNotifier>) -> Self {
        Self { repo, notifier }
    }

    // Submissão do formulário público.
    // A persistência manda: o lead é gravado e confirmado ANTES de qualquer
    // notificação. O e-mail roda em background e falha vira log, nunca um
    // erro de submissão para o cliente.
    pub async fn submit(&self, payload: CreateLeadPayload) -> Result<Lead, AppError> {
        let new = Self::sanitize(payload);

        if new.name.is_empty() || new.phone.is_empty() {
            return Err(AppError::MissingRequiredFields);
        }

        let lead = self.repo.insert(&new).await?;
        tracing::info!("📥 Novo lead capturado: {} ({})", lead.name, lead.id);

        if let Some(notifier) = self.notifier.clone() {
            let snapshot = lead.clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.notify_new_lead(&snapshot).await {
                    tracing::warn!("Falha ao notificar novo lead {}: {}", snapshot.id, e);
                }
            });
        }

        Ok(lead)
    }

    pub async fn list(&self) -> Result<Vec<Lead>, AppError> {
        self.repo.list_all().await
    }

    // Atualização parcial do painel. PATCH vazio é rejeitado na hora.
    // Edições concorrentes são last-write-wins, sem checagem de versão.
    pub async fn update(&self, id: Uuid, payload: UpdateLeadPayload) -> Result<Lead, AppError> {
        if payload.is_empty() {
            return Err(AppError::EmptyUpdate);
        }

        self.repo.update(id, &payload).await
    }

    fn sanitize(payload: CreateLeadPayload) -> NewLead {
        NewLead {
            name: clean_string(&payload.name),
            phone: clean_string(&payload.phone),
            address: clean_string(&payload.address),
            vehicle: clean_string(&payload.vehicle),
            service: clean_string(&payload.service),
            message: clean_nullable(Some(&payload.message)),

            utm_source: clean_nullable(payload.utm_source.as_deref()),
            utm_medium: clean_nullable(payload.utm_medium.as_deref()),
            utm_campaign: clean_nullable(payload.utm_campaign.as_deref()),
            utm_content: clean_nullable(payload.utm_content.as_deref()),
            utm_term: clean_nullable(payload.utm_term.as_deref()),
            gclid: clean_nullable(payload.gclid.as_deref()),
            fbclid: clean_nullable(payload.fbclid.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateLeadPayload {
        CreateLeadPayload {
            name: "  Maria Silva  ".to_string(),
            phone: " +15555550123 ".to_string(),
            address: "123 Main St".to_string(),
            vehicle: "2019 Honda Civic".to_string(),
            service: "Brakes".to_string(),
            message: "   ".to_string(),
            utm_source: Some("  facebook ".to_string()),
            utm_medium: Some("".to_string()),
            utm_campaign: Some("brakes-jan".to_string()),
            utm_content: None,
            utm_term: Some("   ".to_string()),
            gclid: None,
            fbclid: None,
        }
    }

    #[test]
    fn sanitize_trims_and_turns_blank_optionals_into_none() {
        let new = LeadService::sanitize(payload());

        assert_eq!(new.name, "Maria Silva");
        assert_eq!(new.phone, "+15555550123");
        // Mensagem só de espaços não vira string vazia no banco
        assert_eq!(new.message, None);

        assert_eq!(new.utm_source.as_deref(), Some("facebook"));
        assert_eq!(new.utm_medium, None);
        assert_eq!(new.utm_term, None);
        assert_eq!(new.utm_campaign.as_deref(), Some("brakes-jan"));
    }

    #[test]
    fn whitespace_only_required_fields_fail_after_sanitizing() {
        let mut p = payload();
        p.phone = "   ".to_string();

        let new = LeadService::sanitize(p);
        assert!(new.phone.is_empty());
    }
}
