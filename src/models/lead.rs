// src/models/lead.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE lead_status do banco.
// No JSON mantemos os rótulos que o painel sempre usou ("In Progress" com espaço).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    Contacted,
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Closed,
}

// --- O LEAD (registro completo, como sai do banco) ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Lead {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,

    // Contato: nome e telefone sempre presentes
    pub name: String,
    pub phone: String,
    pub address: String,

    pub vehicle: String,
    pub service: String,
    pub message: Option<String>,

    // Workflow do admin
    pub status: LeadStatus,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub contacted_at: Option<DateTime<Utc>>,
    pub booked: Option<bool>,
    pub job_value: Option<Decimal>,

    // Atribuição: pode estar TUDO ausente (tráfego orgânico)
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
    pub gclid: Option<String>,
    pub fbclid: Option<String>,
}

// --- PAYLOADS ---

// O que o formulário público envia
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria Silva")]
    pub name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "+15555550123")]
    pub phone: String,

    #[serde(default)]
    pub address: String,
    #[serde(default)]
    #[schema(example = "2019 Honda Civic")]
    pub vehicle: String,
    #[serde(default)]
    #[schema(example = "Brake pads")]
    pub service: String,
    #[serde(default)]
    pub message: String,

    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
    pub gclid: Option<String>,
    pub fbclid: Option<String>,
}

// Lead já saneado, pronto para o INSERT (strings trimadas, vazio vira None)
#[derive(Debug, Clone)]
pub struct NewLead {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub vehicle: String,
    pub service: String,
    pub message: Option<String>,

    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
    pub gclid: Option<String>,
    pub fbclid: Option<String>,
}

// Atualização parcial feita pelo painel. Campo ausente = não mexe.
// Para assigned_to/notes, string vazia limpa o campo no banco.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateLeadPayload {
    pub status: Option<LeadStatus>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub contacted_at: Option<DateTime<Utc>>,
    pub booked: Option<bool>,
    pub job_value: Option<Decimal>,
}

impl UpdateLeadPayload {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.assigned_to.is_none()
            && self.notes.is_none()
            && self.contacted_at.is_none()
            && self.booked.is_none()
            && self.job_value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_status_wire_format_keeps_legacy_labels() {
        let json = serde_json::to_string(&LeadStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");

        let parsed: LeadStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, LeadStatus::InProgress);

        let parsed: LeadStatus = serde_json::from_str("\"New\"").unwrap();
        assert_eq!(parsed, LeadStatus::New);
    }

    #[test]
    fn empty_update_payload_is_detected() {
        assert!(UpdateLeadPayload::default().is_empty());

        let update = UpdateLeadPayload {
            status: Some(LeadStatus::Contacted),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
