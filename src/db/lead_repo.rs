// src/db/lead_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        lead::{Lead, NewLead, UpdateLeadPayload},
        marketing::LeadTouch,
    },
};

// O repositório de leads, responsável por todas as interações com a tabela 'leads'.
// Leads nunca são apagados: não existe delete aqui de propósito.
#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Grava um lead recém-capturado pelo formulário público
    pub async fn insert(&self, new: &NewLead) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (
                name, phone, address, vehicle, service, message,
                utm_source, utm_medium, utm_campaign, utm_content, utm_term,
                gclid, fbclid
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(&new.vehicle)
        .bind(&new.service)
        .bind(&new.message)
        .bind(&new.utm_source)
        .bind(&new.utm_medium)
        .bind(&new.utm_campaign)
        .bind(&new.utm_content)
        .bind(&new.utm_term)
        .bind(&new.gclid)
        .bind(&new.fbclid)
        .fetch_one(&self.pool)
        .await?;

        Ok(lead)
    }

    // Lista completa para o painel, mais recente primeiro
    pub async fn list_all(&self) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

    // Atualização parcial vinda do painel.
    // COALESCE mantém o valor atual quando o campo não veio no PATCH;
    // para assigned_to/notes, string vazia limpa a coluna.
    pub async fn update(
        &self,
        id: Uuid,
        update: &UpdateLeadPayload,
    ) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads SET
                status = COALESCE($2, status),
                assigned_to = CASE
                    WHEN $3::text IS NULL THEN assigned_to
                    WHEN $3 = '' THEN NULL
                    ELSE $3
                END,
                notes = CASE
                    WHEN $4::text IS NULL THEN notes
                    WHEN $4 = '' THEN NULL
                    ELSE $4
                END,
                contacted_at = COALESCE($5, contacted_at),
                booked = COALESCE($6, booked),
                job_value = COALESCE($7, job_value)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.status)
        .bind(&update.assigned_to)
        .bind(&update.notes)
        .bind(update.contacted_at)
        .bind(update.booked)
        .bind(update.job_value)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::LeadNotFound)?;

        Ok(lead)
    }

    // Recorte para o /api/lead-stats, com filtro server-side de
    // data (inclusivo) e de utm_medium - as colunas indexadas.
    pub async fn list_touches(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        medium: Option<&str>,
    ) -> Result<Vec<LeadTouch>, AppError> {
        let touches = sqlx::query_as::<_, LeadTouch>(
            r#"
            SELECT created_at, utm_campaign, utm_source, utm_medium
            FROM leads
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::timestamptz IS NULL OR created_at <= $2)
              AND ($3::text IS NULL OR utm_medium = $3)
            ORDER BY created_at ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(medium)
        .fetch_all(&self.pool)
        .await?;

        Ok(touches)
    }

    // Snapshot completo para o dashboard de marketing (a janela de datas
    // é aplicada em memória pelo agregador, a cada mudança de filtro)
    pub async fn list_all_touches(&self) -> Result<Vec<LeadTouch>, AppError> {
        let touches = sqlx::query_as::<_, LeadTouch>(
            r#"
            SELECT created_at, utm_campaign, utm_source, utm_medium
            FROM leads
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(touches)
    }
}
