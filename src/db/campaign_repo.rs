// src/db/campaign_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::campaign::{Campaign, CreateCampaignPayload, UpdateCampaignPayload},
};

#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: &CreateCampaignPayload) -> Result<Campaign, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO marketing_campaigns
                (name, utm_campaign, platform, spend, start_date, end_date, status, notes)
            VALUES
                ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE), $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.utm_campaign)
        .bind(new.platform)
        .bind(new.spend)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.status)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Violação da UNIQUE de utm_campaign vira um erro claro de conflito
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "utm_campaign already exists".to_string(),
                    );
                }
            }
            e.into()
        })?;

        Ok(campaign)
    }

    pub async fn list_all(&self) -> Result<Vec<Campaign>, AppError> {
        let campaigns = sqlx::query_as::<_, Campaign>(
            "SELECT * FROM marketing_campaigns ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(campaigns)
    }

    // Edição completa (o modal do painel sempre manda todos os campos)
    pub async fn update(
        &self,
        id: Uuid,
        update: &UpdateCampaignPayload,
    ) -> Result<Campaign, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE marketing_campaigns SET
                name = $2,
                utm_campaign = $3,
                platform = $4,
                spend = $5,
                start_date = $6,
                end_date = $7,
                status = $8,
                notes = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.utm_campaign)
        .bind(update.platform)
        .bind(update.spend)
        .bind(update.start_date)
        .bind(update.end_date)
        .bind(update.status)
        .bind(&update.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "utm_campaign already exists".to_string(),
                    );
                }
            }
            e.into()
        })?
        .ok_or(AppError::CampaignNotFound)?;

        Ok(campaign)
    }

    // Apagar contra um id inexistente é um 404, não um no-op silencioso
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM marketing_campaigns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::CampaignNotFound);
        }

        Ok(())
    }
}
