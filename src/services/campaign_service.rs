// src/services/campaign_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::CampaignRepository,
    models::campaign::{Campaign, CreateCampaignPayload, UpdateCampaignPayload},
};

#[derive(Clone)]
pub struct CampaignService {
    repo: CampaignRepository,
}

impl CampaignService {
    pub fn new(repo: CampaignRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, mut payload: CreateCampaignPayload) -> Result<Campaign, AppError> {
        payload.name = payload.name.trim().to_string();
        payload.utm_campaign = payload.utm_campaign.trim().to_string();

        // Revalida depois do trim: nome só de espaços não passa
        payload.validate()?;

        if payload.spend < Decimal::ZERO {
            return Err(AppError::InvalidSpend);
        }

        self.repo.insert(&payload).await
    }

    pub async fn list(&self) -> Result<Vec<Campaign>, AppError> {
        self.repo.list_all().await
    }

    pub async fn update(
        &self,
        id: Uuid,
        mut payload: UpdateCampaignPayload,
    ) -> Result<Campaign, AppError> {
        payload.name = payload.name.trim().to_string();
        payload.utm_campaign = payload.utm_campaign.trim().to_string();

        payload.validate()?;

        if payload.spend < Decimal::ZERO {
            return Err(AppError::InvalidSpend);
        }

        self.repo.update(id, &payload).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(id).await
    }
}
