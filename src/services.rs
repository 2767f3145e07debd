pub mod auth;
pub mod campaign_service;
pub mod lead_service;
pub mod marketing_service;
pub mod notify;
pub mod vehicles;
