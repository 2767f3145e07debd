pub mod auth;
pub mod campaigns;
pub mod leads;
pub mod marketing;
pub mod vehicles;
