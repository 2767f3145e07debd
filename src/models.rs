pub mod campaign;
pub mod lead;
pub mod marketing;
