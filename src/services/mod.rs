pub mod clients;
pub mod dashboard;
pub mod offers;
pub mod preferences;
