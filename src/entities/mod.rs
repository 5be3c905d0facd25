pub mod client;
pub mod offer;
pub mod preference;

pub use offer::OfferStatus;
