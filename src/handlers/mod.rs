pub mod clients;
pub mod common;
pub mod dashboard;
pub mod health;
pub mod offers;

use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    clients::ClientService, dashboard::DashboardService, offers::OfferService,
    preferences::PreferenceService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub clients: Arc<ClientService>,
    pub offers: Arc<OfferService>,
    pub dashboard: Arc<DashboardService>,
    pub preferences: Arc<PreferenceService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            clients: Arc::new(ClientService::new(db_pool.clone(), event_sender.clone())),
            offers: Arc::new(OfferService::new(db_pool.clone(), event_sender.clone())),
            dashboard: Arc::new(DashboardService::new(db_pool.clone())),
            preferences: Arc::new(PreferenceService::new(db_pool, event_sender)),
        }
    }
}

/// Builds the application router over the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(dashboard::show_dashboard).post(dashboard::save_columns),
        )
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/offers/new",
            get(offers::offer_form).post(offers::create_offer),
        )
        .route("/health", get(health::health))
        .with_state(state)
}
