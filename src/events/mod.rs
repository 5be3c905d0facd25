use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Domain events emitted after successful state changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ClientCreated {
        client_id: i32,
        name: String,
    },
    ClientDeleted {
        client_id: i32,
        offers_removed: u64,
    },
    OfferCreated {
        offer_id: i32,
        offer_number: String,
        client_id: i32,
    },
    DashboardPreferencesUpdated {
        session_id: String,
        columns: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously. Event delivery is best-effort: callers
    /// log failures and never fail the originating request over one.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes and logs domain events until the channel closes.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::ClientCreated { client_id, name } => {
                info!(client_id, name = %name, "client created");
            }
            Event::ClientDeleted {
                client_id,
                offers_removed,
            } => {
                info!(client_id, offers_removed, "client deleted with its offers");
            }
            Event::OfferCreated {
                offer_id,
                offer_number,
                client_id,
            } => {
                info!(offer_id, offer_number = %offer_number, client_id, "offer created");
            }
            Event::DashboardPreferencesUpdated { session_id, .. } => {
                info!(session_id = %session_id, "dashboard preferences updated");
            }
        }
    }
    error!("Event channel closed, stopping event processing");
}
