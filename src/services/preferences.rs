use std::sync::Arc;

use sea_orm::sea_query::OnConflict;
use sea_orm::{EntityTrait, Set};
use tracing::{error, instrument, warn};

use crate::db::DbPool;
use crate::entities::preference;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Column set shown when a session has no stored preference.
pub const DEFAULT_DASHBOARD_COLUMNS: [&str; 8] = [
    "offer_number",
    "client",
    "price",
    "cost",
    "margin",
    "created_at",
    "valid_until",
    "status",
];

/// Key-value store for per-session dashboard column selections.
///
/// Display metadata only: the stored value never feeds filtering or
/// aggregation.
#[derive(Clone)]
pub struct PreferenceService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl PreferenceService {
    /// Creates a new preference service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Returns the stored column selection for the session, or the supplied
    /// default when none exists.
    #[instrument(skip(self, default))]
    pub async fn get(
        &self,
        session_id: &str,
        default: &[&str],
    ) -> Result<Vec<String>, ServiceError> {
        let db = &*self.db_pool;
        let stored = preference::Entity::find_by_id(session_id).one(db).await?;

        match stored {
            Some(row) => match serde_json::from_str::<Vec<String>>(&row.columns) {
                Ok(columns) => Ok(columns),
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "stored column preference unreadable, using default");
                    Ok(default.iter().map(|c| c.to_string()).collect())
                }
            },
            None => Ok(default.iter().map(|c| c.to_string()).collect()),
        }
    }

    /// Stores the column selection for the session, replacing any previous
    /// value.
    #[instrument(skip(self, columns))]
    pub async fn set(&self, session_id: &str, columns: &[String]) -> Result<(), ServiceError> {
        let encoded = serde_json::to_string(columns)
            .map_err(|e| ServiceError::InternalError(format!("encoding columns failed: {}", e)))?;

        let active = preference::ActiveModel {
            session_id: Set(session_id.to_string()),
            columns: Set(encoded),
            updated_at: Set(chrono::Utc::now().into()),
        };

        let db = &*self.db_pool;
        preference::Entity::insert(active)
            .on_conflict(
                OnConflict::column(preference::Column::SessionId)
                    .update_columns([preference::Column::Columns, preference::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(db)
            .await?;

        if let Err(e) = self
            .event_sender
            .send(Event::DashboardPreferencesUpdated {
                session_id: session_id.to_string(),
                columns: columns.to_vec(),
            })
            .await
        {
            error!("Failed to send DashboardPreferencesUpdated event: {}", e);
        }

        Ok(())
    }
}
