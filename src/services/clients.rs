use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{error, instrument};

use crate::db::DbPool;
use crate::entities::{client, offer};
use crate::errors::{is_unique_violation, ServiceError};
use crate::events::{Event, EventSender};

/// Service for managing clients.
#[derive(Clone)]
pub struct ClientService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl ClientService {
    /// Creates a new client service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a client with a unique, non-empty name. The email is optional;
    /// a blank value is stored as NULL.
    #[instrument(skip(self))]
    pub async fn create_client(
        &self,
        name: &str,
        email: &str,
    ) -> Result<client::Model, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("client name required"));
        }

        let email = email.trim();
        let email = (!email.is_empty()).then(|| email.to_string());

        let db = &*self.db_pool;
        let existing = client::Entity::find()
            .filter(client::Column::Name.eq(name))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::validation("client already exists"));
        }

        let active = client::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email),
            ..Default::default()
        };

        let created = match active.insert(db).await {
            Ok(model) => model,
            // The unique index is the real guard; a race past the pre-check
            // lands here and reports the same message.
            Err(e) if is_unique_violation(&e) => {
                return Err(ServiceError::validation("client already exists"));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = self
            .event_sender
            .send(Event::ClientCreated {
                client_id: created.id,
                name: created.name.clone(),
            })
            .await
        {
            error!("Failed to send ClientCreated event: {}", e);
        }

        Ok(created)
    }

    /// Lists all clients ordered by name ascending.
    #[instrument(skip(self))]
    pub async fn list_clients(&self) -> Result<Vec<client::Model>, ServiceError> {
        let db = &*self.db_pool;
        let clients = client::Entity::find()
            .order_by_asc(client::Column::Name)
            .all(db)
            .await?;
        Ok(clients)
    }

    /// Gets a client by id.
    #[instrument(skip(self))]
    pub async fn get_client(&self, client_id: i32) -> Result<Option<client::Model>, ServiceError> {
        let db = &*self.db_pool;
        let found = client::Entity::find_by_id(client_id).one(db).await?;
        Ok(found)
    }

    /// Deletes a client together with its offers.
    ///
    /// The cascade is an explicit two-step delete inside one transaction:
    /// child offers first, then the client.
    #[instrument(skip(self))]
    pub async fn delete_client(&self, client_id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let found = client::Entity::find_by_id(client_id).one(&txn).await?;
        if found.is_none() {
            txn.rollback().await?;
            return Err(ServiceError::NotFound(format!(
                "client {} not found",
                client_id
            )));
        }

        let removed = offer::Entity::delete_many()
            .filter(offer::Column::ClientId.eq(client_id))
            .exec(&txn)
            .await?;
        client::Entity::delete_by_id(client_id).exec(&txn).await?;

        txn.commit().await?;

        if let Err(e) = self
            .event_sender
            .send(Event::ClientDeleted {
                client_id,
                offers_removed: removed.rows_affected,
            })
            .await
        {
            error!("Failed to send ClientDeleted event: {}", e);
        }

        Ok(())
    }

    /// Number of stored clients.
    pub async fn count_clients(&self) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        let count = client::Entity::find().count(db).await?;
        Ok(count)
    }
}
