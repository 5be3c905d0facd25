use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::db::DbPool;
use crate::entities::{client, offer, OfferStatus};
use crate::errors::{is_unique_violation, ServiceError};
use crate::events::{Event, EventSender};

/// Raw form input for the offer-creation workflow. Fields arrive as submitted
/// strings; a blank value is equivalent to an absent one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOfferRequest {
    #[serde(default)]
    pub offer_number: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub valid_until: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub new_client_name: String,
    #[serde(default)]
    pub new_client_email: String,
}

/// Service running the offer-creation workflow.
#[derive(Clone)]
pub struct OfferService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl OfferService {
    /// Creates a new offer service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Validates the raw submission and persists an offer, optionally
    /// creating a client inline.
    ///
    /// Rules are evaluated independently and every failure is collected; the
    /// result is either a persisted offer or the full ordered error list with
    /// nothing persisted (a speculative inline client is rolled back with the
    /// rest of the transaction).
    #[instrument(skip(self, request), fields(offer_number = %request.offer_number))]
    pub async fn create_offer(
        &self,
        request: CreateOfferRequest,
    ) -> Result<offer::Model, ServiceError> {
        let mut errors: Vec<String> = Vec::new();

        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let offer_number = request.offer_number.trim().to_string();
        if offer_number.is_empty() {
            errors.push("offer number required".to_string());
        } else if self.offer_number_exists(&txn, &offer_number).await? {
            errors.push("duplicate offer number".to_string());
        }

        let price = parse_decimal(&request.price);
        if price.is_none() {
            errors.push("price must be numeric".to_string());
        }

        let cost = parse_decimal(&request.cost);
        if cost.is_none() {
            errors.push("cost must be numeric".to_string());
        }

        let created_at = parse_date(&request.created_at);
        if created_at.is_none() {
            errors.push("invalid or missing creation date".to_string());
        }

        let valid_until = parse_date(&request.valid_until);
        if valid_until.is_none() {
            errors.push("invalid or missing validity date".to_string());
        }

        if let (Some(created), Some(valid)) = (created_at, valid_until) {
            if valid < created {
                errors.push("validity date must be after creation date".to_string());
            }
        }

        let status = match request.status.trim() {
            "" => Some(OfferStatus::default()),
            label => {
                let parsed = OfferStatus::parse(label);
                if parsed.is_none() {
                    errors.push("invalid status".to_string());
                }
                parsed
            }
        };

        let client = self.resolve_client(&txn, &request, &mut errors).await?;

        if !errors.is_empty() {
            txn.rollback().await?;
            return Err(ServiceError::ValidationFailed(errors));
        }

        // The error list is empty, so every parsed field resolved.
        let (Some(price), Some(cost), Some(created_at), Some(valid_until), Some(status), Some(client)) =
            (price, cost, created_at, valid_until, status, client)
        else {
            txn.rollback().await?;
            return Err(ServiceError::InternalError(
                "offer validation produced no errors but left unresolved fields".to_string(),
            ));
        };

        let active = offer::ActiveModel {
            offer_number: Set(offer_number),
            price: Set(price),
            cost: Set(cost),
            created_at: Set(created_at),
            valid_until: Set(valid_until),
            status: Set(status),
            client_id: Set(client.id),
            ..Default::default()
        };

        let created = match active.insert(&txn).await {
            Ok(model) => model,
            // Two identical submissions can both pass the pre-check; the
            // unique index catches the loser, which reports the same message.
            Err(e) if is_unique_violation(&e) => {
                txn.rollback().await?;
                return Err(ServiceError::validation("duplicate offer number"));
            }
            Err(e) => {
                txn.rollback().await?;
                return Err(e.into());
            }
        };

        txn.commit().await?;

        if let Err(e) = self
            .event_sender
            .send(Event::OfferCreated {
                offer_id: created.id,
                offer_number: created.offer_number.clone(),
                client_id: created.client_id,
            })
            .await
        {
            error!("Failed to send OfferCreated event: {}", e);
        }

        Ok(created)
    }

    async fn offer_number_exists(
        &self,
        txn: &DatabaseTransaction,
        offer_number: &str,
    ) -> Result<bool, ServiceError> {
        let existing = offer::Entity::find()
            .filter(offer::Column::OfferNumber.eq(offer_number))
            .one(txn)
            .await?;
        Ok(existing.is_some())
    }

    /// Resolves the offer's client: an inline creation when a new-client name
    /// is supplied, otherwise a lookup by id. Pushes a validation message
    /// when neither path yields a client.
    async fn resolve_client(
        &self,
        txn: &DatabaseTransaction,
        request: &CreateOfferRequest,
        errors: &mut Vec<String>,
    ) -> Result<Option<client::Model>, ServiceError> {
        let new_client_name = request.new_client_name.trim();
        if !new_client_name.is_empty() {
            let email = request.new_client_email.trim();
            let email = (!email.is_empty()).then(|| email.to_string());

            let active = client::ActiveModel {
                name: Set(new_client_name.to_string()),
                email: Set(email),
                ..Default::default()
            };
            return match active.insert(txn).await {
                Ok(model) => Ok(Some(model)),
                Err(e) if is_unique_violation(&e) => {
                    errors.push("client already exists".to_string());
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            };
        }

        let client_id = request
            .client_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| raw.parse::<i32>().ok());

        let resolved = match client_id {
            Some(id) => client::Entity::find_by_id(id).one(txn).await?,
            None => None,
        };

        if resolved.is_none() {
            errors.push("a client must be selected or created".to_string());
        }
        Ok(resolved)
    }
}

pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    raw.trim().parse::<Decimal>().ok()
}

/// Parses a business date in ISO form (YYYY-MM-DD).
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
