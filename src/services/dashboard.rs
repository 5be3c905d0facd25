use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, Iterable, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::{client, offer, OfferStatus};
use crate::errors::ServiceError;

/// Optional dashboard criteria. Each present criterion narrows the result
/// with AND; the status set is a membership test and date bounds are
/// inclusive.
#[derive(Debug, Clone, Default)]
pub struct DashboardFilter {
    pub statuses: Vec<OfferStatus>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub client_id: Option<i32>,
}

/// Aggregates over the filtered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardTotals {
    pub count: u64,
    pub value: Decimal,
    pub cost: Decimal,
    pub margin: Decimal,
}

/// Count of matching offers per status, reported for every status in
/// enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: OfferStatus,
    pub count: u64,
}

/// A matching offer together with its client, newest first.
#[derive(Debug, Clone)]
pub struct OfferWithClient {
    pub offer: offer::Model,
    pub client: Option<client::Model>,
}

#[derive(Debug, Clone)]
pub struct DashboardData {
    pub offers: Vec<OfferWithClient>,
    pub totals: DashboardTotals,
    pub status_summary: Vec<StatusCount>,
}

/// Service composing the filtered offer query and its aggregates.
#[derive(Clone)]
pub struct DashboardService {
    db_pool: Arc<DbPool>,
}

impl DashboardService {
    /// Creates a new dashboard service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Runs the filtered query and computes totals and the per-status
    /// summary over the matching offers.
    #[instrument(skip(self))]
    pub async fn query(&self, filter: &DashboardFilter) -> Result<DashboardData, ServiceError> {
        let db = &*self.db_pool;

        let mut query = offer::Entity::find().find_also_related(client::Entity);

        if !filter.statuses.is_empty() {
            query = query.filter(offer::Column::Status.is_in(filter.statuses.iter().copied()));
        }
        if let Some(from) = filter.created_from {
            query = query.filter(offer::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.created_to {
            query = query.filter(offer::Column::CreatedAt.lte(to));
        }
        if let Some(from) = filter.valid_from {
            query = query.filter(offer::Column::ValidUntil.gte(from));
        }
        if let Some(to) = filter.valid_to {
            query = query.filter(offer::Column::ValidUntil.lte(to));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(offer::Column::ClientId.eq(client_id));
        }

        let rows = query
            .order_by_desc(offer::Column::CreatedAt)
            .order_by_desc(offer::Column::Id)
            .all(db)
            .await?;

        let offers: Vec<OfferWithClient> = rows
            .into_iter()
            .map(|(offer, client)| OfferWithClient { offer, client })
            .collect();

        let totals = Self::totals(&offers);
        let status_summary = Self::status_summary(&offers);

        Ok(DashboardData {
            offers,
            totals,
            status_summary,
        })
    }

    fn totals(offers: &[OfferWithClient]) -> DashboardTotals {
        let value: Decimal = offers.iter().map(|row| row.offer.price).sum();
        let cost: Decimal = offers.iter().map(|row| row.offer.cost).sum();
        DashboardTotals {
            count: offers.len() as u64,
            value,
            cost,
            margin: value - cost,
        }
    }

    fn status_summary(offers: &[OfferWithClient]) -> Vec<StatusCount> {
        OfferStatus::iter()
            .map(|status| StatusCount {
                status,
                count: offers
                    .iter()
                    .filter(|row| row.offer.status == status)
                    .count() as u64,
            })
            .collect()
    }
}
