use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A priced proposal record tied to one client.
///
/// `margin` is derived on read and never stored.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[validate(length(min = 1, max = 50, message = "Offer number must be between 1 and 50 characters"))]
    pub offer_number: String,

    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub cost: Decimal,
    pub created_at: Date,
    pub valid_until: Date,
    pub status: OfferStatus,
    pub client_id: i32,
}

impl Model {
    pub fn margin(&self) -> Decimal {
        self.price - self.cost
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Offer lifecycle status.
///
/// Stored values keep the source vocabulary; declaration order drives the
/// dashboard status summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum OfferStatus {
    #[sea_orm(string_value = "borrador")]
    #[serde(rename = "borrador")]
    Draft,
    #[sea_orm(string_value = "enviada")]
    #[serde(rename = "enviada")]
    Sent,
    #[sea_orm(string_value = "ganada")]
    #[serde(rename = "ganada")]
    Won,
    #[sea_orm(string_value = "perdida")]
    #[serde(rename = "perdida")]
    Lost,
}

impl OfferStatus {
    /// The stored label for this status.
    pub fn label(&self) -> String {
        self.to_value()
    }

    /// Parses a stored label back into a status.
    pub fn parse(label: &str) -> Option<Self> {
        Self::try_from_value(&label.to_string()).ok()
    }
}

impl Default for OfferStatus {
    fn default() -> Self {
        OfferStatus::Draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn margin_is_price_minus_cost() {
        let offer = Model {
            id: 1,
            offer_number: "OF-1".into(),
            price: dec!(1000),
            cost: dec!(600),
            created_at: Date::from_ymd_opt(2024, 1, 1).unwrap(),
            valid_until: Date::from_ymd_opt(2024, 1, 31).unwrap(),
            status: OfferStatus::Draft,
            client_id: 1,
        };
        assert_eq!(offer.margin(), dec!(400));
    }

    #[test]
    fn status_round_trips_through_stored_labels() {
        assert_eq!(OfferStatus::Draft.label(), "borrador");
        assert_eq!(OfferStatus::parse("ganada"), Some(OfferStatus::Won));
        assert_eq!(OfferStatus::parse("bogus"), None);
    }
}
