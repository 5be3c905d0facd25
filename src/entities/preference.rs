use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-session dashboard column selection. Display metadata only; carries no
/// business invariant.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dashboard_preferences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,

    /// JSON-encoded list of column names.
    #[sea_orm(column_type = "Text")]
    pub columns: String,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
