use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_clients_table::Migration),
            Box::new(m20240301_000002_create_offers_table::Migration),
            Box::new(m20240301_000003_create_dashboard_preferences_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240301_000001_create_clients_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Clients::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Clients::Name).string_len(120).not_null())
                        .col(ColumnDef::new(Clients::Email).string_len(120).null())
                        .to_owned(),
                )
                .await?;

            // Client names are globally unique; the index is the enforcement
            // mechanism, application pre-checks only improve the error message.
            manager
                .create_index(
                    Index::create()
                        .name("idx_clients_name_unique")
                        .table(Clients::Table)
                        .col(Clients::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Clients {
        Table,
        Id,
        Name,
        Email,
    }
}

mod m20240301_000002_create_offers_table {

    use sea_orm_migration::prelude::*;

    use super::m20240301_000001_create_clients_table::Clients;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_offers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Offers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Offers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Offers::OfferNumber).string_len(50).not_null())
                        .col(ColumnDef::new(Offers::Price).decimal_len(16, 2).not_null())
                        .col(ColumnDef::new(Offers::Cost).decimal_len(16, 2).not_null())
                        .col(ColumnDef::new(Offers::CreatedAt).date().not_null())
                        .col(ColumnDef::new(Offers::ValidUntil).date().not_null())
                        .col(ColumnDef::new(Offers::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Offers::ClientId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_offers_client_id")
                                .from(Offers::Table, Offers::ClientId)
                                .to(Clients::Table, Clients::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // Offer numbers are globally unique, enforced at the storage
            // layer so racing identical submissions cannot both insert.
            manager
                .create_index(
                    Index::create()
                        .name("idx_offers_offer_number_unique")
                        .table(Offers::Table)
                        .col(Offers::OfferNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            // Dashboard listing sorts by creation date and scopes by client.
            manager
                .create_index(
                    Index::create()
                        .name("idx_offers_created_at")
                        .table(Offers::Table)
                        .col(Offers::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_offers_client_id")
                        .table(Offers::Table)
                        .col(Offers::ClientId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Offers::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Offers {
        Table,
        Id,
        OfferNumber,
        Price,
        Cost,
        CreatedAt,
        ValidUntil,
        Status,
        ClientId,
    }
}

mod m20240301_000003_create_dashboard_preferences_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_dashboard_preferences_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DashboardPreferences::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DashboardPreferences::SessionId)
                                .string_len(64)
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DashboardPreferences::Columns)
                                .text()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DashboardPreferences::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DashboardPreferences::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum DashboardPreferences {
        Table,
        SessionId,
        Columns,
        UpdatedAt,
    }
}
