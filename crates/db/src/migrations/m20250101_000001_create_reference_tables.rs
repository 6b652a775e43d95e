//! Create property, development, agent and developer reference tables.
//!
//! These tables belong to the marketplace schema. They are created only when
//! missing so the engine can run against a bare database.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Property::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Property::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Property::Latitude).double())
                    .col(ColumnDef::new(Property::Longitude).double())
                    .col(ColumnDef::new(Property::Price).big_integer())
                    .col(ColumnDef::new(Property::Bedrooms).integer())
                    .col(ColumnDef::new(Property::Bathrooms).integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Development::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Development::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Development::Latitude).double())
                    .col(ColumnDef::new(Development::Longitude).double())
                    .col(ColumnDef::new(Development::PriceFrom).big_integer())
                    .col(ColumnDef::new(Development::PriceTo).big_integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Agent::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Agent::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Agent::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Agent::AgencyId).string_len(32))
                    .to_owned(),
            )
            .await?;

        // Index: user_id (affiliation lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_agent_user_id")
                    .table(Agent::Table)
                    .col(Agent::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Developer::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Developer::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Developer::UserId).string_len(32).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_developer_user_id")
                    .table(Developer::Table)
                    .col(Developer::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Developer::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Agent::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Development::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Property::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
enum Property {
    Table,
    Id,
    Latitude,
    Longitude,
    Price,
    Bedrooms,
    Bathrooms,
}

#[derive(Iden)]
enum Development {
    Table,
    Id,
    Latitude,
    Longitude,
    PriceFrom,
    PriceTo,
}

#[derive(Iden)]
enum Agent {
    Table,
    Id,
    UserId,
    AgencyId,
}

#[derive(Iden)]
enum Developer {
    Table,
    Id,
    UserId,
}
