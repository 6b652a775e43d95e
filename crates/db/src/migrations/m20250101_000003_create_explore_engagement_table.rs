//! Create explore_engagement and explore_feed_session tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExploreFeedSession::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExploreFeedSession::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExploreFeedSession::UserId).string_len(32))
                    .col(
                        ColumnDef::new(ExploreFeedSession::SessionStart)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ExploreFeedSession::SessionEnd).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExploreEngagement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExploreEngagement::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExploreEngagement::ContentId).string_len(32).not_null())
                    .col(ColumnDef::new(ExploreEngagement::SessionId).string_len(32).not_null())
                    .col(ColumnDef::new(ExploreEngagement::UserId).string_len(32))
                    .col(
                        ColumnDef::new(ExploreEngagement::EngagementType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExploreEngagement::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExploreEngagement::WatchTime)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(ExploreEngagement::WatchTime).gte(0)),
                    )
                    .col(
                        ColumnDef::new(ExploreEngagement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(
                        Expr::col(ExploreEngagement::Completed)
                            .eq(false)
                            .or(Expr::col(ExploreEngagement::EngagementType).eq("view")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_explore_engagement_content")
                            .from(ExploreEngagement::Table, ExploreEngagement::ContentId)
                            .to(ExploreContent::Table, ExploreContent::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (content_id, created_at) for windowed per-video analytics
        manager
            .create_index(
                Index::create()
                    .name("idx_explore_engagement_content_created")
                    .table(ExploreEngagement::Table)
                    .col(ExploreEngagement::ContentId)
                    .col(ExploreEngagement::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: session_id (session analytics)
        manager
            .create_index(
                Index::create()
                    .name("idx_explore_engagement_session_id")
                    .table(ExploreEngagement::Table)
                    .col(ExploreEngagement::SessionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExploreEngagement::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ExploreFeedSession::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ExploreEngagement {
    Table,
    Id,
    ContentId,
    SessionId,
    UserId,
    EngagementType,
    Completed,
    WatchTime,
    CreatedAt,
}

#[derive(Iden)]
enum ExploreFeedSession {
    Table,
    Id,
    UserId,
    SessionStart,
    SessionEnd,
}

#[derive(Iden)]
enum ExploreContent {
    Table,
    Id,
}
