//! Create explore_content and explore_video tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExploreContent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExploreContent::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExploreContent::CreatorId).string_len(32).not_null())
                    .col(ColumnDef::new(ExploreContent::CreatorType).string_len(16).not_null())
                    .col(ColumnDef::new(ExploreContent::AgencyId).string_len(32))
                    .col(ColumnDef::new(ExploreContent::PropertyId).string_len(32))
                    .col(ColumnDef::new(ExploreContent::DevelopmentId).string_len(32))
                    .col(ColumnDef::new(ExploreContent::Title).string_len(256).not_null())
                    .col(ColumnDef::new(ExploreContent::Description).text())
                    .col(
                        ColumnDef::new(ExploreContent::Tags)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(ExploreContent::LifestyleCategories)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(ExploreContent::Latitude).double())
                    .col(ColumnDef::new(ExploreContent::Longitude).double())
                    .col(ColumnDef::new(ExploreContent::PriceMin).big_integer())
                    .col(ColumnDef::new(ExploreContent::PriceMax).big_integer())
                    .col(
                        ColumnDef::new(ExploreContent::Metadata)
                            .json_binary()
                            .not_null()
                            .default("{}"),
                    )
                    .col(ColumnDef::new(ExploreContent::VideoUrl).text().not_null())
                    .col(ColumnDef::new(ExploreContent::ThumbnailUrl).text().not_null())
                    .col(ColumnDef::new(ExploreContent::DurationSeconds).double().not_null())
                    .col(
                        ColumnDef::new(ExploreContent::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ExploreContent::TotalWatchTime)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ExploreContent::CompletionRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ExploreContent::SaveCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ExploreContent::ShareCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ExploreContent::ClickThroughCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ExploreContent::EngagementScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ExploreContent::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ExploreContent::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExploreContent::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ExploreContent::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: creator_id (creator analytics)
        manager
            .create_index(
                Index::create()
                    .name("idx_explore_content_creator_id")
                    .table(ExploreContent::Table)
                    .col(ExploreContent::CreatorId)
                    .to_owned(),
            )
            .await?;

        // Index: feed ranking order
        manager
            .create_index(
                Index::create()
                    .name("idx_explore_content_feed_rank")
                    .table(ExploreContent::Table)
                    .col(ExploreContent::IsActive)
                    .col((ExploreContent::IsFeatured, IndexOrder::Desc))
                    .col((ExploreContent::EngagementScore, IndexOrder::Desc))
                    .col((ExploreContent::CreatedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExploreVideo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExploreVideo::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExploreVideo::ContentId).string_len(32).not_null())
                    .col(ColumnDef::new(ExploreVideo::CreatorId).string_len(32).not_null())
                    .col(ColumnDef::new(ExploreVideo::Title).string_len(256).not_null())
                    .col(ColumnDef::new(ExploreVideo::VideoUrl).text().not_null())
                    .col(ColumnDef::new(ExploreVideo::ThumbnailUrl).text().not_null())
                    .col(ColumnDef::new(ExploreVideo::DurationSeconds).double().not_null())
                    .col(
                        ColumnDef::new(ExploreVideo::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ExploreVideo::CompletionRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ExploreVideo::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ExploreVideo::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_explore_video_content")
                            .from(ExploreVideo::Table, ExploreVideo::ContentId)
                            .to(ExploreContent::Table, ExploreContent::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: content_id (video -> content resolution)
        manager
            .create_index(
                Index::create()
                    .name("idx_explore_video_content_id")
                    .table(ExploreVideo::Table)
                    .col(ExploreVideo::ContentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_explore_video_creator_id")
                    .table(ExploreVideo::Table)
                    .col(ExploreVideo::CreatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExploreVideo::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ExploreContent::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ExploreContent {
    Table,
    Id,
    CreatorId,
    CreatorType,
    AgencyId,
    PropertyId,
    DevelopmentId,
    Title,
    Description,
    Tags,
    LifestyleCategories,
    Latitude,
    Longitude,
    PriceMin,
    PriceMax,
    Metadata,
    VideoUrl,
    ThumbnailUrl,
    DurationSeconds,
    ViewCount,
    TotalWatchTime,
    CompletionRate,
    SaveCount,
    ShareCount,
    ClickThroughCount,
    EngagementScore,
    IsActive,
    IsFeatured,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ExploreVideo {
    Table,
    Id,
    ContentId,
    CreatorId,
    Title,
    VideoUrl,
    ThumbnailUrl,
    DurationSeconds,
    ViewCount,
    CompletionRate,
    CreatedAt,
    UpdatedAt,
}
