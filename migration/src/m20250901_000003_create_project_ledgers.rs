use sea_orm_migration::prelude::*;

use super::m20250901_000002_create_project::Project;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        println!("🔄 Creating project history, score ledger, comments and notifications...");

        // Append-only stage timeline
        manager
            .create_table(
                Table::create()
                    .table(ProjectHistory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProjectHistory::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ProjectHistory::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(ProjectHistory::Stage).string().not_null())
                    .col(ColumnDef::new(ProjectHistory::Action).text().not_null())
                    .col(ColumnDef::new(ProjectHistory::UserId).uuid().not_null())
                    .col(ColumnDef::new(ProjectHistory::RejectionSnapshot).json_binary())
                    .col(
                        ColumnDef::new(ProjectHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_history_project")
                            .from(ProjectHistory::Table, ProjectHistory::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_history_project_created")
                    .table(ProjectHistory::Table)
                    .col(ProjectHistory::ProjectId)
                    .col(ProjectHistory::CreatedAt)
                    .to_owned(),
            )
            .await?;

        println!("✅ Created project_history table");

        // Append-only score ledger
        manager
            .create_table(
                Table::create()
                    .table(ScoreEntry::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ScoreEntry::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ScoreEntry::TenantId).uuid().not_null())
                    .col(ColumnDef::new(ScoreEntry::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(ScoreEntry::UserId).uuid().not_null())
                    .col(ColumnDef::new(ScoreEntry::Points).integer().not_null())
                    .col(ColumnDef::new(ScoreEntry::Reason).string().not_null())
                    .col(
                        ColumnDef::new(ScoreEntry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_score_entry_project")
                            .from(ScoreEntry::Table, ScoreEntry::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_score_entry_tenant_user")
                    .table(ScoreEntry::Table)
                    .col(ScoreEntry::TenantId)
                    .col(ScoreEntry::UserId)
                    .to_owned(),
            )
            .await?;

        println!("✅ Created score_entry table");

        manager
            .create_table(
                Table::create()
                    .table(ProjectComment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProjectComment::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ProjectComment::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(ProjectComment::UserId).uuid().not_null())
                    .col(ColumnDef::new(ProjectComment::Text).text().not_null())
                    .col(
                        ColumnDef::new(ProjectComment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_comment_project")
                            .from(ProjectComment::Table, ProjectComment::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserNotification::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserNotification::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserNotification::TenantId).uuid().not_null())
                    .col(ColumnDef::new(UserNotification::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserNotification::ProjectId).uuid())
                    .col(ColumnDef::new(UserNotification::Message).text().not_null())
                    .col(
                        ColumnDef::new(UserNotification::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserNotification::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_notification_project")
                            .from(UserNotification::Table, UserNotification::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_notification_user_read")
                    .table(UserNotification::Table)
                    .col(UserNotification::UserId)
                    .col(UserNotification::IsRead)
                    .to_owned(),
            )
            .await?;

        println!("✅ Created project_comment and user_notification tables");

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserNotification::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectComment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScoreEntry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProjectHistory {
    Table,
    Id,
    ProjectId,
    Stage,
    Action,
    UserId,
    RejectionSnapshot,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ScoreEntry {
    Table,
    Id,
    TenantId,
    ProjectId,
    UserId,
    Points,
    Reason,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProjectComment {
    Table,
    Id,
    ProjectId,
    UserId,
    Text,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserNotification {
    Table,
    Id,
    TenantId,
    UserId,
    ProjectId,
    Message,
    IsRead,
    CreatedAt,
}
