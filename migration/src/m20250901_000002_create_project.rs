use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        println!("🏗 Creating project table...");

        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Project::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Project::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Project::ClientName).string().not_null())
                    .col(
                        ColumnDef::new(Project::Priority)
                            .string()
                            .not_null()
                            .default(Expr::value("medium")),
                    )
                    .col(
                        ColumnDef::new(Project::Stage)
                            .string()
                            .not_null()
                            .default(Expr::value("upcoming")),
                    )
                    .col(
                        ColumnDef::new(Project::OverallDeadline)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Project::CurrentDeadline)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Project::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Project::AssignedDesignerId).uuid())
                    .col(ColumnDef::new(Project::AssignedDevManagerId).uuid())
                    .col(ColumnDef::new(Project::AssignedQaId).uuid())
                    .col(ColumnDef::new(Project::DesignChecklist).json_binary().not_null())
                    .col(ColumnDef::new(Project::DevChecklist).json_binary().not_null())
                    .col(ColumnDef::new(Project::QaChecklist).json_binary().not_null())
                    .col(ColumnDef::new(Project::FinalChecklist).json_binary().not_null())
                    .col(
                        ColumnDef::new(Project::QaFailCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Project::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Project::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Project::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Project::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_designer")
                            .from(Project::Table, Project::AssignedDesignerId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_dev_manager")
                            .from(Project::Table, Project::AssignedDevManagerId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_qa")
                            .from(Project::Table, Project::AssignedQaId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_created_by")
                            .from(Project::Table, Project::CreatedBy)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_tenant_stage")
                    .table(Project::Table)
                    .col(Project::TenantId)
                    .col(Project::Stage)
                    .to_owned(),
            )
            .await?;

        println!("✅ Created project table");

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Project {
    Table,
    Id,
    TenantId,
    ClientName,
    Priority,
    Stage,
    OverallDeadline,
    CurrentDeadline,
    CompletedAt,
    AssignedDesignerId,
    AssignedDevManagerId,
    AssignedQaId,
    DesignChecklist,
    DevChecklist,
    QaChecklist,
    FinalChecklist,
    QaFailCount,
    Version,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AppUser {
    Table,
    Id,
}
