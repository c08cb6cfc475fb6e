pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_app_user;
mod m20250901_000002_create_project;
mod m20250901_000003_create_project_ledgers;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_app_user::Migration),
            Box::new(m20250901_000002_create_project::Migration),
            Box::new(m20250901_000003_create_project_ledgers::Migration),
        ]
    }
}
