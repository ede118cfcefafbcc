// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// マイグレーションモジュール
mod m20250801_000001_create_cookie_configs_table;
mod m20250801_000002_create_consent_logs_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_cookie_configs_table::Migration),
            Box::new(m20250801_000002_create_consent_logs_table::Migration),
        ]
    }
}
