pub use sea_orm_migration::prelude::*;

mod m20250801_000000_bootstrap;
mod m20250801_000001_create_staff_tables;
mod m20250801_000002_seed_initial_data;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000000_bootstrap::Migration),
            Box::new(m20250801_000001_create_staff_tables::Migration),
            Box::new(m20250801_000002_seed_initial_data::Migration),
        ]
    }
}
