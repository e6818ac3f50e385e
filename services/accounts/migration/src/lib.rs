use sea_orm_migration::prelude::*;

mod m20260825_000001_create_users;
mod m20260825_000002_create_activation_codes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260825_000001_create_users::Migration),
            Box::new(m20260825_000002_create_activation_codes::Migration),
        ]
    }
}
