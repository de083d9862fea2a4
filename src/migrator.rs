#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_managers_table::Migration),
            Box::new(m20240101_000002_create_warehouses_table::Migration),
            Box::new(m20240101_000003_create_warehouse_managers_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_managers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_managers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Managers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Managers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Managers::RutNumber).integer().not_null())
                        .col(ColumnDef::new(Managers::RutCheckDigit).string_len(1).not_null())
                        .col(ColumnDef::new(Managers::FirstName).string().not_null())
                        .col(ColumnDef::new(Managers::LastNamePaternal).string().not_null())
                        .col(ColumnDef::new(Managers::LastNameMaternal).string())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Managers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Managers {
        Table,
        Id,
        RutNumber,
        RutCheckDigit,
        FirstName,
        LastNamePaternal,
        LastNameMaternal,
    }
}

mod m20240101_000002_create_warehouses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_warehouses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Warehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Warehouses::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        // Unique at the storage level so concurrent creators
                        // racing past the pre-insert check cannot both commit.
                        .col(
                            ColumnDef::new(Warehouses::Code)
                                .string_len(5)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Warehouses::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Warehouses::Address).text().not_null())
                        .col(ColumnDef::new(Warehouses::StaffCount).integer().not_null())
                        .col(ColumnDef::new(Warehouses::Active).boolean().not_null())
                        .col(
                            ColumnDef::new(Warehouses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Warehouses {
        Table,
        Id,
        Code,
        Name,
        Address,
        StaffCount,
        Active,
        CreatedAt,
    }
}

mod m20240101_000003_create_warehouse_managers_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_managers_table::Managers;
    use super::m20240101_000002_create_warehouses_table::Warehouses;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_warehouse_managers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WarehouseManagers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WarehouseManagers::WarehouseId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WarehouseManagers::ManagerId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(WarehouseManagers::WarehouseId)
                                .col(WarehouseManagers::ManagerId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_warehouse_managers_warehouse")
                                .from(WarehouseManagers::Table, WarehouseManagers::WarehouseId)
                                .to(Warehouses::Table, Warehouses::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_warehouse_managers_manager")
                                .from(WarehouseManagers::Table, WarehouseManagers::ManagerId)
                                .to(Managers::Table, Managers::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WarehouseManagers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum WarehouseManagers {
        Table,
        WarehouseId,
        ManagerId,
    }
}
