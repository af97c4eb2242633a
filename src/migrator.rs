use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_menu_items_table::Migration),
            Box::new(m20250301_000002_create_orders_tables::Migration),
            Box::new(m20250301_000003_create_held_orders_tables::Migration),
            Box::new(m20250301_000004_create_deleted_orders_tables::Migration),
        ]
    }
}

mod m20250301_000001_create_menu_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_menu_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MenuItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MenuItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MenuItems::Name).string().not_null())
                        .col(ColumnDef::new(MenuItems::Category).string().null())
                        .col(ColumnDef::new(MenuItems::Cost).decimal_len(10, 2).not_null())
                        .col(
                            ColumnDef::new(MenuItems::Sgst)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MenuItems::Cgst)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MenuItems::Tax)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MenuItems::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MenuItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MenuItems {
        Table,
        Id,
        Name,
        Category,
        Cost,
        Sgst,
        Cgst,
        Tax,
        IsActive,
    }
}

mod m20250301_000002_create_orders_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_orders_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::BillNumber)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Orders::Kot).integer().not_null())
                        .col(ColumnDef::new(Orders::Date).date().not_null())
                        .col(ColumnDef::new(Orders::CashierId).integer().not_null())
                        .col(ColumnDef::new(Orders::Price).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(Orders::Sgst).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(Orders::Cgst).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(Orders::Tax).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            // kot is a per-day ticket number; two orders can never share one
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_date_kot")
                        .table(Orders::Table)
                        .col(Orders::Date)
                        .col(Orders::Kot)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
                        .col(ColumnDef::new(OrderItems::ItemId).integer().not_null())
                        .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_order_id")
                                .from(OrderItems::Table, OrderItems::OrderId)
                                .to(Orders::Table, Orders::BillNumber)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_order_item")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .col(OrderItems::ItemId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DiscountedOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DiscountedOrders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DiscountedOrders::BillNumber)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(DiscountedOrders::InitialPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DiscountedOrders::DiscountPercentage)
                                .decimal_len(5, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DiscountedOrders::DiscountAmount)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_discounted_orders_bill_number")
                                .from(DiscountedOrders::Table, DiscountedOrders::BillNumber)
                                .to(Orders::Table, Orders::BillNumber)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DiscountedOrders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        BillNumber,
        Kot,
        Date,
        CashierId,
        Price,
        Sgst,
        Cgst,
        Tax,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum OrderItems {
        Table,
        Id,
        OrderId,
        ItemId,
        Quantity,
    }

    #[derive(DeriveIden)]
    enum DiscountedOrders {
        Table,
        Id,
        BillNumber,
        InitialPrice,
        DiscountPercentage,
        DiscountAmount,
    }
}

mod m20250301_000003_create_held_orders_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_held_orders_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(HeldOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(HeldOrders::HeldId)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(HeldOrders::CashierId).integer().not_null())
                        .col(ColumnDef::new(HeldOrders::Date).date().not_null())
                        .col(ColumnDef::new(HeldOrders::Price).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(HeldOrders::Sgst).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(HeldOrders::Cgst).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(HeldOrders::Tax).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(HeldOrders::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(HeldOrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(HeldOrderItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(HeldOrderItems::HeldId).integer().not_null())
                        .col(ColumnDef::new(HeldOrderItems::ItemId).integer().not_null())
                        .col(ColumnDef::new(HeldOrderItems::Quantity).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_held_order_items_held_id")
                                .from(HeldOrderItems::Table, HeldOrderItems::HeldId)
                                .to(HeldOrders::Table, HeldOrders::HeldId)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(HeldOrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(HeldOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum HeldOrders {
        Table,
        HeldId,
        CashierId,
        Date,
        Price,
        Sgst,
        Cgst,
        Tax,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum HeldOrderItems {
        Table,
        Id,
        HeldId,
        ItemId,
        Quantity,
    }
}

mod m20250301_000004_create_deleted_orders_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_deleted_orders_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeletedOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeletedOrders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(DeletedOrders::BillNumber).integer().not_null())
                        .col(ColumnDef::new(DeletedOrders::Kot).integer().not_null())
                        .col(ColumnDef::new(DeletedOrders::Date).date().not_null())
                        .col(ColumnDef::new(DeletedOrders::CashierId).integer().not_null())
                        .col(ColumnDef::new(DeletedOrders::Price).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(DeletedOrders::Sgst).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(DeletedOrders::Cgst).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(DeletedOrders::Tax).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(DeletedOrders::Reason).string().not_null())
                        .col(ColumnDef::new(DeletedOrders::DeletedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeletedOrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeletedOrderItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DeletedOrderItems::DeletedOrderId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeletedOrderItems::BillNumber).integer().not_null())
                        .col(ColumnDef::new(DeletedOrderItems::ItemId).integer().not_null())
                        .col(ColumnDef::new(DeletedOrderItems::Quantity).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_deleted_order_items_deleted_order_id")
                                .from(DeletedOrderItems::Table, DeletedOrderItems::DeletedOrderId)
                                .to(DeletedOrders::Table, DeletedOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeletedOrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(DeletedOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DeletedOrders {
        Table,
        Id,
        BillNumber,
        Kot,
        Date,
        CashierId,
        Price,
        Sgst,
        Cgst,
        Tax,
        Reason,
        DeletedAt,
    }

    #[derive(DeriveIden)]
    enum DeletedOrderItems {
        Table,
        Id,
        DeletedOrderId,
        BillNumber,
        ItemId,
        Quantity,
    }
}
