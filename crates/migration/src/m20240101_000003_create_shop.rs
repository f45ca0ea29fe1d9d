use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shop::Table)
                    .if_not_exists()
                    .col(uuid(Shop::Id).primary_key())
                    .col(string_len(Shop::Name, 255).not_null())
                    .col(uuid(Shop::CategoryId).not_null())
                    .col(text(Shop::Description).not_null())
                    .col(string_len_null(Shop::Image, 512))
                    .col(string_len(Shop::Address, 500).not_null())
                    .col(string_len(Shop::Phone, 20).not_null())
                    .col(timestamp_with_time_zone(Shop::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Shop::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shop_category")
                            .from(Shop::Table, Shop::CategoryId)
                            .to(Category::Table, Category::Id)
                            // Restrict: dropping a category must not silently drop
                            // shops, their image blobs would be orphaned.
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Shop::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Shop {
    Table,
    Id,
    Name,
    CategoryId,
    Description,
    Image,
    Address,
    Phone,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Category { Table, Id }
