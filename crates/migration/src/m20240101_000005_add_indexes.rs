use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_category_name")
                    .table(Category::Table)
                    .col(Category::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_shop_category_id")
                    .table(Shop::Table)
                    .col(Shop::CategoryId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_shop_name")
                    .table(Shop::Table)
                    .col(Shop::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_shop_name").table(Shop::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_shop_category_id").table(Shop::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_category_name").table(Category::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Category { Table, Name }

#[derive(DeriveIden)]
enum Shop { Table, CategoryId, Name }
