use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TechnologyStacks::Table)
                    .if_not_exists()
                    .col(uuid(TechnologyStacks::Id).primary_key())
                    .col(string_len(TechnologyStacks::Name, 100).not_null().unique_key())
                    .col(string_len_null(TechnologyStacks::IconUrl, 512))
                    .col(
                        string_len(TechnologyStacks::Status, 16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        timestamp_with_time_zone(TechnologyStacks::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TechnologyStacks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TechnologyStacks {
    Table,
    Id,
    Name,
    IconUrl,
    Status,
    CreatedAt,
}
