use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TeamSettings::Table)
                    .if_not_exists()
                    .col(integer(TeamSettings::Id).primary_key())
                    .col(integer(TeamSettings::DefaultMaxMembers).not_null().default(3))
                    .col(boolean(TeamSettings::TeamCreationOpen).not_null().default(true))
                    .col(boolean(TeamSettings::JoiningOpen).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(TeamSettings::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TeamSettings {
    Table,
    Id,
    DefaultMaxMembers,
    TeamCreationOpen,
    JoiningOpen,
    UpdatedAt,
}
