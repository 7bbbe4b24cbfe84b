use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260301_000001_create_technology_stacks_table::TechnologyStacks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(uuid(Teams::Id).primary_key())
                    .col(string_len(Teams::Name, 100).not_null())
                    .col(text_null(Teams::Description))
                    .col(string_len(Teams::Status, 32).not_null().default("draft"))
                    .col(string_len(Teams::JoinCode, 6).not_null().unique_key())
                    .col(uuid(Teams::LeaderId).not_null())
                    .col(uuid_null(Teams::MentorId))
                    .col(uuid(Teams::TechStackId).not_null())
                    .col(integer(Teams::MaxMembers).not_null().default(3))
                    .col(string_len_null(Teams::RepositoryUrl, 512))
                    .col(
                        timestamp_with_time_zone(Teams::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Teams::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_tech_stack_id")
                            .from(Teams::Table, Teams::TechStackId)
                            .to(TechnologyStacks::Table, TechnologyStacks::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teams_leader_id")
                    .table(Teams::Table)
                    .col(Teams::LeaderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teams_mentor_id")
                    .table(Teams::Table)
                    .col(Teams::MentorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teams_status")
                    .table(Teams::Table)
                    .col(Teams::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Teams {
    Table,
    Id,
    Name,
    Description,
    Status,
    JoinCode,
    LeaderId,
    MentorId,
    TechStackId,
    MaxMembers,
    RepositoryUrl,
    CreatedAt,
    UpdatedAt,
}
