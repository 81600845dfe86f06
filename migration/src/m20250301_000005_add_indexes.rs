use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Bids {
    Table,
    ProjectId,
    FreelancerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    ClientId,
    Status,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Bids on a project, in submission order
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_project_id_created_at")
                    .table(Bids::Table)
                    .col(Bids::ProjectId)
                    .col(Bids::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Bids by freelancer
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_freelancer_id")
                    .table(Bids::Table)
                    .col(Bids::FreelancerId)
                    .to_owned(),
            )
            .await?;

        // Projects by owner, and the open-project listing
        manager
            .create_index(
                Index::create()
                    .name("idx_projects_client_id")
                    .table(Projects::Table)
                    .col(Projects::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_status")
                    .table(Projects::Table)
                    .col(Projects::Status)
                    .to_owned(),
            )
            .await?;

        // One open bid per freelancer per project. Terminal bids are history
        // and must not count, so the index is partial.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_bids_one_open_per_freelancer \
                 ON bids (project_id, freelancer_id) WHERE status = 'submitted'",
            )
            .await?;

        // At most one accepted bid per project.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_bids_one_accepted_per_project \
                 ON bids (project_id) WHERE status = 'accepted'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_bids_one_accepted_per_project",
            "idx_bids_one_open_per_freelancer",
            "idx_projects_status",
            "idx_projects_client_id",
            "idx_bids_freelancer_id",
            "idx_bids_project_id_created_at",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
