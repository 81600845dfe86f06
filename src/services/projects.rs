use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::db::bids as bid_db;
use crate::db::projects as project_db;
use crate::error::{ServiceError, ServiceResult};
use crate::models::projects::{self, CreateProject, ProjectStatus, UpdateProject};

#[derive(Clone)]
pub struct ProjectService {
    db: DatabaseConnection,
}

impl ProjectService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_project(
        &self,
        client_id: Uuid,
        request: CreateProject,
    ) -> ServiceResult<projects::Model> {
        request.validate().map_err(ServiceError::Validation)?;

        let project = project_db::insert_project(&self.db, request, client_id).await?;
        tracing::info!(project_id = %project.id, client_id = %client_id, "Project posted");
        Ok(project)
    }

    pub async fn list_open_projects(&self, page: u64, limit: u64) -> ServiceResult<Vec<projects::Model>> {
        Ok(project_db::get_open_projects(&self.db, page, limit).await?)
    }

    pub async fn get_project(&self, project_id: Uuid) -> ServiceResult<projects::Model> {
        project_db::get_project_by_id(&self.db, project_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", project_id))
    }

    pub async fn get_projects_by_client(&self, client_id: Uuid) -> ServiceResult<Vec<projects::Model>> {
        Ok(project_db::get_projects_by_client_id(&self.db, client_id).await?)
    }

    /// Edit a project's details. Only allowed while it is still open.
    pub async fn update_project(
        &self,
        project_id: Uuid,
        client_id: Uuid,
        request: UpdateProject,
    ) -> ServiceResult<projects::Model> {
        request.validate().map_err(ServiceError::Validation)?;

        let txn = self.db.begin().await?;
        let project = lock_owned(&txn, project_id, client_id).await?;

        if project.status != ProjectStatus::Open {
            return Err(ServiceError::State(format!(
                "Project {project_id} is {} and can no longer be edited",
                project.status.as_str()
            )));
        }

        let updated = project_db::update_project(&txn, project, request).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Cancel an open project. Bids still waiting on it are rejected.
    pub async fn cancel_project(&self, project_id: Uuid, client_id: Uuid) -> ServiceResult<projects::Model> {
        let txn = self.db.begin().await?;
        let project = lock_owned(&txn, project_id, client_id).await?;
        ensure_transition(&project, ProjectStatus::Cancelled)?;

        let rejected = bid_db::reject_open_bids(&txn, project_id, None).await?;
        let cancelled = project_db::set_project_status(&txn, project, ProjectStatus::Cancelled).await?;
        txn.commit().await?;

        tracing::info!(project_id = %project_id, rejected, "Project cancelled");
        Ok(cancelled)
    }

    pub async fn complete_project(&self, project_id: Uuid, client_id: Uuid) -> ServiceResult<projects::Model> {
        let txn = self.db.begin().await?;
        let project = lock_owned(&txn, project_id, client_id).await?;
        ensure_transition(&project, ProjectStatus::Completed)?;

        let completed = project_db::set_project_status(&txn, project, ProjectStatus::Completed).await?;
        txn.commit().await?;

        tracing::info!(project_id = %project_id, "Project completed");
        Ok(completed)
    }
}

async fn lock_owned(
    txn: &sea_orm::DatabaseTransaction,
    project_id: Uuid,
    client_id: Uuid,
) -> ServiceResult<projects::Model> {
    let project = project_db::get_project_for_update(txn, project_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Project", project_id))?;

    if project.client_id != client_id {
        return Err(ServiceError::Authorization(
            "Only the project owner can change this project".to_string(),
        ));
    }
    Ok(project)
}

fn ensure_transition(project: &projects::Model, next: ProjectStatus) -> ServiceResult<()> {
    if project.status.can_transition_to(next) {
        return Ok(());
    }
    Err(ServiceError::State(format!(
        "Project {} is {} and cannot become {}",
        project.id,
        project.status.as_str(),
        next.as_str()
    )))
}
