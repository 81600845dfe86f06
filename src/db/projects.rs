use sea_orm::*;
use uuid::Uuid;

use crate::models::projects::{self, Categories, CreateProject, ProjectStatus, UpdateProject};

/// Insert a new project owned by `client_id`. New projects start open.
pub async fn insert_project<C: ConnectionTrait>(
    db: &C,
    input: CreateProject,
    client_id: Uuid,
) -> Result<projects::Model, DbErr> {
    let new_project = projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description),
        budget: Set(input.budget),
        category: Set(input.category.unwrap_or(Categories::Other)),
        status: Set(ProjectStatus::Open),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_project.insert(db).await
}

/// Fetch open projects, newest first.
pub async fn get_open_projects<C: ConnectionTrait>(
    db: &C,
    page: u64,
    limit: u64,
) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .filter(projects::Column::Status.eq(ProjectStatus::Open))
        .order_by_desc(projects::Column::CreatedAt)
        .order_by_desc(projects::Column::Id)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await
}

/// Fetch a single project by ID.
pub async fn get_project_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(id).one(db).await
}

/// Fetch a project and lock its row for the rest of the transaction.
///
/// Bid transitions take this lock first, which serialises them per project.
pub async fn get_project_for_update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(id).lock_exclusive().one(db).await
}

/// Fetch every project posted by a client.
pub async fn get_projects_by_client_id<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .filter(projects::Column::ClientId.eq(client_id))
        .order_by_desc(projects::Column::CreatedAt)
        .all(db)
        .await
}

/// Update an existing project's descriptive fields.
pub async fn update_project<C: ConnectionTrait>(
    db: &C,
    project: projects::Model,
    input: UpdateProject,
) -> Result<projects::Model, DbErr> {
    let mut active: projects::ActiveModel = project.into();

    if let Some(title) = input.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(budget) = input.budget {
        active.budget = Set(budget);
    }
    if let Some(category) = input.category {
        active.category = Set(category);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

pub async fn set_project_status<C: ConnectionTrait>(
    db: &C,
    project: projects::Model,
    status: ProjectStatus,
) -> Result<projects::Model, DbErr> {
    let mut active: projects::ActiveModel = project.into();
    active.status = Set(status);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Number of projects a client has posted, optionally narrowed to one status.
pub async fn count_projects_for_client<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
    status: Option<ProjectStatus>,
) -> Result<u64, DbErr> {
    let mut query = projects::Entity::find().filter(projects::Column::ClientId.eq(client_id));

    if let Some(status) = status {
        query = query.filter(projects::Column::Status.eq(status));
    }

    query.count(db).await
}
