use sea_orm::*;
use uuid::Uuid;

use crate::models::users::{self, AccountChanges, NewAccount, Roles};

/// Return the account behind a verified token, creating it the first time.
///
/// Two first requests can race on the insert; the loser re-reads the row.
pub async fn find_or_create_account<C: ConnectionTrait>(
    db: &C,
    input: NewAccount,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let id = input.id;
    let account = users::ActiveModel {
        id: Set(id),
        email: Set(input.email),
        username: Set(None),
        display_name: Set(input.display_name),
        avatar_url: Set(input.avatar_url),
        auth_provider: Set(input.auth_provider),
        // New accounts are clients until they pick a role.
        role: Set(Roles::Client),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    match account.insert(db).await {
        Ok(created) => Ok(created),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            users::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or(err)
        }
        Err(err) => Err(err),
    }
}

/// Users holding `role`, oldest first (1-based `page`).
pub async fn get_users_by_role_paginated<C: ConnectionTrait>(
    db: &C,
    role: Roles,
    page: u64,
    limit: u64,
) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Role.eq(role))
        .order_by_asc(users::Column::CreatedAt)
        .order_by_asc(users::Column::Id)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await
}

pub async fn get_user_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Apply `changes` to an account. `None` when the account does not exist.
pub async fn update_account<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: AccountChanges,
) -> Result<Option<users::Model>, DbErr> {
    let Some(user) = users::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: users::ActiveModel = user.into();
    if let Some(username) = changes.username {
        active.username = Set(Some(username));
    }
    if let Some(role) = changes.role {
        active.role = Set(role);
    }
    if let Some(display_name) = changes.display_name {
        active.display_name = Set(Some(display_name));
    }
    if let Some(avatar_url) = changes.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await.map(Some)
}

pub async fn delete_user<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    users::Entity::delete_by_id(id).exec(db).await
}
