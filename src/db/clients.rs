use sea_orm::*;
use uuid::Uuid;

use crate::models::clients::{self, CreateClientProfile, UpdateClientProfile};

/// Insert a client profile for an existing user account.
pub async fn insert_client<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    email: String,
    input: CreateClientProfile,
) -> Result<clients::Model, DbErr> {
    let new_client = clients::ActiveModel {
        id: Set(user_id),
        email: Set(email),
        company_name: Set(input.company_name),
        bio: Set(input.bio),
        location: Set(input.location),
        website: Set(input.website),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_client.insert(db).await
}

/// Fetch a client profile by account email.
pub async fn get_client_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<clients::Model>, DbErr> {
    clients::Entity::find()
        .filter(clients::Column::Email.eq(email))
        .one(db)
        .await
}

pub async fn get_client_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<clients::Model>, DbErr> {
    clients::Entity::find_by_id(id).one(db).await
}

/// Fetch client profiles page by page (1-based `page`).
pub async fn get_clients_paginated<C: ConnectionTrait>(
    db: &C,
    page: u64,
    limit: u64,
) -> Result<Vec<clients::Model>, DbErr> {
    clients::Entity::find()
        .order_by_asc(clients::Column::CreatedAt)
        .order_by_asc(clients::Column::Id)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await
}

/// Update a client profile. Only fields present in `input` change.
pub async fn update_client<C: ConnectionTrait>(
    db: &C,
    client: clients::Model,
    input: UpdateClientProfile,
) -> Result<clients::Model, DbErr> {
    let mut active: clients::ActiveModel = client.into();

    if let Some(company_name) = input.company_name {
        active.company_name = Set(Some(company_name));
    }
    if let Some(bio) = input.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(location) = input.location {
        active.location = Set(Some(location));
    }
    if let Some(website) = input.website {
        active.website = Set(Some(website));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a client profile by ID.
pub async fn delete_client<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    clients::Entity::delete_by_id(id).exec(db).await
}
