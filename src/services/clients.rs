use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::bids as bid_db;
use crate::db::clients as client_db;
use crate::db::projects as project_db;
use crate::error::{ServiceError, ServiceResult};
use crate::models::bids::BidStatus;
use crate::models::clients::{
    self, ClientProfileResponse, ClientProfileWithStats, ClientStats, CreateClientProfile,
    UpdateClientProfile, validate_website,
};
use crate::models::projects::ProjectStatus;

/// Client profiles, looked up by account email.
#[derive(Clone)]
pub struct ClientService {
    db: DatabaseConnection,
}

impl ClientService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_profile(
        &self,
        user_id: Uuid,
        email: &str,
        request: CreateClientProfile,
    ) -> ServiceResult<ClientProfileResponse> {
        validate_website(request.website.as_deref()).map_err(ServiceError::Validation)?;

        let email = normalize_email(email);
        if client_db::get_client_by_id(&self.db, user_id).await?.is_some()
            || client_db::get_client_by_email(&self.db, &email).await?.is_some()
        {
            return Err(ServiceError::Conflict(
                "A client profile already exists for this account".to_string(),
            ));
        }

        let client = client_db::insert_client(&self.db, user_id, email, request)
            .await
            .map_err(|e| {
                ServiceError::from_write(e, "A client profile already exists for this account")
            })?;

        tracing::info!(client_id = %client.id, "Client profile created");
        Ok(client.into())
    }

    pub async fn get_profile(&self, email: &str) -> ServiceResult<ClientProfileResponse> {
        Ok(self.find(email).await?.into())
    }

    pub async fn get_stats(&self, email: &str) -> ServiceResult<ClientStats> {
        let client = self.find(email).await?;
        self.stats_for(client.id).await
    }

    pub async fn get_profile_with_stats(&self, email: &str) -> ServiceResult<ClientProfileWithStats> {
        let client = self.find(email).await?;
        let stats = self.stats_for(client.id).await?;
        Ok(ClientProfileWithStats {
            profile: client.into(),
            stats,
        })
    }

    pub async fn list_profiles(&self, page: u64, limit: u64) -> ServiceResult<Vec<ClientProfileResponse>> {
        let clients = client_db::get_clients_paginated(&self.db, page, limit).await?;
        Ok(clients.into_iter().map(ClientProfileResponse::from).collect())
    }

    pub async fn update_profile(
        &self,
        email: &str,
        caller_id: Uuid,
        request: UpdateClientProfile,
    ) -> ServiceResult<ClientProfileResponse> {
        let client = self.find(email).await?;
        ensure_owner(&client, caller_id, "update")?;
        validate_website(request.website.as_deref()).map_err(ServiceError::Validation)?;

        let updated = client_db::update_client(&self.db, client, request).await?;
        Ok(updated.into())
    }

    pub async fn delete_profile(&self, email: &str, caller_id: Uuid) -> ServiceResult<()> {
        let client = self.find(email).await?;
        ensure_owner(&client, caller_id, "delete")?;

        let result = client_db::delete_client(&self.db, client.id).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Client", email));
        }

        tracing::info!(client_id = %client.id, "Client profile deleted");
        Ok(())
    }

    async fn find(&self, email: &str) -> ServiceResult<clients::Model> {
        let email = normalize_email(email);
        client_db::get_client_by_email(&self.db, &email)
            .await?
            .ok_or_else(|| ServiceError::not_found("Client", &email))
    }

    /// Stats are derived from projects and bids on every call.
    async fn stats_for(&self, client_id: Uuid) -> ServiceResult<ClientStats> {
        Ok(ClientStats {
            projects_posted: project_db::count_projects_for_client(&self.db, client_id, None)
                .await?,
            open_projects: project_db::count_projects_for_client(
                &self.db,
                client_id,
                Some(ProjectStatus::Open),
            )
            .await?,
            bids_received: bid_db::count_bids_for_client(&self.db, client_id, None).await?,
            hires_made: bid_db::count_bids_for_client(
                &self.db,
                client_id,
                Some(BidStatus::Accepted),
            )
            .await?,
        })
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn ensure_owner(client: &clients::Model, caller_id: Uuid, action: &str) -> ServiceResult<()> {
    if client.id != caller_id {
        return Err(ServiceError::Authorization(format!(
            "You can only {action} your own client profile"
        )));
    }
    Ok(())
}
