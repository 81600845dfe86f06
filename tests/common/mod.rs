//! Shared fixtures for the service-level tests.
//!
//! Each test gets its own in-memory SQLite database, with the schema either
//! generated from the entities or built by the migrations. The pool is pinned
//! to one connection because every SQLite memory connection opens a separate
//! database.
#![allow(dead_code)]

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Schema, Set,
};
use uuid::Uuid;

use marketplace_backend::models::bids::{BidResponse, SubmitBid};
use marketplace_backend::models::projects::{self, CreateProject};
use marketplace_backend::models::users::{self, Roles};
use marketplace_backend::models::{bids, clients};
use marketplace_backend::services::{BidService, ClientService, ProjectService};

async fn connect_memory() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(opts)
        .await
        .expect("Failed to open in-memory SQLite")
}

/// Schema generated straight from the entities.
pub async fn setup_db() -> DatabaseConnection {
    let db = connect_memory().await;
    let schema = Schema::new(db.get_database_backend());

    // Parents before children; SQLite enforces the foreign keys.
    create_table(&db, schema.create_table_from_entity(users::Entity)).await;
    create_table(&db, schema.create_table_from_entity(projects::Entity)).await;
    create_table(&db, schema.create_table_from_entity(bids::Entity)).await;
    create_table(&db, schema.create_table_from_entity(clients::Entity)).await;

    db
}

/// Schema built by the production migrations, indexes included.
pub async fn setup_migrated_db() -> DatabaseConnection {
    let db = connect_memory().await;
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

async fn create_table(db: &DatabaseConnection, stmt: sea_orm::sea_query::TableCreateStatement) {
    let sql = db.get_database_backend().build(&stmt).sql;
    db.execute_unprepared(&sql)
        .await
        .expect("Failed to create table");
}

pub struct Fixture {
    pub db: DatabaseConnection,
    pub bids: BidService,
    pub projects: ProjectService,
    pub clients: ClientService,
}

pub async fn fixture() -> Fixture {
    Fixture::new(setup_db().await)
}

pub async fn migrated_fixture() -> Fixture {
    Fixture::new(setup_migrated_db().await)
}

impl Fixture {
    fn new(db: DatabaseConnection) -> Self {
        Self {
            bids: BidService::new(db.clone()),
            projects: ProjectService::new(db.clone()),
            clients: ClientService::new(db.clone()),
            db,
        }
    }

    pub async fn user(&self, role: Roles) -> Uuid {
        let id = Uuid::new_v4();
        users::ActiveModel {
            id: Set(id),
            email: Set(format!("{}-{id}@example.com", role.as_str())),
            username: Set(None),
            display_name: Set(None),
            avatar_url: Set(None),
            auth_provider: Set("google".to_string()),
            role: Set(role),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert user");
        id
    }

    pub async fn client(&self) -> Uuid {
        self.user(Roles::Client).await
    }

    pub async fn freelancer(&self) -> Uuid {
        self.user(Roles::Freelancer).await
    }

    pub async fn email_of(&self, user_id: Uuid) -> String {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .expect("query failed")
            .expect("user missing")
            .email
    }

    pub async fn project(&self, client_id: Uuid) -> Uuid {
        self.projects
            .create_project(
                client_id,
                CreateProject {
                    title: "Build a landing page".to_string(),
                    description: "Static site with a contact form".to_string(),
                    budget: 500,
                    category: None,
                },
            )
            .await
            .expect("Failed to create project")
            .id
    }

    pub async fn bid(&self, project_id: Uuid, freelancer_id: Uuid, amount: i64) -> BidResponse {
        self.bids
            .submit_bid(project_id, freelancer_id, submit(amount))
            .await
            .expect("Failed to submit bid")
    }

    pub async fn stored_bid(&self, bid_id: Uuid) -> bids::Model {
        bids::Entity::find_by_id(bid_id)
            .one(&self.db)
            .await
            .expect("query failed")
            .expect("bid missing")
    }

    pub async fn stored_project(&self, project_id: Uuid) -> projects::Model {
        projects::Entity::find_by_id(project_id)
            .one(&self.db)
            .await
            .expect("query failed")
            .expect("project missing")
    }
}

pub fn submit(amount: i64) -> SubmitBid {
    SubmitBid {
        amount,
        message: format!("I can do this for {amount}"),
        estimated_days: Some(7),
    }
}
