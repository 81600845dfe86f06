use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Upper bound on the cover letter attached to a bid.
pub const MAX_MESSAGE_LEN: usize = 5000;

/// Bid status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

impl BidStatus {
    /// Only a submitted bid can move, and it can only move to a terminal state.
    pub fn can_transition_to(self, next: BidStatus) -> bool {
        matches!(
            (self, next),
            (
                BidStatus::Submitted,
                BidStatus::Accepted | BidStatus::Rejected | BidStatus::Withdrawn
            )
        )
    }

    pub fn is_terminal(self) -> bool {
        self != BidStatus::Submitted
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BidStatus::Submitted => "submitted",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
            BidStatus::Withdrawn => "withdrawn",
        }
    }
}

/// SeaORM entity for the `bids` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub freelancer_id: Uuid,
    /// Amount in minor currency units.
    pub amount: i64,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub estimated_days: Option<i32>,
    pub status: BidStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FreelancerId",
        to = "super::users::Column::Id"
    )]
    Freelancer,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Freelancer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for submitting a bid. The project comes from the path and the
/// freelancer from the authenticated identity.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitBid {
    pub amount: i64,
    pub message: String,
    pub estimated_days: Option<i32>,
}

/// Partial edit of a still-open bid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBid {
    pub amount: Option<i64>,
    pub message: Option<String>,
    pub estimated_days: Option<i32>,
}

/// Checks shared by submit and update. Returns the first problem found.
pub fn validate_terms(
    amount: Option<i64>,
    message: Option<&str>,
    estimated_days: Option<i32>,
) -> Result<(), String> {
    if let Some(amount) = amount {
        if amount <= 0 {
            return Err("Bid amount must be greater than zero".to_string());
        }
    }
    if let Some(message) = message {
        if message.trim().is_empty() {
            return Err("Bid message cannot be empty".to_string());
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(format!(
                "Bid message cannot exceed {MAX_MESSAGE_LEN} characters"
            ));
        }
    }
    if let Some(days) = estimated_days {
        if days <= 0 {
            return Err("Estimated days must be a positive number".to_string());
        }
    }
    Ok(())
}

impl SubmitBid {
    pub fn validate(&self) -> Result<(), String> {
        validate_terms(
            Some(self.amount),
            Some(&self.message),
            self.estimated_days,
        )
    }
}

impl UpdateBid {
    pub fn validate(&self) -> Result<(), String> {
        if self.amount.is_none() && self.message.is_none() && self.estimated_days.is_none() {
            return Err("Nothing to update".to_string());
        }
        validate_terms(self.amount, self.message.as_deref(), self.estimated_days)
    }
}

/// The projection returned to callers for every bid operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub freelancer_id: Uuid,
    pub amount: i64,
    pub message: String,
    pub estimated_days: Option<i32>,
    pub status: BidStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl From<Model> for BidResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            project_id: m.project_id,
            freelancer_id: m.freelancer_id,
            amount: m.amount,
            message: m.message,
            estimated_days: m.estimated_days,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
