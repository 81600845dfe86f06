use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `projects` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Budget in minor currency units.
    pub budget: i64,
    pub category: Categories,
    pub status: ProjectStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Categories {
    #[sea_orm(string_value = "web_development")]
    WebDevelopment,
    #[sea_orm(string_value = "mobile_development")]
    MobileDevelopment,
    #[sea_orm(string_value = "data_science")]
    DataScience,
    #[sea_orm(string_value = "design")]
    Design,
    #[sea_orm(string_value = "video_editing")]
    VideoEditing,
    #[sea_orm(string_value = "content_writing")]
    ContentWriting,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Only `Open` projects take new bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl ProjectStatus {
    /// `Open -> InProgress` happens when a bid is accepted; `Open -> Cancelled`
    /// and `InProgress -> Completed` are driven by the owning client.
    pub fn can_transition_to(self, next: ProjectStatus) -> bool {
        matches!(
            (self, next),
            (ProjectStatus::Open, ProjectStatus::InProgress)
                | (ProjectStatus::Open, ProjectStatus::Cancelled)
                | (ProjectStatus::InProgress, ProjectStatus::Completed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Open => "open",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub budget: i64,
    pub category: Option<Categories>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<i64>,
    pub category: Option<Categories>,
}

fn validate_fields(
    title: Option<&str>,
    description: Option<&str>,
    budget: Option<i64>,
) -> Result<(), String> {
    if title.is_some_and(|t| t.trim().is_empty()) {
        return Err("Project title cannot be empty".to_string());
    }
    if title.is_some_and(|t| t.chars().count() > 200) {
        return Err("Project title cannot exceed 200 characters".to_string());
    }
    if description.is_some_and(|d| d.trim().is_empty()) {
        return Err("Project description cannot be empty".to_string());
    }
    if budget.is_some_and(|b| b <= 0) {
        return Err("Project budget must be greater than zero".to_string());
    }
    Ok(())
}

impl CreateProject {
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(Some(&self.title), Some(&self.description), Some(self.budget))
    }
}

impl UpdateProject {
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(
            self.title.as_deref(),
            self.description.as_deref(),
            self.budget,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_title_and_positive_budget() {
        let ok = CreateProject {
            title: "Landing page".into(),
            description: "Build a landing page".into(),
            budget: 50_000,
            category: None,
        };
        assert!(ok.validate().is_ok());

        let untitled = CreateProject { title: " ".into(), ..ok.clone() };
        assert!(untitled.validate().is_err());

        let free = CreateProject { budget: 0, ..ok };
        assert!(free.validate().unwrap_err().contains("budget"));
    }

    #[test]
    fn project_lifecycle() {
        assert!(ProjectStatus::Open.can_transition_to(ProjectStatus::InProgress));
        assert!(ProjectStatus::Open.can_transition_to(ProjectStatus::Cancelled));
        assert!(ProjectStatus::InProgress.can_transition_to(ProjectStatus::Completed));
        assert!(!ProjectStatus::InProgress.can_transition_to(ProjectStatus::Cancelled));
        assert!(!ProjectStatus::Completed.can_transition_to(ProjectStatus::Open));
        assert!(!ProjectStatus::Cancelled.can_transition_to(ProjectStatus::Open));
    }

    #[test]
    fn update_only_checks_present_fields() {
        assert!(UpdateProject::default().validate().is_ok());
        let bad = UpdateProject {
            budget: Some(-1),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
