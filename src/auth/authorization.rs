use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::users::{self, Roles};

/// Admins pass every role check.
pub fn require_role(user: &users::Model, role: Roles) -> Result<(), ServiceError> {
    if user.role == role || user.role == Roles::Admin {
        return Ok(());
    }
    Err(ServiceError::Authorization(format!(
        "This action requires the {} role",
        role.as_str()
    )))
}

pub fn require_self(user: &users::Model, target_id: Uuid, what: &str) -> Result<(), ServiceError> {
    if user.id != target_id {
        return Err(ServiceError::Authorization(format!(
            "You can only access your own {what}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Roles) -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            username: None,
            display_name: None,
            avatar_url: None,
            auth_provider: "google".into(),
            role,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn role_must_match_unless_admin() {
        assert!(require_role(&user(Roles::Freelancer), Roles::Freelancer).is_ok());
        assert!(require_role(&user(Roles::Admin), Roles::Freelancer).is_ok());

        let err = require_role(&user(Roles::Client), Roles::Freelancer).unwrap_err();
        assert!(matches!(err, ServiceError::Authorization(_)));
        assert!(err.to_string().contains("freelancer"));
    }

    #[test]
    fn self_check_compares_ids() {
        let me = user(Roles::Freelancer);
        assert!(require_self(&me, me.id, "bids").is_ok());
        assert!(require_self(&me, Uuid::new_v4(), "bids").is_err());
    }
}
