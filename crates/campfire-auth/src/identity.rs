//! Resolved request identity

use campfire_db::{Role, User};
use serde::{Deserialize, Serialize};

/// The authenticated user attached to a request after the token has been
/// verified and resolved against the user store. Request-scoped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub nickname: String,
    pub role: Role,
}

impl AuthUser {
    /// Whether this identity may mutate a resource owned by `owner_id`
    pub fn can_mutate(&self, owner_id: i64) -> bool {
        self.id == owner_id || self.role.is_admin()
    }
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            nickname: user.nickname.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: Role) -> AuthUser {
        AuthUser {
            id,
            nickname: format!("user{}", id),
            role,
        }
    }

    #[test]
    fn owner_can_mutate() {
        assert!(user(1, Role::Standard).can_mutate(1));
    }

    #[test]
    fn non_owner_cannot_mutate() {
        assert!(!user(2, Role::Standard).can_mutate(1));
    }

    #[test]
    fn admin_can_mutate_anything() {
        assert!(user(9, Role::Admin).can_mutate(1));
    }
}
