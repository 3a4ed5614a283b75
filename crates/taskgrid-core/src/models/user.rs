//! User domain model and the role hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user, ordered by capability.
///
/// The derived order is `User < TenantAdmin < SuperAdmin`, which is
/// what [`Role::meets_minimum`] relies on. `SuperAdmin` is its own
/// capability class: it is required for global operations but does
/// NOT implicitly grant access to another tenant's scoped resources.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    TenantAdmin,
    SuperAdmin,
}

impl Role {
    /// Whether this role satisfies an operation's minimum role.
    pub fn meets_minimum(self, required: Role) -> bool {
        self >= required
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::TenantAdmin => f.write_str("tenant_admin"),
            Role::SuperAdmin => f.write_str("super_admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Owning tenant. Immutable after creation.
    pub tenant_id: Uuid,
    /// Unique within the tenant (the same address may exist in
    /// different tenants).
    pub email: String,
    pub full_name: String,
    /// Argon2id PHC-format hash. Never the plaintext.
    pub password_hash: String,
    pub role: Role,
    /// Inactive users cannot authenticate. Removal of a member is a
    /// soft-delete that clears this flag.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new user.
///
/// Carries the already-computed password hash; hashing plaintext is
/// the auth layer's job, never the store's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub tenant_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
}

/// Fields that can be updated on an existing user.
///
/// `tenant_id` is deliberately absent: a user's tenant is immutable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}
