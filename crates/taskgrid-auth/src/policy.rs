//! Authorization policy — pure ALLOW/DENY decisions.
//!
//! [`authorize`] is a pure function of `(identity, operation)`: no IO,
//! no hidden state, same inputs always give the same decision. The
//! tenant id inside an operation must come from the stored resource
//! row (or the resolved identity), never from client-supplied request
//! structure — callers that build a [`Operation::TenantScoped`] from a
//! request body defeat the isolation guarantee.

use taskgrid_core::models::user::Role;
use uuid::Uuid;

use crate::error::AuthError;
use crate::identity::Identity;

/// A requested operation, classified by its authorization shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Permitted only when the caller targets their own user record.
    SelfOnly { target_user_id: Uuid },
    /// Requires the caller's tenant to match the resource's owning
    /// tenant and the caller's role to meet `min_role`.
    TenantScoped {
        resource_tenant_id: Uuid,
        min_role: Role,
    },
    /// Member removal: tenant-scoped, admin-only, and never against
    /// the caller's own account.
    RemoveMember {
        resource_tenant_id: Uuid,
        target_user_id: Uuid,
    },
    /// Cross-tenant administration; super-admin only.
    GlobalAdmin,
}

impl Operation {
    pub fn read_own_profile(target_user_id: Uuid) -> Self {
        Self::SelfOnly { target_user_id }
    }

    pub fn update_own_profile(target_user_id: Uuid) -> Self {
        Self::SelfOnly { target_user_id }
    }

    pub fn list_projects(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::User,
        }
    }

    pub fn create_project(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::TenantAdmin,
        }
    }

    pub fn update_project(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::TenantAdmin,
        }
    }

    pub fn delete_project(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::TenantAdmin,
        }
    }

    pub fn create_task(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::User,
        }
    }

    pub fn list_tasks(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::User,
        }
    }

    pub fn update_task(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::User,
        }
    }

    pub fn view_tenant(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::User,
        }
    }

    pub fn update_tenant(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::TenantAdmin,
        }
    }

    pub fn add_member(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::TenantAdmin,
        }
    }

    pub fn list_members(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::User,
        }
    }

    pub fn update_member(resource_tenant_id: Uuid) -> Self {
        Self::TenantScoped {
            resource_tenant_id,
            min_role: Role::TenantAdmin,
        }
    }

    pub fn remove_member(resource_tenant_id: Uuid, target_user_id: Uuid) -> Self {
        Self::RemoveMember {
            resource_tenant_id,
            target_user_id,
        }
    }

    pub fn list_tenants() -> Self {
        Self::GlobalAdmin
    }
}

/// Decide whether `identity` may perform `operation`.
///
/// Tenant mismatch denies every role, including super-admins: a
/// super-admin crossing tenants must do so through an explicit
/// [`Operation::GlobalAdmin`] operation, never by piggybacking on a
/// tenant-scoped one.
pub fn authorize(identity: &Identity, operation: &Operation) -> Result<(), AuthError> {
    match operation {
        Operation::SelfOnly { target_user_id } => {
            if *target_user_id == identity.user_id {
                Ok(())
            } else {
                Err(AuthError::NotSelf)
            }
        }
        Operation::TenantScoped {
            resource_tenant_id,
            min_role,
        } => {
            if identity.tenant_id != *resource_tenant_id {
                Err(AuthError::WrongTenant)
            } else if !identity.role.meets_minimum(*min_role) {
                Err(AuthError::InsufficientRole)
            } else {
                Ok(())
            }
        }
        Operation::RemoveMember {
            resource_tenant_id,
            target_user_id,
        } => {
            if identity.tenant_id != *resource_tenant_id {
                Err(AuthError::WrongTenant)
            } else if *target_user_id == identity.user_id {
                Err(AuthError::CannotSelfRemove)
            } else if !identity.role.meets_minimum(Role::TenantAdmin) {
                Err(AuthError::InsufficientRole)
            } else {
                Ok(())
            }
        }
        Operation::GlobalAdmin => {
            if identity.role == Role::SuperAdmin {
                Ok(())
            } else {
                Err(AuthError::InsufficientRole)
            }
        }
    }
}
