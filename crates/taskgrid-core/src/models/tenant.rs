//! Tenant domain model.
//!
//! Tenants provide full data isolation: every user, project, and task
//! is scoped to exactly one tenant. Tenants are never hard-deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier a tenant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

/// An isolated organization-level partition of data.
///
/// The `subdomain` is globally unique and is how login requests select
/// the tenant to authenticate against (e.g. `acme.taskgrid.app`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// URL-safe globally unique identifier (e.g., `acme`).
    pub subdomain: String,
    pub subscription_plan: SubscriptionPlan,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub subdomain: String,
    pub subscription_plan: Option<SubscriptionPlan>,
}

/// Fields that can be updated on an existing tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub subscription_plan: Option<SubscriptionPlan>,
}
