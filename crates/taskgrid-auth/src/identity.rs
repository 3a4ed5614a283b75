//! The authenticated principal for the lifetime of one token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use taskgrid_core::models::user::Role;
use uuid::Uuid;

/// The resolved, authenticated principal for a request.
///
/// An `Identity` is a snapshot taken at token issuance: if the
/// underlying user's role or active status changes afterwards,
/// already-issued tokens remain valid until they expire (the
/// stale-authorization window of stateless tokens).
///
/// Field order is the wire order of the token payload — do not
/// reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: Role,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    /// Build an identity valid from `issued_at` for `ttl`.
    pub fn new(
        user_id: Uuid,
        tenant_id: Uuid,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            user_id,
            tenant_id,
            role,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// Build an identity valid from now for `ttl`.
    pub fn issue_now(user_id: Uuid, tenant_id: Uuid, role: Role, ttl: Duration) -> Self {
        Self::new(user_id, tenant_id, role, Utc::now(), ttl)
    }

    /// A token with `ttl = 0` is expired the moment it is checked.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ttl_is_immediately_expired() {
        let id = Identity::issue_now(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Role::User,
            Duration::seconds(0),
        );
        assert!(id.is_expired(Utc::now()));
    }

    #[test]
    fn payload_field_order_is_fixed() {
        let issued = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let id = Identity::new(
            Uuid::nil(),
            Uuid::nil(),
            Role::TenantAdmin,
            issued,
            Duration::hours(24),
        );
        let json = serde_json::to_string(&id).unwrap();
        let user_pos = json.find("user_id").unwrap();
        let tenant_pos = json.find("tenant_id").unwrap();
        let role_pos = json.find("role").unwrap();
        let iat_pos = json.find("issued_at").unwrap();
        let exp_pos = json.find("expires_at").unwrap();
        assert!(user_pos < tenant_pos && tenant_pos < role_pos);
        assert!(role_pos < iat_pos && iat_pos < exp_pos);
    }
}
