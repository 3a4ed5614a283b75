//! Request authentication gate — the single choke point every
//! protected operation passes through before business logic runs.
//!
//! Per request the gate moves through
//! `token extraction → token validation → identity resolution →
//! policy check`; the first failure short-circuits with no side
//! effects beyond a log entry. On success the caller receives the
//! [`Identity`], and all subsequent persistence access must take its
//! tenant id from there — never from client input.

use tracing::debug;

use crate::error::AuthError;
use crate::identity::Identity;
use crate::policy::{self, Operation};
use crate::token::TokenCodec;

/// Gate guarding protected operations.
#[derive(Clone)]
pub struct RequestGate {
    codec: TokenCodec,
}

impl RequestGate {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Extract the bearer token from an `Authorization` header value.
    ///
    /// Fails with `MissingToken` when no credential is present on a
    /// protected path, or when the header carries a scheme other than
    /// `Bearer` — `Basic` and friends are not credentials we accept.
    pub fn extract_token(header: Option<&str>) -> Result<&str, AuthError> {
        let raw = header.ok_or(AuthError::MissingToken)?;
        let token = match raw.strip_prefix("Bearer ") {
            Some(rest) => rest.trim(),
            // A bare token is fine; "scheme value" with another scheme
            // is not.
            None => {
                let bare = raw.trim();
                if bare.contains(' ') {
                    return Err(AuthError::MissingToken);
                }
                bare
            }
        };
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(token)
    }

    /// Extract and validate the credential, resolving the caller's
    /// identity. Stateless — no storage round trip.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let token = Self::extract_token(header)?;
        self.codec.validate(token)
    }

    /// Full admission check: authenticate the request and authorize
    /// the operation. Returns the identity for business logic to
    /// scope its reads and writes with.
    pub fn admit(&self, header: Option<&str>, operation: &Operation) -> Result<Identity, AuthError> {
        let identity = match self.authenticate(header) {
            Ok(id) => id,
            Err(err) => {
                debug!(error = %err, "request rejected during authentication");
                return Err(err);
            }
        };

        if let Err(err) = policy::authorize(&identity, operation) {
            debug!(
                error = %err,
                user_id = %identity.user_id,
                tenant_id = %identity.tenant_id,
                "request rejected during authorization"
            );
            return Err(err);
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use taskgrid_core::models::user::Role;
    use uuid::Uuid;

    use super::*;

    fn gate() -> RequestGate {
        RequestGate::new(TokenCodec::new(b"gate-test-secret".to_vec()))
    }

    fn issue(gate: &RequestGate, role: Role) -> (Identity, String) {
        gate.codec
            .issue_for(Uuid::new_v4(), Uuid::new_v4(), role, Duration::hours(1))
            .unwrap()
    }

    #[test]
    fn missing_header_is_missing_token() {
        let result = RequestGate::extract_token(None);
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[test]
    fn empty_bearer_is_missing_token() {
        let result = RequestGate::extract_token(Some("Bearer "));
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        assert_eq!(RequestGate::extract_token(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(RequestGate::extract_token(Some("abc")).unwrap(), "abc");
    }

    #[test]
    fn non_bearer_scheme_is_missing_token() {
        let result = RequestGate::extract_token(Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(result, Err(AuthError::MissingToken)));

        let result = RequestGate::extract_token(Some("Digest a=\"b\", c=\"d\""));
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[test]
    fn admit_allows_authorized_request() {
        let gate = gate();
        let (identity, token) = issue(&gate, Role::TenantAdmin);
        let header = format!("Bearer {token}");
        let op = Operation::create_project(identity.tenant_id);

        let admitted = gate.admit(Some(&header), &op).unwrap();
        assert_eq!(admitted.user_id, identity.user_id);
        assert_eq!(admitted.tenant_id, identity.tenant_id);
    }

    #[test]
    fn admit_rejects_wrong_tenant() {
        let gate = gate();
        let (_identity, token) = issue(&gate, Role::TenantAdmin);
        let header = format!("Bearer {token}");
        let op = Operation::create_project(Uuid::new_v4());

        let result = gate.admit(Some(&header), &op);
        assert!(matches!(result, Err(AuthError::WrongTenant)));
    }

    #[test]
    fn admit_rejects_garbage_token() {
        let gate = gate();
        let op = Operation::list_tenants();
        let result = gate.admit(Some("Bearer not-a-token"), &op);
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }
}
