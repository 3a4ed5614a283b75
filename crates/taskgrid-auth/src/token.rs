//! Session token codec — issuance and validation of signed, expiring
//! bearer tokens.
//!
//! Wire format: `base64url(payload).base64url(signature)`, no padding.
//! The payload is the [`Identity`] serialized as JSON in its declared
//! field order; the signature is HMAC-SHA256 over the exact payload
//! bytes with the process-wide secret.
//!
//! Verification is stateless — no session store, no database lookup —
//! which is why the server cannot revoke a live token before expiry;
//! logout is client-side discard.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use taskgrid_core::models::user::Role;
use uuid::Uuid;

use crate::error::AuthError;
use crate::identity::Identity;

type HmacSha256 = Hmac<Sha256>;

/// Issues and validates session tokens with an injected secret.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AuthError::Crypto(format!("bad signing key: {e}")))
    }

    /// Serialize and sign an identity into a compact token.
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let payload = serde_json::to_vec(identity)
            .map_err(|e| AuthError::Crypto(format!("payload encode: {e}")))?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Convenience: build an identity valid from now for `ttl` and
    /// sign it.
    pub fn issue_for(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        role: Role,
        ttl: Duration,
    ) -> Result<(Identity, String), AuthError> {
        let identity = Identity::issue_now(user_id, tenant_id, role, ttl);
        let token = self.issue(&identity)?;
        Ok((identity, token))
    }

    /// Validate a token and return the decoded identity.
    ///
    /// The signature is checked before anything inside the payload is
    /// trusted, so a forged expiry reports `TamperedToken`, never
    /// `ExpiredToken`. Error kinds:
    /// - `MalformedToken`: not two base64url segments, or the signed
    ///   payload does not decode to an identity
    /// - `TamperedToken`: signature mismatch
    /// - `ExpiredToken`: `now >= expires_at`
    pub fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        let (payload_b64, signature_b64) = token.split_once('.').ok_or(AuthError::MalformedToken)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::MalformedToken)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::MalformedToken)?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        // Constant-time comparison via the Mac trait.
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::TamperedToken)?;

        let identity: Identity =
            serde_json::from_slice(&payload).map_err(|_| AuthError::MalformedToken)?;

        if identity.is_expired(Utc::now()) {
            return Err(AuthError::ExpiredToken);
        }

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret-key".as_bytes().to_vec())
    }

    fn identity(ttl_secs: i64) -> Identity {
        Identity::issue_now(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Role::TenantAdmin,
            Duration::seconds(ttl_secs),
        )
    }

    #[test]
    fn roundtrip_preserves_identity() {
        let codec = codec();
        let id = identity(3600);
        let token = codec.issue(&id).unwrap();
        let decoded = codec.validate(&token).unwrap();
        assert_eq!(decoded.user_id, id.user_id);
        assert_eq!(decoded.tenant_id, id.tenant_id);
        assert_eq!(decoded.role, id.role);
    }

    #[test]
    fn token_is_two_base64url_segments() {
        let token = codec().issue(&identity(3600)).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 2);
        for part in parts {
            assert!(
                part.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            );
        }
    }

    #[test]
    fn flipping_any_signature_byte_is_tampered() {
        let codec = codec();
        let token = codec.issue(&identity(3600)).unwrap();
        let dot = token.find('.').unwrap();
        let sig = URL_SAFE_NO_PAD.decode(&token[dot + 1..]).unwrap();

        for i in 0..sig.len() {
            let mut mutated = sig.clone();
            mutated[i] ^= 0x01;
            let forged = format!("{}.{}", &token[..dot], URL_SAFE_NO_PAD.encode(&mutated));
            assert!(matches!(
                codec.validate(&forged),
                Err(AuthError::TamperedToken)
            ));
        }
    }

    #[test]
    fn altered_payload_is_tampered() {
        let codec = codec();
        let id = identity(3600);
        let token = codec.issue(&id).unwrap();
        let dot = token.find('.').unwrap();

        // Re-encode a payload with a different role but keep the
        // original signature.
        let mut forged_id = id.clone();
        forged_id.role = Role::SuperAdmin;
        let forged_payload = serde_json::to_vec(&forged_id).unwrap();
        let forged = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&forged_payload),
            &token[dot + 1..]
        );
        assert!(matches!(
            codec.validate(&forged),
            Err(AuthError::TamperedToken)
        ));
    }

    #[test]
    fn zero_ttl_token_is_expired() {
        let codec = codec();
        let token = codec.issue(&identity(0)).unwrap();
        assert!(matches!(
            codec.validate(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn missing_separator_is_malformed() {
        assert!(matches!(
            codec().validate("nodothere"),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn invalid_base64_is_malformed() {
        assert!(matches!(
            codec().validate("ab$cd.efgh"),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn signed_garbage_payload_is_malformed() {
        // A correctly signed payload that is not an identity must be
        // rejected as malformed, not accepted.
        let codec = codec();
        let payload = b"{\"not\":\"an identity\"}";
        let mut mac = HmacSha256::new_from_slice(b"test-secret-key").unwrap();
        mac.update(payload);
        let token = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
        );
        assert!(matches!(
            codec.validate(&token),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn token_from_other_secret_is_tampered() {
        let token = TokenCodec::new(b"secret-a".to_vec())
            .issue(&identity(3600))
            .unwrap();
        assert!(matches!(
            TokenCodec::new(b"secret-b".to_vec()).validate(&token),
            Err(AuthError::TamperedToken)
        ));
    }

    #[test]
    fn distinct_secrets_produce_distinct_signatures() {
        let id = identity(3600);
        let t1 = TokenCodec::new(b"secret-a".to_vec()).issue(&id).unwrap();
        let t2 = TokenCodec::new(b"secret-b".to_vec()).issue(&id).unwrap();
        assert_ne!(t1, t2);
    }
}
