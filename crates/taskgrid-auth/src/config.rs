//! Authentication configuration.

/// Configuration for the authentication core.
///
/// The signing secret is injected here explicitly — it is never read
/// from ambient global state, so every test can run with its own
/// secret.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric secret for session token signatures (HMAC-SHA256).
    pub token_secret: String,
    /// Session token lifetime in seconds (default: 86_400 = 24 hours).
    pub token_ttl_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing
    /// and verification.
    pub pepper: Option<String>,
    /// Minimum password length enforced at registration.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            token_ttl_secs: 86_400,
            pepper: None,
            min_password_length: 8,
        }
    }
}
