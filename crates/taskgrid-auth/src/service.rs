//! Identity resolution — login and token-based authentication.

use chrono::Duration;
use taskgrid_core::error::CoreError;
use taskgrid_core::models::tenant::{CreateTenant, Tenant};
use taskgrid_core::models::user::{CreateUser, Role, User};
use taskgrid_core::repository::{TenantRepository, UserRepository};
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::identity::Identity;
use crate::password;
use crate::token::TokenCodec;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    /// Tenant subdomain the request arrived on.
    pub subdomain: String,
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed session token.
    pub token: String,
    /// The identity snapshot the token encodes.
    pub identity: Identity,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Input for tenant registration.
#[derive(Debug)]
pub struct RegisterTenantInput {
    pub tenant_name: String,
    pub subdomain: String,
    pub admin_email: String,
    pub admin_full_name: String,
    pub admin_password: String,
}

/// Successful registration: the new tenant and its first admin.
#[derive(Debug)]
pub struct RegisterTenantOutput {
    pub tenant: Tenant,
    pub admin: User,
}

/// Authentication service.
///
/// Generic over repository implementations so that this crate has no
/// dependency on any storage engine. Both resolution paths are pure
/// functions of their inputs plus the repositories; nothing here
/// retries a failed credential check.
pub struct AuthService<T: TenantRepository, U: UserRepository> {
    tenants: T,
    users: U,
    codec: TokenCodec,
    config: AuthConfig,
}

impl<T: TenantRepository, U: UserRepository> AuthService<T, U> {
    pub fn new(tenants: T, users: U, config: AuthConfig) -> Self {
        let codec = TokenCodec::new(config.token_secret.clone().into_bytes());
        Self {
            tenants,
            users,
            codec,
            config,
        }
    }

    /// The codec this service signs tokens with (shared with the
    /// request gate).
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Create a tenant together with its first `tenant_admin` user.
    pub async fn register_tenant(
        &self,
        input: RegisterTenantInput,
    ) -> Result<RegisterTenantOutput, AuthError> {
        if input.admin_password.len() < self.config.min_password_length {
            return Err(AuthError::Validation(format!(
                "password must be at least {} characters",
                self.config.min_password_length
            )));
        }

        let password_hash =
            password::hash_password(&input.admin_password, self.config.pepper.as_deref())?;

        let tenant = match self
            .tenants
            .create(CreateTenant {
                name: input.tenant_name,
                subdomain: input.subdomain,
                subscription_plan: None,
            })
            .await
        {
            Ok(t) => t,
            Err(CoreError::AlreadyExists { .. }) => {
                return Err(AuthError::Validation("subdomain is already taken".into()));
            }
            Err(e) => return Err(AuthError::BackendUnavailable(e.to_string())),
        };

        let admin = match self
            .users
            .create(CreateUser {
                tenant_id: tenant.id,
                email: input.admin_email,
                full_name: input.admin_full_name,
                password_hash,
                role: Role::TenantAdmin,
            })
            .await
        {
            Ok(u) => u,
            Err(e) => {
                // The two inserts are not atomic; roll the tenant back
                // rather than strand it without an admin.
                if let Err(rollback) = self.tenants.delete(tenant.id).await {
                    warn!(tenant_id = %tenant.id, error = %rollback, "tenant rollback failed");
                }
                return Err(AuthError::BackendUnavailable(e.to_string()));
            }
        };

        info!(tenant_id = %tenant.id, admin_id = %admin.id, "tenant registered");

        Ok(RegisterTenantOutput { tenant, admin })
    }

    /// Resolve an identity from raw credentials and issue a token.
    ///
    /// "No such user" and "wrong password" are deliberately collapsed
    /// into `InvalidCredentials` so responses cannot be used to
    /// enumerate accounts. Transient storage failures surface as
    /// `BackendUnavailable` — "could not check" is distinct from
    /// "rejected".
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutput, AuthError> {
        // 1. Resolve the tenant from the subdomain.
        let tenant = match self.tenants.get_by_subdomain(&input.subdomain).await {
            Ok(t) => t,
            Err(CoreError::NotFound { .. }) => return Err(AuthError::TenantNotFound),
            Err(e) => return Err(AuthError::BackendUnavailable(e.to_string())),
        };

        // 2. Look up the user within that tenant.
        let user = match self.users.get_by_email(tenant.id, &input.email).await {
            Ok(u) => u,
            Err(CoreError::NotFound { .. }) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(AuthError::BackendUnavailable(e.to_string())),
        };

        // 3. Inactive accounts cannot authenticate.
        if !user.is_active {
            return Err(AuthError::AccountInactive);
        }

        // 4. Verify the password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        // 5. Snapshot the identity and sign it. The tenant id comes
        //    from the stored user row, never from the request.
        let ttl = Duration::seconds(self.config.token_ttl_secs as i64);
        let (identity, token) = self.codec.issue_for(user.id, user.tenant_id, user.role, ttl)?;

        info!(user_id = %user.id, tenant_id = %user.tenant_id, "login succeeded");

        Ok(LoginOutput {
            token,
            identity,
            expires_in: self.config.token_ttl_secs,
        })
    }

    /// Resolve an identity from a raw token.
    ///
    /// Pure computation — signature check and expiry only, no storage
    /// round trip.
    pub fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        self.codec.validate(token)
    }

    /// Fetch the user record behind an authenticated identity,
    /// scoped to the identity's own tenant.
    pub async fn current_user(&self, identity: &Identity) -> Result<User, AuthError> {
        match self
            .users
            .get_by_id(identity.tenant_id, identity.user_id)
            .await
        {
            Ok(u) => Ok(u),
            // A valid token whose account has since been removed.
            Err(CoreError::NotFound { .. }) => Err(AuthError::InvalidCredentials),
            Err(e) => Err(AuthError::BackendUnavailable(e.to_string())),
        }
    }
}
