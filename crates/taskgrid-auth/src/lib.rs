//! Taskgrid Auth — tenant-scoped authentication and authorization
//! core: password verification, session token issuance/validation,
//! identity resolution, and the policy every protected operation is
//! checked against.
//!
//! This crate is decoupled from HTTP and storage; it talks to
//! persistence only through the `taskgrid-core` repository traits.

pub mod config;
pub mod error;
pub mod gate;
pub mod identity;
pub mod password;
pub mod policy;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use gate::RequestGate;
pub use identity::Identity;
pub use policy::{Operation, authorize};
pub use service::{AuthService, LoginInput, LoginOutput, RegisterTenantInput, RegisterTenantOutput};
pub use token::TokenCodec;
