//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter on every read so that data
//! isolation is enforced at the contract level — an implementation
//! must never return a row belonging to another tenant.

use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::{
    project::{CreateProject, Project, UpdateProject},
    task::{CreateTask, Task, UpdateTask},
    tenant::{CreateTenant, Tenant, UpdateTenant},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenant (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = CoreResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<Tenant>> + Send;
    /// Lookup by the globally unique subdomain (login entry point).
    fn get_by_subdomain(&self, subdomain: &str)
    -> impl Future<Output = CoreResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = CoreResult<Tenant>> + Send;
    /// Remove a tenant and everything scoped to it.
    fn delete(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    /// All tenants — reserved for global-admin operations.
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CoreResult<PaginatedResult<Tenant>>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = CoreResult<User>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CoreResult<User>> + Send;
    fn get_by_email(
        &self,
        tenant_id: Uuid,
        email: &str,
    ) -> impl Future<Output = CoreResult<User>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = CoreResult<User>> + Send;
    /// Soft-delete: marks the user inactive.
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CoreResult<PaginatedResult<User>>> + Send;
}

pub trait ProjectRepository: Send + Sync {
    fn create(&self, input: CreateProject) -> impl Future<Output = CoreResult<Project>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CoreResult<Project>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateProject,
    ) -> impl Future<Output = CoreResult<Project>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CoreResult<PaginatedResult<Project>>> + Send;
}

pub trait TaskRepository: Send + Sync {
    fn create(&self, input: CreateTask) -> impl Future<Output = CoreResult<Task>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CoreResult<Task>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateTask,
    ) -> impl Future<Output = CoreResult<Task>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
    fn list_by_project(
        &self,
        tenant_id: Uuid,
        project_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CoreResult<PaginatedResult<Task>>> + Send;
}
