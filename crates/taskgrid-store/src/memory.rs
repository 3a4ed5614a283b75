//! In-memory repository implementation backed by `parking_lot` maps.
//!
//! Locks are never held across an await point; every method acquires,
//! mutates, and releases within one synchronous section.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use taskgrid_core::error::{CoreError, CoreResult};
use taskgrid_core::models::project::{CreateProject, Project, UpdateProject};
use taskgrid_core::models::task::{CreateTask, Task, UpdateTask};
use taskgrid_core::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use taskgrid_core::models::user::{CreateUser, UpdateUser, User};
use taskgrid_core::repository::{
    PaginatedResult, Pagination, ProjectRepository, TaskRepository, TenantRepository,
    UserRepository,
};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    tenants: HashMap<Uuid, Tenant>,
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
}

/// Shared in-memory store implementing all repository traits.
///
/// Cloning is cheap; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(entity: &str, id: impl ToString) -> CoreError {
    CoreError::NotFound {
        entity: entity.into(),
        id: id.to_string(),
    }
}

fn paginate<T: Clone>(mut items: Vec<T>, pagination: &Pagination) -> PaginatedResult<T> {
    let total = items.len() as u64;
    let start = (pagination.offset as usize).min(items.len());
    // `limit` may be u64::MAX ("give me everything"); clamp, don't add.
    let end = start
        .saturating_add(pagination.limit as usize)
        .min(items.len());
    let items = items.drain(start..end).collect();
    PaginatedResult {
        items,
        total,
        offset: pagination.offset,
        limit: pagination.limit,
    }
}

impl TenantRepository for MemoryStore {
    async fn create(&self, input: CreateTenant) -> CoreResult<Tenant> {
        let mut tables = self.inner.write();

        if tables
            .tenants
            .values()
            .any(|t| t.subdomain == input.subdomain)
        {
            return Err(CoreError::AlreadyExists {
                entity: "tenant".into(),
            });
        }

        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: input.name,
            subdomain: input.subdomain,
            subscription_plan: input.subscription_plan.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        tables.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<Tenant> {
        self.inner
            .read()
            .tenants
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("tenant", id))
    }

    async fn get_by_subdomain(&self, subdomain: &str) -> CoreResult<Tenant> {
        self.inner
            .read()
            .tenants
            .values()
            .find(|t| t.subdomain == subdomain)
            .cloned()
            .ok_or_else(|| not_found("tenant", format!("subdomain={subdomain}")))
    }

    async fn update(&self, id: Uuid, input: UpdateTenant) -> CoreResult<Tenant> {
        let mut tables = self.inner.write();
        let tenant = tables
            .tenants
            .get_mut(&id)
            .ok_or_else(|| not_found("tenant", id))?;

        if let Some(name) = input.name {
            tenant.name = name;
        }
        if let Some(plan) = input.subscription_plan {
            tenant.subscription_plan = plan;
        }
        tenant.updated_at = Utc::now();
        Ok(tenant.clone())
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        let mut tables = self.inner.write();
        tables
            .tenants
            .remove(&id)
            .ok_or_else(|| not_found("tenant", id))?;
        tables.users.retain(|_, u| u.tenant_id != id);
        tables.projects.retain(|_, p| p.tenant_id != id);
        tables.tasks.retain(|_, t| t.tenant_id != id);
        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> CoreResult<PaginatedResult<Tenant>> {
        let mut tenants: Vec<Tenant> = self.inner.read().tenants.values().cloned().collect();
        tenants.sort_by_key(|t| t.created_at);
        Ok(paginate(tenants, &pagination))
    }
}

impl UserRepository for MemoryStore {
    async fn create(&self, input: CreateUser) -> CoreResult<User> {
        let mut tables = self.inner.write();

        if !tables.tenants.contains_key(&input.tenant_id) {
            return Err(not_found("tenant", input.tenant_id));
        }
        if tables
            .users
            .values()
            .any(|u| u.tenant_id == input.tenant_id && u.email == input.email)
        {
            return Err(CoreError::AlreadyExists {
                entity: "user".into(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            email: input.email,
            full_name: input.full_name,
            password_hash: input.password_hash,
            role: input.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> CoreResult<User> {
        self.inner
            .read()
            .users
            .get(&id)
            .filter(|u| u.tenant_id == tenant_id)
            .cloned()
            .ok_or_else(|| not_found("user", id))
    }

    async fn get_by_email(&self, tenant_id: Uuid, email: &str) -> CoreResult<User> {
        self.inner
            .read()
            .users
            .values()
            .find(|u| u.tenant_id == tenant_id && u.email == email)
            .cloned()
            .ok_or_else(|| not_found("user", format!("email={email}")))
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: UpdateUser) -> CoreResult<User> {
        let mut tables = self.inner.write();
        let user = tables
            .users
            .get_mut(&id)
            .filter(|u| u.tenant_id == tenant_id)
            .ok_or_else(|| not_found("user", id))?;

        if let Some(full_name) = input.full_name {
            user.full_name = full_name;
        }
        if let Some(role) = input.role {
            user.role = role;
        }
        if let Some(is_active) = input.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> CoreResult<()> {
        let mut tables = self.inner.write();
        let user = tables
            .users
            .get_mut(&id)
            .filter(|u| u.tenant_id == tenant_id)
            .ok_or_else(|| not_found("user", id))?;

        user.is_active = false;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> CoreResult<PaginatedResult<User>> {
        let mut users: Vec<User> = self
            .inner
            .read()
            .users
            .values()
            .filter(|u| u.tenant_id == tenant_id)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(paginate(users, &pagination))
    }
}

impl ProjectRepository for MemoryStore {
    async fn create(&self, input: CreateProject) -> CoreResult<Project> {
        let mut tables = self.inner.write();

        if !tables.tenants.contains_key(&input.tenant_id) {
            return Err(not_found("tenant", input.tenant_id));
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> CoreResult<Project> {
        self.inner
            .read()
            .projects
            .get(&id)
            .filter(|p| p.tenant_id == tenant_id)
            .cloned()
            .ok_or_else(|| not_found("project", id))
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: UpdateProject) -> CoreResult<Project> {
        let mut tables = self.inner.write();
        let project = tables
            .projects
            .get_mut(&id)
            .filter(|p| p.tenant_id == tenant_id)
            .ok_or_else(|| not_found("project", id))?;

        if let Some(name) = input.name {
            project.name = name;
        }
        if let Some(description) = input.description {
            project.description = description;
        }
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> CoreResult<()> {
        let mut tables = self.inner.write();
        let exists = tables
            .projects
            .get(&id)
            .is_some_and(|p| p.tenant_id == tenant_id);
        if !exists {
            return Err(not_found("project", id));
        }
        tables.projects.remove(&id);
        tables.tasks.retain(|_, t| t.project_id != id);
        Ok(())
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> CoreResult<PaginatedResult<Project>> {
        let mut projects: Vec<Project> = self
            .inner
            .read()
            .projects
            .values()
            .filter(|p| p.tenant_id == tenant_id)
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.created_at);
        Ok(paginate(projects, &pagination))
    }
}

impl TaskRepository for MemoryStore {
    async fn create(&self, input: CreateTask) -> CoreResult<Task> {
        let mut tables = self.inner.write();

        // The parent project must exist in the same tenant; the task
        // inherits its tenant from the project row, not the input.
        let project = tables
            .projects
            .get(&input.project_id)
            .filter(|p| p.tenant_id == input.tenant_id)
            .ok_or_else(|| not_found("project", input.project_id))?;
        let tenant_id = project.tenant_id;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            tenant_id,
            project_id: input.project_id,
            title: input.title,
            description: input.description,
            status: Default::default(),
            assignee_id: input.assignee_id,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> CoreResult<Task> {
        self.inner
            .read()
            .tasks
            .get(&id)
            .filter(|t| t.tenant_id == tenant_id)
            .cloned()
            .ok_or_else(|| not_found("task", id))
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: UpdateTask) -> CoreResult<Task> {
        let mut tables = self.inner.write();
        let task = tables
            .tasks
            .get_mut(&id)
            .filter(|t| t.tenant_id == tenant_id)
            .ok_or_else(|| not_found("task", id))?;

        if let Some(title) = input.title {
            task.title = title;
        }
        if let Some(description) = input.description {
            task.description = description;
        }
        if let Some(status) = input.status {
            task.status = status;
        }
        if let Some(assignee_id) = input.assignee_id {
            task.assignee_id = assignee_id;
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> CoreResult<()> {
        let mut tables = self.inner.write();
        let exists = tables
            .tasks
            .get(&id)
            .is_some_and(|t| t.tenant_id == tenant_id);
        if !exists {
            return Err(not_found("task", id));
        }
        tables.tasks.remove(&id);
        Ok(())
    }

    async fn list_by_project(
        &self,
        tenant_id: Uuid,
        project_id: Uuid,
        pagination: Pagination,
    ) -> CoreResult<PaginatedResult<Task>> {
        let mut tasks: Vec<Task> = self
            .inner
            .read()
            .tasks
            .values()
            .filter(|t| t.tenant_id == tenant_id && t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.created_at);
        Ok(paginate(tasks, &pagination))
    }
}
