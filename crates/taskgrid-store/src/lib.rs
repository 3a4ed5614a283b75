//! Taskgrid Store — in-memory implementations of the `taskgrid-core`
//! repository traits.
//!
//! The production persistence engine is a separate collaborator; this
//! adapter backs tests, demos, and the development server while
//! honoring the same tenant-isolation contract: every tenant-scoped
//! read filters on `tenant_id` before anything else.

mod memory;

pub use memory::MemoryStore;
