//! Domain models for Taskgrid.
//!
//! These are the core types shared across all crates.

pub mod project;
pub mod task;
pub mod tenant;
pub mod user;
