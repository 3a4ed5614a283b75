//! Taskgrid Core — shared domain models, repository traits, and error
//! types for the multi-tenant project/task backend.
//!
//! This crate has no knowledge of transport or storage engines; it
//! defines the contracts the other crates implement.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{CoreError, CoreResult};
