//! # Blogly Infrastructure
//!
//! Concrete implementations of the ports defined in `blogly-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL record store via SeaORM

pub mod database;
pub mod memory;

// Re-exports - In-Memory
pub use database::DatabaseConfig;
pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use database::{
    PostgresPostRepository, PostgresPostTagRepository, PostgresTagRepository,
    PostgresUserRepository,
};
