//! # Blogly Core
//!
//! The domain layer of Blogly.
//! This crate contains the records, the store ports, and the
//! change-detection and tag-reconciliation logic the services are built on.
//! It has zero infrastructure dependencies.

pub mod change;
pub mod domain;
pub mod error;
pub mod outcome;
pub mod ports;
pub mod reconcile;
pub mod services;

pub use change::changed;
pub use error::{DomainError, RepoError};
pub use outcome::{ErrorKind, Notice, Outcome, Route, Severity};
pub use reconcile::{TagChanges, reconcile};
pub use services::{PostService, TagService, UserService};
