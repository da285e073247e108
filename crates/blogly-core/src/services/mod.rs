//! Entity services: validate input, detect changes, write through the ports.

mod post;
mod tag;
mod user;

pub use post::PostService;
pub use tag::TagService;
pub use user::UserService;

use crate::error::{DomainError, RepoError};
use crate::outcome::Route;

/// Map a store `NotFound` onto the entity the caller was working on.
fn missing(entity_type: &'static str, id: i32) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}

/// Send the user back to `fallback` unless the record itself is gone.
fn error_route(err: &DomainError, gone: Route, fallback: Route) -> Route {
    match err {
        DomainError::NotFound { .. } => gone,
        _ => fallback,
    }
}
