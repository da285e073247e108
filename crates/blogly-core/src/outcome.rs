//! Results of mutating service operations.
//!
//! Every create/update/delete ends in an [`Outcome`]: a notice with a
//! severity for the user, plus a hint of where the user should go next.

use std::fmt;

use serde::Serialize;

use crate::error::DomainError;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong, for error notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Internal,
}

/// A short status message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Ok(String),
    Warning(String),
    Error(ErrorKind, String),
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Notice::Ok(_) => Severity::Ok,
            Notice::Warning(_) => Severity::Warning,
            Notice::Error(..) => Severity::Error,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Ok(msg) | Notice::Warning(msg) | Notice::Error(_, msg) => msg,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Notice::Error(kind, _) => Some(*kind),
            _ => None,
        }
    }
}

impl From<DomainError> for Notice {
    fn from(err: DomainError) -> Self {
        let kind = match &err {
            DomainError::NotFound { .. }
            | DomainError::ReferenceNotFound { .. }
            | DomainError::MissingReference => ErrorKind::NotFound,
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::Internal(detail) => {
                tracing::error!(error = %detail, "Service operation failed");
                return Notice::Error(
                    ErrorKind::Internal,
                    "Something went wrong, please try again.".to_string(),
                );
            }
        };
        Notice::Error(kind, err.to_string())
    }
}

/// Where the user should be sent after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Route {
    Users,
    User(i32),
    Post(i32),
    Tags,
    Tag(i32),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Users => "/users".to_string(),
            Route::User(id) => format!("/users/{id}"),
            Route::Post(id) => format!("/posts/{id}"),
            Route::Tags => "/tags".to_string(),
            Route::Tag(id) => format!("/tags/{id}"),
        }
    }
}

/// Notice plus routing hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub notice: Notice,
    pub route: Route,
}

impl Outcome {
    pub fn ok(message: impl Into<String>, route: Route) -> Self {
        Self {
            notice: Notice::Ok(message.into()),
            route,
        }
    }

    pub fn warning(message: impl Into<String>, route: Route) -> Self {
        Self {
            notice: Notice::Warning(message.into()),
            route,
        }
    }

    pub fn failed(err: DomainError, route: Route) -> Self {
        Self {
            notice: err.into(),
            route,
        }
    }

    pub fn severity(&self) -> Severity {
        self.notice.severity()
    }

    pub fn message(&self) -> &str {
        self.notice.message()
    }

    pub fn is_ok(&self) -> bool {
        self.severity() == Severity::Ok
    }
}
