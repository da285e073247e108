//! Turns service outcomes into redirects carrying a flash notice.

use actix_web::{HttpResponse, http::header};
use blogly_core::{Outcome, Severity};
use blogly_shared::FlashResponse;

/// `303 See Other` to the outcome's route, with the notice in the body.
pub fn redirect(outcome: Outcome) -> HttpResponse {
    let location = outcome.route.path();
    let severity = outcome.severity();

    match severity {
        Severity::Error => tracing::warn!(
            location = %location,
            kind = ?outcome.notice.error_kind(),
            "{}",
            outcome.message()
        ),
        _ => tracing::debug!(location = %location, %severity, "{}", outcome.message()),
    }

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.clone()))
        .json(FlashResponse {
            severity: severity.to_string(),
            message: outcome.message().to_string(),
            location,
        })
}
