//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Writes that also
//! send email add a sibling `notification` object describing the outcome.

use serde::Serialize;

use crate::notify::NotificationOutcome;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T, "notification": {...} }` for writes that dispatch email.
///
/// The primary action has already succeeded; `notification` only reports
/// whether the follow-up email went out.
#[derive(Debug, Serialize)]
pub struct NotifiedResponse<T: Serialize> {
    pub data: T,
    pub notification: NotificationOutcome,
}
