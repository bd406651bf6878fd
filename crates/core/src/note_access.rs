//! Public note edit-access workflow: request, review, token-gated edit.
//!
//! A requester asks for edit access to a note; an admin approves or rejects
//! the request. Approval mints a fresh random edit token. The plaintext is
//! handed out once (response body and email) and only its SHA-256 digest is
//! persisted. Anyone holding the plaintext may edit the note's content until
//! the approval is revoked. Tokens are not consumed by use.
//!
//! ```text
//! pending ──approve──▶ approved ──revoke──▶ rejected
//!    │                                         ▲
//!    └─────────────────reject──────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::types::DbId;

/// Length of a generated edit token (alphanumeric characters).
pub const EDIT_TOKEN_LENGTH: usize = 48;

/// The single denial returned for every failed token check. Wrong token,
/// never-approved and revoked requests are indistinguishable to the caller.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired edit token";

/// Message for an edit request against a note id that has no row.
pub const NOTE_MISSING_MESSAGE: &str = "The note you requested access to does not exist";

const DUPLICATE_PENDING_MESSAGE: &str =
    "You already have a pending edit request for this note. An administrator will review it soon.";

const DUPLICATE_APPROVED_MESSAGE: &str =
    "Your edit request for this note was already approved. Use the edit link sent to your email.";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Review status of a note edit request, stored as text in
/// `note_edit_requests.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl EditRequestStatus {
    pub const ALL: [EditRequestStatus; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a request in this state blocks the same requester from
    /// filing another one for the same note.
    pub fn blocks_new_request(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl fmt::Display for EditRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!(
                "Invalid edit request status '{other}'. Must be one of: pending, approved, rejected"
            )),
        }
    }
}

/// Check that an admin may move a request from `from` to `to`.
///
/// Allowed: `pending → approved`, `pending → rejected`,
/// `approved → rejected` (revocation). `rejected` is terminal.
pub fn check_transition(
    request_id: DbId,
    from: EditRequestStatus,
    to: EditRequestStatus,
) -> Result<(), CoreError> {
    use EditRequestStatus::*;
    match (from, to) {
        (Pending, Approved) | (Pending, Rejected) | (Approved, Rejected) => Ok(()),
        (Approved, Approved) => Err(CoreError::Conflict(format!(
            "Edit request {request_id} is already approved"
        ))),
        (Rejected, _) => Err(CoreError::Conflict(format!(
            "Edit request {request_id} was rejected; the requester must submit a new request"
        ))),
        (from, to) => Err(CoreError::Conflict(format!(
            "Edit request {request_id} cannot move from {from} to {to}"
        ))),
    }
}

/// Reject a new request when the requester already has an open one.
///
/// `existing` holds the statuses of every prior request by the same email
/// for the same note. The message tells the requester whether they are
/// still waiting or were already approved.
pub fn ensure_no_open_request(existing: &[EditRequestStatus]) -> Result<(), CoreError> {
    let open: Vec<EditRequestStatus> = existing
        .iter()
        .copied()
        .filter(|s| s.blocks_new_request())
        .collect();
    if open.is_empty() {
        Ok(())
    } else if open.contains(&EditRequestStatus::Approved) {
        Err(CoreError::Conflict(DUPLICATE_APPROVED_MESSAGE.to_string()))
    } else {
        Err(CoreError::Conflict(DUPLICATE_PENDING_MESSAGE.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A freshly minted edit token.
pub struct MintedToken {
    /// Shown to the admin and emailed to the requester; never stored.
    pub plaintext: String,
    /// SHA-256 hex digest persisted in `note_edit_requests.edit_token_hash`.
    pub hash: String,
}

/// Mint a new random edit token.
pub fn mint_edit_token() -> MintedToken {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(EDIT_TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_edit_token(&plaintext);
    MintedToken { plaintext, hash }
}

/// Compute the SHA-256 hex digest of an edit token.
pub fn hash_edit_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Cheap shape check run before touching the database.
///
/// A token that fails here can never match a stored hash, so the caller
/// answers with [`INVALID_TOKEN_MESSAGE`] without a query.
pub fn is_plausible_token(token: &str) -> bool {
    token.len() == EDIT_TOKEN_LENGTH && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Build the public edit link handed to an approved requester.
pub fn edit_url(public_app_url: &str, note_id: DbId, token: &str) -> String {
    format!(
        "{}/notes/{note_id}/edit?token={token}",
        public_app_url.trim_end_matches('/')
    )
}
