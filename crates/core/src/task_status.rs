//! Task lifecycle, priority levels, and time-log rules.
//!
//! ```text
//! pending ─▶ in_progress ─▶ completed ─approve─▶ approved
//!                 ▲              │
//!                 └────reject────┘
//! ```
//!
//! Assignees drive the first two steps; approval and rejection are admin
//! actions. Admins may also move a task along the assignee steps.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::DbId;

/// Most minutes a single time-log entry may record (one day).
pub const MAX_LOG_MINUTES: i32 = 24 * 60;

/// Maximum length of a task title.
pub const MAX_TASK_TITLE_LENGTH: usize = 200;

/// Maximum length of a task comment body.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Approved,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Approved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid task status '{s}'. Must be one of: pending, in_progress, completed, approved"
                )
            })
    }
}

/// Who is asking for a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Assignee,
    Admin,
}

/// Check whether `actor` may move task `task_id` from `from` to `to`.
///
/// Returns `Forbidden` when the step exists but belongs to an admin, and
/// `Conflict` when the step is not part of the lifecycle at all.
pub fn check_transition(
    task_id: DbId,
    from: TaskStatus,
    to: TaskStatus,
    actor: Actor,
) -> Result<(), CoreError> {
    use TaskStatus::*;

    let admin_only = match (from, to) {
        (Pending, InProgress) | (InProgress, Completed) => false,
        (Completed, Approved) | (Completed, InProgress) => true,
        _ => {
            return Err(CoreError::Conflict(format!(
                "Task {task_id} cannot move from {from} to {to}"
            )))
        }
    };

    if admin_only && actor != Actor::Admin {
        return Err(CoreError::Forbidden(format!(
            "Only an admin can move a task from {from} to {to}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";
pub const PRIORITY_URGENT: &str = "urgent";

pub const VALID_PRIORITIES: &[&str] = &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH, PRIORITY_URGENT];

pub const DEFAULT_PRIORITY: &str = PRIORITY_MEDIUM;

/// Validate that the priority string is one of the accepted values.
pub fn validate_priority(priority: &str) -> Result<(), String> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_PRIORITIES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Content validation
// ---------------------------------------------------------------------------

/// Validate a task title: required, bounded.
pub fn validate_task_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Task title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TASK_TITLE_LENGTH {
        return Err(format!(
            "Task title exceeds maximum length of {MAX_TASK_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate the minutes recorded on a time-log entry.
pub fn validate_log_minutes(minutes: i32) -> Result<(), String> {
    if !(1..=MAX_LOG_MINUTES).contains(&minutes) {
        return Err(format!(
            "Logged time must be between 1 and {MAX_LOG_MINUTES} minutes"
        ));
    }
    Ok(())
}

/// Validate a comment body: non-empty, bounded.
pub fn validate_comment(body: &str) -> Result<(), String> {
    if body.trim().is_empty() {
        return Err("Comment cannot be empty".to_string());
    }
    if body.chars().count() > MAX_COMMENT_LENGTH {
        return Err(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        ));
    }
    Ok(())
}
