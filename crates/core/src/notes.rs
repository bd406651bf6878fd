//! Note constants and validation (titles, content, category, visibility).

use crate::roles::ROLE_ADMIN;

/// Maximum length of a note title in characters.
pub const MAX_NOTE_TITLE_LENGTH: usize = 200;

/// Maximum length of note content (HTML) in bytes.
pub const MAX_NOTE_CONTENT_LENGTH: usize = 100_000;

/// Maximum length of a category label.
pub const MAX_CATEGORY_LENGTH: usize = 50;

/// Category applied when none is supplied.
pub const DEFAULT_CATEGORY: &str = "general";

/// Only the authoring admin (and other admins) can see the note.
pub const VISIBILITY_PRIVATE: &str = "private";
/// Admins plus the note's recipients.
pub const VISIBILITY_RECIPIENTS: &str = "recipients";
/// Every authenticated user.
pub const VISIBILITY_PUBLIC: &str = "public";

/// All valid visibility values.
pub const VALID_VISIBILITIES: &[&str] = &[
    VISIBILITY_PRIVATE,
    VISIBILITY_RECIPIENTS,
    VISIBILITY_PUBLIC,
];

/// Visibility applied when none is supplied.
pub const DEFAULT_VISIBILITY: &str = VISIBILITY_RECIPIENTS;

/// Validate a note title: required, bounded.
pub fn validate_note_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Note title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_NOTE_TITLE_LENGTH {
        return Err(format!(
            "Note title exceeds maximum length of {MAX_NOTE_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate note content: non-empty and within the length limit.
pub fn validate_note_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Note content cannot be empty".to_string());
    }
    if content.len() > MAX_NOTE_CONTENT_LENGTH {
        return Err(format!(
            "Note content exceeds maximum length of {MAX_NOTE_CONTENT_LENGTH} bytes"
        ));
    }
    Ok(())
}

/// Validate a category label.
pub fn validate_category(category: &str) -> Result<(), String> {
    if category.trim().is_empty() {
        return Err("Category cannot be empty".to_string());
    }
    if category.chars().count() > MAX_CATEGORY_LENGTH {
        return Err(format!(
            "Category exceeds maximum length of {MAX_CATEGORY_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate that the visibility string is one of the accepted values.
pub fn validate_visibility(visibility: &str) -> Result<(), String> {
    if VALID_VISIBILITIES.contains(&visibility) {
        Ok(())
    } else {
        Err(format!(
            "Invalid visibility '{visibility}'. Must be one of: {}",
            VALID_VISIBILITIES.join(", ")
        ))
    }
}

/// Whether a user with `role` may read a note.
///
/// Admins see everything. Other users see `public` notes, and
/// `recipients` notes they are listed on.
pub fn can_view_note(visibility: &str, user_role: &str, is_recipient: bool) -> bool {
    if user_role == ROLE_ADMIN {
        return true;
    }
    match visibility {
        VISIBILITY_PUBLIC => true,
        VISIBILITY_RECIPIENTS => is_recipient,
        _ => false,
    }
}
