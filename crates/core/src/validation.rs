//! Field-level validation helpers shared by the API handlers.
//!
//! Each function returns `Err(message)` with a user-facing explanation so
//! handlers can map it straight into a 400 response.

use uuid::Uuid;
use validator::ValidateEmail;

/// Maximum length of a person's display name.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Minimum password length for sign-up and admin-created accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate that `value` is non-empty after trimming whitespace.
pub fn validate_required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

/// Validate a person's name: required and within [`MAX_NAME_LENGTH`].
pub fn validate_name(name: &str) -> Result<(), String> {
    validate_required("Name", name)?;
    if name.trim().chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate that `email` is a well-formed address.
pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err("Email is required".to_string());
    }
    if trimmed.len() > MAX_EMAIL_LENGTH || !trimmed.to_owned().validate_email() {
        return Err(format!("'{trimmed}' is not a valid email address"));
    }
    Ok(())
}

/// Lowercase and trim an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Parse a path or body identifier as a UUID.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("{field} is not a valid identifier"))
}

/// Validate that a password meets the minimum length.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_rejected() {
        assert_eq!(validate_name("   ").unwrap_err(), "Name is required");
    }

    #[test]
    fn long_name_rejected() {
        let name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_name(&name).is_err());
    }

    #[test]
    fn well_formed_email_accepted() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("  jane@example.com ").is_ok());
    }

    #[test]
    fn malformed_email_rejected() {
        assert!(validate_email("jane").is_err());
        assert!(validate_email("jane@").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email(" Jane@Example.COM "), "jane@example.com");
    }

    #[test]
    fn parse_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("noteId", &id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        let err = parse_id("noteId", "42").unwrap_err();
        assert_eq!(err, "noteId is not a valid identifier");
    }

    #[test]
    fn password_length_boundary() {
        assert!(validate_password_strength("1234567", 8).is_err());
        assert!(validate_password_strength("12345678", 8).is_ok());
    }
}
