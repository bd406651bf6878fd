//! First-run admin account.
//!
//! A fresh database has no admin, and only admins can create users. When
//! `BOOTSTRAP_ADMIN_EMAIL` and `BOOTSTRAP_ADMIN_PASSWORD` are set, startup
//! creates that admin unless one already exists.

use taskflow_core::error::CoreError;
use taskflow_core::roles::ROLE_ADMIN;
use taskflow_core::validation::{
    normalize_email, validate_email, validate_name, validate_password_strength,
    MIN_PASSWORD_LENGTH,
};
use taskflow_db::models::profile::{CreateProfile, Profile};
use taskflow_db::repositories::ProfileRepo;
use taskflow_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

const DEFAULT_NAME: &str = "Administrator";

/// Credentials for the first admin account.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl BootstrapAdmin {
    /// Read the bootstrap admin from the environment.
    ///
    /// | Env Var                    | Default         |
    /// |----------------------------|-----------------|
    /// | `BOOTSTRAP_ADMIN_EMAIL`    | (unset: skip)   |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | (unset: skip)   |
    /// | `BOOTSTRAP_ADMIN_NAME`     | `Administrator` |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let email = non_blank("BOOTSTRAP_ADMIN_EMAIL")?;
        let password = non_blank("BOOTSTRAP_ADMIN_PASSWORD")?;
        let full_name = non_blank("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|| DEFAULT_NAME.into());
        Some(Self {
            full_name,
            email,
            password,
        })
    }
}

/// Create the bootstrap admin if no admin exists yet.
///
/// Returns the created profile, or `None` when an admin was already there.
pub async fn ensure_bootstrap_admin(
    pool: &DbPool,
    admin: &BootstrapAdmin,
) -> AppResult<Option<Profile>> {
    if ProfileRepo::admin_exists(pool).await? {
        tracing::debug!("Admin account present, skipping bootstrap");
        return Ok(None);
    }

    let invalid = |msg: String| AppError::Core(CoreError::Validation(msg));
    validate_name(&admin.full_name).map_err(invalid)?;
    validate_email(&admin.email).map_err(invalid)?;
    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH).map_err(invalid)?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    let input = CreateProfile {
        full_name: admin.full_name.trim().to_string(),
        email: normalize_email(&admin.email),
        password_hash,
        role: ROLE_ADMIN.to_string(),
        position: None,
    };
    let profile = ProfileRepo::create(pool, &input).await?;
    tracing::info!(user_id = %profile.id, email = %profile.email, "Bootstrap admin created");
    Ok(Some(profile))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn requires_email_and_password() {
        assert!(BootstrapAdmin::from_lookup(lookup(&[])).is_none());
        assert!(BootstrapAdmin::from_lookup(lookup(&[(
            "BOOTSTRAP_ADMIN_EMAIL",
            "root@example.com"
        )]))
        .is_none());
        assert!(BootstrapAdmin::from_lookup(lookup(&[
            ("BOOTSTRAP_ADMIN_EMAIL", "  "),
            ("BOOTSTRAP_ADMIN_PASSWORD", "supersecret"),
        ]))
        .is_none());
    }

    #[test]
    fn name_defaults() {
        let admin = BootstrapAdmin::from_lookup(lookup(&[
            ("BOOTSTRAP_ADMIN_EMAIL", "root@example.com"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "supersecret"),
        ]))
        .unwrap();
        assert_eq!(admin.full_name, "Administrator");
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn creates_admin_once(pool: DbPool) {
        let admin = BootstrapAdmin {
            full_name: "Root".into(),
            email: "Root@Example.com".into(),
            password: "supersecret".into(),
        };

        let created = ensure_bootstrap_admin(&pool, &admin).await.unwrap().unwrap();
        assert_eq!(created.role, ROLE_ADMIN);
        assert_eq!(created.email, "root@example.com");

        let second = ensure_bootstrap_admin(&pool, &admin).await.unwrap();
        assert!(second.is_none());
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn weak_password_is_rejected(pool: DbPool) {
        let admin = BootstrapAdmin {
            full_name: "Root".into(),
            email: "root@example.com".into(),
            password: "short".into(),
        };
        assert!(ensure_bootstrap_admin(&pool, &admin).await.is_err());
    }
}
