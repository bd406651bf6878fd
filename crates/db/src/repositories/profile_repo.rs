//! Repository for the `profiles` table.

use sqlx::PgPool;
use taskflow_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use taskflow_core::roles::ROLE_ADMIN;
use taskflow_core::types::DbId;

use crate::models::profile::{CreateProfile, Profile, ProfileSummary, UpdateProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, full_name, email, password_hash, role, avatar_url, position, \
                       is_active, created_at, updated_at";

/// Provides CRUD operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new profile, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (full_name, email, password_hash, role, position)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .bind(&input.position)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List profiles ordered by name.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles ORDER BY full_name ASC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Fetch author/assignee summaries for a set of ids. Unknown ids are skipped.
    pub async fn summaries_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ProfileSummary>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ProfileSummary>(
            "SELECT id, full_name, email, avatar_url FROM profiles WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Like [`Self::summaries_by_ids`], but deactivated profiles are skipped too.
    pub async fn active_summaries_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ProfileSummary>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ProfileSummary>(
            "SELECT id, full_name, email, avatar_url FROM profiles
             WHERE id = ANY($1) AND is_active = true",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Current `(role, is_active)` for a profile, read on every authenticated request.
    pub async fn find_access(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<(String, bool)>, sqlx::Error> {
        sqlx::query_as::<_, (String, bool)>("SELECT role, is_active FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a profile. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                avatar_url = COALESCE($5, avatar_url),
                position = COALESCE($6, position),
                is_active = COALESCE($7, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.role)
            .bind(&input.avatar_url)
            .bind(&input.position)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a profile. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE profiles SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of profiles.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(pool)
            .await
    }

    /// Whether any admin account exists.
    pub async fn admin_exists(pool: &PgPool) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM profiles WHERE role = $1)")
            .bind(ROLE_ADMIN)
            .fetch_one(pool)
            .await
    }
}
