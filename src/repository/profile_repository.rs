use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{CreateProfileRequest, Profile, ProfileStatus, Role, UpdateProfileRequest, normalize_skills},
    error::{is_unique_violation, AppError, Result},
    repository::{decode_list, encode_list, parse_id, ProfileRepository},
};

// Database row struct that matches SQLite schema
#[derive(FromRow)]
struct ProfileRow {
    id: String,
    email: String,
    full_name: String,
    role: String,
    status: String,
    skills: String,
    bio: Option<String>,
    github_username: Option<String>,
    linkedin_username: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const PROFILE_COLUMNS: &str = r#"
    id, email, full_name, role, status, skills, bio,
    github_username, linkedin_username, created_at, updated_at
"#;

pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_profile(row: ProfileRow) -> Result<Profile> {
        Ok(Profile {
            id: parse_id(&row.id)?,
            email: row.email,
            full_name: row.full_name,
            role: Role::parse(&row.role)
                .ok_or_else(|| AppError::Database(format!("Invalid role: {}", row.role)))?,
            status: ProfileStatus::parse(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid profile status: {}", row.status)))?,
            skills: decode_list(&row.skills)?,
            bio: row.bio,
            github_username: row.github_username,
            linkedin_username: row.linkedin_username,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    async fn require(&self, id: Uuid) -> Result<Profile> {
        self.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn create(&self, request: CreateProfileRequest, password_hash: &str) -> Result<Profile> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();
        let email = request.email.trim().to_lowercase();

        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, email, password_hash, full_name, role, status, skills,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, '[]', ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&email)
        .bind(password_hash)
        .bind(request.full_name.trim())
        .bind(Role::Member.as_str())
        .bind(ProfileStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already registered".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created profile".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            &format!("SELECT {} FROM profiles WHERE id = ?", PROFILE_COLUMNS)
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_profile).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            &format!("SELECT {} FROM profiles WHERE email = ?", PROFILE_COLUMNS)
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_profile).transpose()
    }

    async fn list(&self, status: Option<ProfileStatus>) -> Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            &format!(
                "SELECT {} FROM profiles WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC",
                PROFILE_COLUMNS
            )
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_profile)
            .collect()
    }

    async fn update(&self, id: Uuid, update: UpdateProfileRequest) -> Result<Profile> {
        let existing = self.require(id).await?;

        let skills = match &update.skills {
            Some(skills) => normalize_skills(skills),
            None => existing.skills,
        };
        let skills_json = encode_list(&skills)?;
        let now = Utc::now().naive_utc();

        // Absent fields keep their value; explicit nulls or blanks clear them.
        let bio = patch_text(update.bio, existing.bio);
        let github_username = patch_text(update.github_username, existing.github_username);
        let linkedin_username = patch_text(update.linkedin_username, existing.linkedin_username);

        sqlx::query(
            r#"
            UPDATE profiles
            SET full_name = COALESCE(?, full_name),
                bio = ?,
                skills = ?,
                github_username = ?,
                linkedin_username = ?,
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(update.full_name.as_deref().map(str::trim))
        .bind(bio)
        .bind(&skills_json)
        .bind(github_username)
        .bind(linkedin_username)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        self.require(id).await
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Profile> {
        let now = Utc::now().naive_utc();

        // Only approved profiles can hold the admin role.
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET role = ?, updated_at = ?
            WHERE id = ? AND (? = 'member' OR status = 'approved')
            "#
        )
        .bind(role.as_str())
        .bind(now)
        .bind(id.to_string())
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            self.require(id).await?;
            return Err(AppError::Conflict(
                "Only approved members can be made admins".to_string(),
            ));
        }

        self.require(id).await
    }

    async fn remove_membership(&self, id: Uuid) -> Result<Vec<Uuid>> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET status = 'rejected', updated_at = ?
            WHERE id = ? AND role <> 'admin'
            "#
        )
        .bind(now)
        .bind(&id_str)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM profiles WHERE id = ?")
                .bind(&id_str)
                .fetch_optional(&mut *tx)
                .await?;
            return Err(match exists {
                Some(_) => AppError::Conflict("Admins cannot be removed from the club".to_string()),
                None => AppError::NotFound("Profile not found".to_string()),
            });
        }

        let event_ids: Vec<(String,)> = sqlx::query_as(
            "SELECT event_id FROM event_registrations WHERE user_id = ?"
        )
        .bind(&id_str)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE events
            SET current_participants = current_participants - 1
            WHERE id IN (SELECT event_id FROM event_registrations WHERE user_id = ?)
            "#
        )
        .bind(&id_str)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM event_registrations WHERE user_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        event_ids.into_iter()
            .map(|(event_id,)| parse_id(&event_id))
            .collect()
    }

    async fn count_by_status(&self, status: ProfileStatus) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM profiles WHERE status = ?"
        )
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

fn patch_text(patch: Option<Option<String>>, current: Option<String>) -> Option<String> {
    match patch {
        None => current,
        Some(value) => value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()),
    }
}
