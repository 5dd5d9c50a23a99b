use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{ApplicationStatus, Decision, MemberApplication, SubmitApplicationRequest, normalize_skills},
    error::{is_unique_violation, AppError, Result},
    repository::{decode_list, encode_list, parse_id, ApplicationRepository},
};

#[derive(FromRow)]
struct ApplicationRow {
    id: String,
    user_id: String,
    email: String,
    full_name: String,
    motivation: String,
    experience: Option<String>,
    skills: String,
    github_username: Option<String>,
    linkedin_username: Option<String>,
    status: String,
    reviewed_by: Option<String>,
    reviewed_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

const APPLICATION_COLUMNS: &str = r#"
    id, user_id, email, full_name, motivation, experience, skills,
    github_username, linkedin_username, status, reviewed_by, reviewed_at, created_at
"#;

pub struct SqliteApplicationRepository {
    pool: SqlitePool,
}

impl SqliteApplicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_application(row: ApplicationRow) -> Result<MemberApplication> {
        Ok(MemberApplication {
            id: parse_id(&row.id)?,
            user_id: parse_id(&row.user_id)?,
            email: row.email,
            full_name: row.full_name,
            motivation: row.motivation,
            experience: row.experience,
            skills: decode_list(&row.skills)?,
            github_username: row.github_username,
            linkedin_username: row.linkedin_username,
            status: ApplicationStatus::parse(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid application status: {}", row.status)))?,
            reviewed_by: row.reviewed_by.as_deref().map(parse_id).transpose()?,
            reviewed_at: row.reviewed_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl ApplicationRepository for SqliteApplicationRepository {
    async fn create(&self, user_id: Uuid, request: SubmitApplicationRequest) -> Result<MemberApplication> {
        let id = Uuid::new_v4();
        let user_id_str = user_id.to_string();
        let skills_json = encode_list(&normalize_skills(&request.skills))?;
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        // A rejected applicant goes back under review when they re-apply.
        sqlx::query(
            r#"
            UPDATE profiles
            SET status = 'pending', updated_at = ?
            WHERE id = ? AND status = 'rejected'
            "#
        )
        .bind(now)
        .bind(&user_id_str)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO member_applications (
                id, user_id, email, full_name, motivation, experience, skills,
                github_username, linkedin_username, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?)
            "#
        )
        .bind(id.to_string())
        .bind(&user_id_str)
        .bind(request.email.trim().to_lowercase())
        .bind(request.full_name.trim())
        .bind(request.motivation.trim())
        .bind(&request.experience)
        .bind(&skills_json)
        .bind(&request.github_username)
        .bind(&request.linkedin_username)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("You already have a pending application".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        tx.commit().await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created application".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MemberApplication>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            &format!("SELECT {} FROM member_applications WHERE id = ?", APPLICATION_COLUMNS)
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_application(r)?)),
            None => Ok(None)
        }
    }

    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<MemberApplication>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            &format!(
                "SELECT {} FROM member_applications WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC",
                APPLICATION_COLUMNS
            )
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_application)
            .collect()
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<MemberApplication>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            &format!(
                "SELECT {} FROM member_applications WHERE user_id = ? ORDER BY created_at DESC",
                APPLICATION_COLUMNS
            )
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_application)
            .collect()
    }

    async fn decide(&self, id: Uuid, decision: Decision, reviewer: Uuid) -> Result<MemberApplication> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        // The status guard makes the transition happen at most once, even
        // when two admins decide the same application concurrently.
        let result = sqlx::query(
            r#"
            UPDATE member_applications
            SET status = ?, reviewed_by = ?, reviewed_at = ?
            WHERE id = ? AND status = 'pending'
            "#
        )
        .bind(decision.application_status().as_str())
        .bind(reviewer.to_string())
        .bind(now)
        .bind(&id_str)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let current: Option<String> = sqlx::query_scalar(
                "SELECT status FROM member_applications WHERE id = ?"
            )
            .bind(&id_str)
            .fetch_optional(&mut *tx)
            .await?;

            return Err(match current {
                Some(status) => AppError::Conflict(format!("Application has already been {}", status)),
                None => AppError::NotFound("Application not found".to_string()),
            });
        }

        let user_id: String = sqlx::query_scalar(
            "SELECT user_id FROM member_applications WHERE id = ?"
        )
        .bind(&id_str)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE profiles SET status = ?, updated_at = ? WHERE id = ?")
            .bind(decision.profile_status().as_str())
            .bind(now)
            .bind(&user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve reviewed application".to_string())
        })
    }

    async fn count_pending(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM member_applications WHERE status = 'pending'"
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
