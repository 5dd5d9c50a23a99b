use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{ContactMessage, ContactStatus, CreateContactRequest},
    error::{AppError, Result},
    repository::{parse_id, ContactRepository},
};

#[derive(FromRow)]
struct ContactRow {
    id: String,
    name: String,
    email: String,
    subject: String,
    message: String,
    status: String,
    created_at: NaiveDateTime,
}

pub struct SqliteContactRepository {
    pool: SqlitePool,
}

impl SqliteContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_message(row: ContactRow) -> Result<ContactMessage> {
        Ok(ContactMessage {
            id: parse_id(&row.id)?,
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            status: Self::parse_status(&row.status)?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }

    fn parse_status(s: &str) -> Result<ContactStatus> {
        match s {
            "new" => Ok(ContactStatus::New),
            "read" => Ok(ContactStatus::Read),
            "archived" => Ok(ContactStatus::Archived),
            _ => Err(AppError::Database(format!("Invalid contact status: {}", s))),
        }
    }

    fn status_to_str(status: &ContactStatus) -> &'static str {
        match status {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Archived => "archived",
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContactMessage>> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, name, email, subject, message, status, created_at
            FROM contact_messages
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_message).transpose()
    }
}

#[async_trait]
impl ContactRepository for SqliteContactRepository {
    async fn create(&self, message: CreateContactRequest) -> Result<ContactMessage> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO contact_messages (id, name, email, subject, message, status, created_at)
            VALUES (?, ?, ?, ?, ?, 'new', ?)
            "#
        )
        .bind(id.to_string())
        .bind(message.name.trim())
        .bind(message.email.trim().to_lowercase())
        .bind(message.subject.trim())
        .bind(&message.message)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created contact message".to_string())
        })
    }

    async fn list(&self, status: Option<ContactStatus>) -> Result<Vec<ContactMessage>> {
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, name, email, subject, message, status, created_at
            FROM contact_messages
            WHERE (?1 IS NULL OR status = ?1)
            ORDER BY created_at DESC
            "#
        )
        .bind(status.as_ref().map(Self::status_to_str))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_message)
            .collect()
    }

    async fn update_status(&self, id: Uuid, status: ContactStatus) -> Result<ContactMessage> {
        let result = sqlx::query("UPDATE contact_messages SET status = ? WHERE id = ?")
            .bind(Self::status_to_str(&status))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Message not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated contact message".to_string())
        })
    }

    async fn count_new(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM contact_messages WHERE status = 'new'"
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
