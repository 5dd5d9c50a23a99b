use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{NewsletterSubscription, SubscriptionStatus},
    error::{AppError, Result},
    repository::{parse_id, NewsletterRepository},
};

#[derive(FromRow)]
struct SubscriptionRow {
    id: String,
    email: String,
    name: Option<String>,
    status: String,
    subscribed_at: NaiveDateTime,
    unsubscribed_at: Option<NaiveDateTime>,
}

pub struct SqliteNewsletterRepository {
    pool: SqlitePool,
}

impl SqliteNewsletterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_subscription(row: SubscriptionRow) -> Result<NewsletterSubscription> {
        Ok(NewsletterSubscription {
            id: parse_id(&row.id)?,
            email: row.email,
            name: row.name,
            status: Self::parse_status(&row.status)?,
            subscribed_at: DateTime::from_naive_utc_and_offset(row.subscribed_at, Utc),
            unsubscribed_at: row.unsubscribed_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
        })
    }

    fn parse_status(s: &str) -> Result<SubscriptionStatus> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "unsubscribed" => Ok(SubscriptionStatus::Unsubscribed),
            _ => Err(AppError::Database(format!("Invalid subscription status: {}", s))),
        }
    }

    fn status_to_str(status: &SubscriptionStatus) -> &'static str {
        match status {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Unsubscribed => "unsubscribed",
        }
    }

    async fn require(&self, email: &str) -> Result<NewsletterSubscription> {
        self.find_by_email(email).await?.ok_or_else(|| {
            AppError::NotFound("Email is not subscribed".to_string())
        })
    }
}

#[async_trait]
impl NewsletterRepository for SqliteNewsletterRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<NewsletterSubscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, email, name, status, subscribed_at, unsubscribed_at
            FROM newsletter_subscriptions
            WHERE email = ?
            "#
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_subscription).transpose()
    }

    async fn subscribe(&self, email: &str, name: Option<&str>) -> Result<NewsletterSubscription> {
        let email = email.trim().to_lowercase();
        let now = Utc::now().naive_utc();

        // Re-subscribing flips an unsubscribed row back to active.
        sqlx::query(
            r#"
            INSERT INTO newsletter_subscriptions (id, email, name, status, subscribed_at)
            VALUES (?, ?, ?, 'active', ?)
            ON CONFLICT (email)
            DO UPDATE SET status = 'active',
                          name = COALESCE(excluded.name, newsletter_subscriptions.name),
                          subscribed_at = excluded.subscribed_at,
                          unsubscribed_at = NULL
            "#
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&email)
        .bind(name)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.require(&email).await
    }

    async fn unsubscribe(&self, email: &str) -> Result<NewsletterSubscription> {
        let email = email.trim().to_lowercase();
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE newsletter_subscriptions
            SET status = 'unsubscribed', unsubscribed_at = ?
            WHERE email = ? AND status = 'active'
            "#
        )
        .bind(now)
        .bind(&email)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let existing = self.require(&email).await?;
            return Err(AppError::Conflict(format!(
                "{} is already unsubscribed",
                existing.email
            )));
        }

        self.require(&email).await
    }

    async fn list(&self, status: Option<SubscriptionStatus>) -> Result<Vec<NewsletterSubscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, email, name, status, subscribed_at, unsubscribed_at
            FROM newsletter_subscriptions
            WHERE (?1 IS NULL OR status = ?1)
            ORDER BY subscribed_at DESC
            "#
        )
        .bind(status.as_ref().map(Self::status_to_str))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_subscription)
            .collect()
    }

    async fn count_active(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM newsletter_subscriptions WHERE status = 'active'"
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
