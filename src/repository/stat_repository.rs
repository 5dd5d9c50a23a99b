use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{CreateStatRequest, Stat, UpdateStatRequest},
    error::{AppError, Result},
    repository::{parse_id, StatRepository},
};

#[derive(FromRow)]
struct StatRow {
    id: String,
    label: String,
    value: i64,
    icon: Option<String>,
    display_order: i32,
    is_active: i32,
    updated_at: NaiveDateTime,
}

pub struct SqliteStatRepository {
    pool: SqlitePool,
}

impl SqliteStatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_stat(row: StatRow) -> Result<Stat> {
        Ok(Stat {
            id: parse_id(&row.id)?,
            label: row.label,
            value: row.value,
            icon: row.icon,
            display_order: row.display_order,
            is_active: row.is_active != 0,
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl StatRepository for SqliteStatRepository {
    async fn create(&self, stat: CreateStatRequest) -> Result<Stat> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO stats (id, label, value, icon, display_order, is_active, updated_at)
            VALUES (?, ?, ?, ?, ?, 1, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&stat.label)
        .bind(stat.value)
        .bind(&stat.icon)
        .bind(stat.display_order.unwrap_or(0))
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created stat".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Stat>> {
        let row = sqlx::query_as::<_, StatRow>(
            "SELECT id, label, value, icon, display_order, is_active, updated_at FROM stats WHERE id = ?"
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_stat).transpose()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Stat>> {
        let rows = sqlx::query_as::<_, StatRow>(
            r#"
            SELECT id, label, value, icon, display_order, is_active, updated_at
            FROM stats
            WHERE (? = 0 OR is_active = 1)
            ORDER BY display_order ASC, label ASC
            "#
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_stat)
            .collect()
    }

    async fn update(&self, id: Uuid, update: UpdateStatRequest) -> Result<Stat> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE stats
            SET label = COALESCE(?, label),
                value = COALESCE(?, value),
                icon = COALESCE(?, icon),
                display_order = COALESCE(?, display_order),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&update.label)
        .bind(update.value)
        .bind(&update.icon)
        .bind(update.display_order)
        .bind(update.is_active)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stat not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated stat".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM stats WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stat not found".to_string()));
        }

        Ok(())
    }
}
