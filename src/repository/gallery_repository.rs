use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{CreateGalleryItemRequest, GalleryItem, UpdateGalleryItemRequest},
    error::{AppError, Result},
    repository::{parse_id, GalleryRepository},
};

#[derive(FromRow)]
struct GalleryRow {
    id: String,
    title: String,
    description: Option<String>,
    image_url: String,
    category: String,
    display_order: i32,
    is_active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteGalleryRepository {
    pool: SqlitePool,
}

impl SqliteGalleryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_item(row: GalleryRow) -> Result<GalleryItem> {
        Ok(GalleryItem {
            id: parse_id(&row.id)?,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            category: row.category,
            display_order: row.display_order,
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl GalleryRepository for SqliteGalleryRepository {
    async fn create(&self, item: CreateGalleryItemRequest) -> Result<GalleryItem> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO gallery_items (
                id, title, description, image_url, category, display_order,
                is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.image_url)
        .bind(item.category.trim().to_lowercase())
        .bind(item.display_order.unwrap_or(0))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created gallery item".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GalleryItem>> {
        let row = sqlx::query_as::<_, GalleryRow>(
            r#"
            SELECT id, title, description, image_url, category, display_order,
                   is_active, created_at, updated_at
            FROM gallery_items
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_item).transpose()
    }

    async fn list(&self, active_only: bool, category: Option<&str>) -> Result<Vec<GalleryItem>> {
        let rows = sqlx::query_as::<_, GalleryRow>(
            r#"
            SELECT id, title, description, image_url, category, display_order,
                   is_active, created_at, updated_at
            FROM gallery_items
            WHERE (?1 = 0 OR is_active = 1)
              AND (?2 IS NULL OR category = ?2)
            ORDER BY display_order ASC, created_at DESC
            "#
        )
        .bind(active_only)
        .bind(category.map(|c| c.trim().to_lowercase()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_item)
            .collect()
    }

    async fn update(&self, id: Uuid, update: UpdateGalleryItemRequest) -> Result<GalleryItem> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE gallery_items
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                image_url = COALESCE(?, image_url),
                category = COALESCE(?, category),
                display_order = COALESCE(?, display_order),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.image_url)
        .bind(update.category.as_deref().map(|c| c.trim().to_lowercase()))
        .bind(update.display_order)
        .bind(update.is_active)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Gallery item not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated gallery item".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM gallery_items WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Gallery item not found".to_string()));
        }

        Ok(())
    }
}
