use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{CreateTeamMemberRequest, TeamMember, UpdateTeamMemberRequest},
    error::{AppError, Result},
    repository::{decode_list, encode_list, parse_id, TeamRepository},
};

#[derive(FromRow)]
struct TeamRow {
    id: String,
    name: String,
    role: String,
    description: Option<String>,
    avatar_url: Option<String>,
    expertise: String,
    achievements: String,
    social_links: String,
    display_order: i32,
    is_active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteTeamRepository {
    pool: SqlitePool,
}

impl SqliteTeamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_member(row: TeamRow) -> Result<TeamMember> {
        let social_links = serde_json::from_str(&row.social_links)
            .map_err(|e| AppError::Database(format!("Invalid social_links: {}", e)))?;

        Ok(TeamMember {
            id: parse_id(&row.id)?,
            name: row.name,
            role: row.role,
            description: row.description,
            avatar_url: row.avatar_url,
            expertise: decode_list(&row.expertise)?,
            achievements: decode_list(&row.achievements)?,
            social_links,
            display_order: row.display_order,
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn encode_links(links: &serde_json::Map<String, serde_json::Value>) -> Result<String> {
        serde_json::to_string(links).map_err(|e| AppError::Internal(e.to_string()))
    }
}

#[async_trait]
impl TeamRepository for SqliteTeamRepository {
    async fn create(&self, member: CreateTeamMemberRequest) -> Result<TeamMember> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO team_members (
                id, name, role, description, avatar_url, expertise, achievements,
                social_links, display_order, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.description)
        .bind(&member.avatar_url)
        .bind(encode_list(&member.expertise)?)
        .bind(encode_list(&member.achievements)?)
        .bind(Self::encode_links(&member.social_links)?)
        .bind(member.display_order.unwrap_or(0))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created team member".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamMember>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, role, description, avatar_url, expertise, achievements,
                   social_links, display_order, is_active, created_at, updated_at
            FROM team_members
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_member).transpose()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<TeamMember>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, role, description, avatar_url, expertise, achievements,
                   social_links, display_order, is_active, created_at, updated_at
            FROM team_members
            WHERE (? = 0 OR is_active = 1)
            ORDER BY display_order ASC, name ASC
            "#
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_member)
            .collect()
    }

    async fn update(&self, id: Uuid, update: UpdateTeamMemberRequest) -> Result<TeamMember> {
        let now = Utc::now().naive_utc();
        let expertise = update.expertise.as_deref().map(encode_list).transpose()?;
        let achievements = update.achievements.as_deref().map(encode_list).transpose()?;
        let social_links = update.social_links.as_ref().map(Self::encode_links).transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE team_members
            SET name = COALESCE(?, name),
                role = COALESCE(?, role),
                description = COALESCE(?, description),
                avatar_url = COALESCE(?, avatar_url),
                expertise = COALESCE(?, expertise),
                achievements = COALESCE(?, achievements),
                social_links = COALESCE(?, social_links),
                display_order = COALESCE(?, display_order),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&update.name)
        .bind(&update.role)
        .bind(&update.description)
        .bind(&update.avatar_url)
        .bind(expertise)
        .bind(achievements)
        .bind(social_links)
        .bind(update.display_order)
        .bind(update.is_active)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Team member not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated team member".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Team member not found".to_string()));
        }

        Ok(())
    }
}
