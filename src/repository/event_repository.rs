use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{Attendee, CreateEventRequest, Event, EventRegistration, EventStatus, UpdateEventRequest},
    error::{is_unique_violation, AppError, Result},
    repository::{parse_id, EventRepository},
};

#[derive(FromRow)]
struct EventRow {
    id: String,
    title: String,
    description: String,
    event_date: NaiveDateTime,
    location: Option<String>,
    image_url: Option<String>,
    max_participants: Option<i32>,
    current_participants: i32,
    status: String,
    created_by: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct AttendeeRow {
    user_id: String,
    full_name: String,
    email: String,
    registered_at: NaiveDateTime,
}

#[derive(FromRow)]
struct CapacityRow {
    status: String,
    max_participants: Option<i32>,
    current_participants: i32,
}

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_event(row: EventRow) -> Result<Event> {
        Ok(Event {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            description: row.description,
            event_date: DateTime::from_naive_utc_and_offset(row.event_date, Utc),
            location: row.location,
            image_url: row.image_url,
            max_participants: row.max_participants,
            current_participants: row.current_participants,
            status: Self::parse_status(&row.status)?,
            created_by: Uuid::parse_str(&row.created_by).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_status(s: &str) -> Result<EventStatus> {
        match s {
            "upcoming" => Ok(EventStatus::Upcoming),
            "past" => Ok(EventStatus::Past),
            "cancelled" => Ok(EventStatus::Cancelled),
            _ => Err(AppError::Database(format!("Invalid event status: {}", s))),
        }
    }

    fn status_to_str(status: &EventStatus) -> &'static str {
        match status {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Past => "past",
            EventStatus::Cancelled => "cancelled",
        }
    }

    /// First statement of every capacity transaction. SQLite has no row
    /// locks; this write takes the database write lock before any check is
    /// read, so register/unregister on an event run one at a time.
    async fn lock_event(
        conn: &mut sqlx::SqliteConnection,
        event_id: &str,
    ) -> Result<()> {
        let touched = sqlx::query("UPDATE events SET updated_at = updated_at WHERE id = ?")
            .bind(event_id)
            .execute(conn)
            .await?;

        if touched.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create(&self, created_by: Uuid, event: CreateEventRequest) -> Result<Event> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO events (
                id, title, description, event_date, location, image_url,
                max_participants, current_participants, status, created_by,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(event.title.trim())
        .bind(&event.description)
        .bind(event.event_date.naive_utc())
        .bind(&event.location)
        .bind(&event.image_url)
        .bind(event.max_participants)
        .bind(Self::status_to_str(&EventStatus::Upcoming))
        .bind(created_by.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created event".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, event_date, location, image_url,
                   max_participants, current_participants, status, created_by,
                   created_at, updated_at
            FROM events
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_event(r)?)),
            None => Ok(None)
        }
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, event_date, location, image_url,
                   max_participants, current_participants, status, created_by,
                   created_at, updated_at
            FROM events
            ORDER BY event_date ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_event)
            .collect()
    }

    async fn list_upcoming(&self, limit: i64) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, event_date, location, image_url,
                   max_participants, current_participants, status, created_by,
                   created_at, updated_at
            FROM events
            WHERE status = 'upcoming'
            ORDER BY event_date ASC
            LIMIT ?
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_event)
            .collect()
    }

    async fn update(&self, id: Uuid, update: UpdateEventRequest) -> Result<Event> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        Self::lock_event(&mut *tx, &id_str).await?;

        let current: CapacityRow = sqlx::query_as(
            "SELECT status, max_participants, current_participants FROM events WHERE id = ?"
        )
        .bind(&id_str)
        .fetch_one(&mut *tx)
        .await?;

        let max_participants = match update.max_participants {
            Some(new_max) => new_max,
            None => current.max_participants,
        };

        if let Some(max) = max_participants {
            if max < current.current_participants {
                return Err(AppError::Validation(format!(
                    "max_participants cannot be lower than the {} current registrations",
                    current.current_participants
                )));
            }
        }

        let status_str = match &update.status {
            Some(status) => Self::status_to_str(status).to_string(),
            None => current.status,
        };

        sqlx::query(
            r#"
            UPDATE events
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                event_date = COALESCE(?, event_date),
                location = COALESCE(?, location),
                image_url = COALESCE(?, image_url),
                max_participants = ?,
                status = ?,
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(update.title.as_deref().map(str::trim))
        .bind(&update.description)
        .bind(update.event_date.map(|dt| dt.naive_utc()))
        .bind(&update.location)
        .bind(&update.image_url)
        .bind(max_participants)
        .bind(&status_str)
        .bind(now)
        .bind(&id_str)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated event".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        Ok(())
    }

    async fn register(&self, event_id: Uuid, user_id: Uuid) -> Result<EventRegistration> {
        let event_id_str = event_id.to_string();
        let user_id_str = user_id.to_string();
        let registration_id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        // Any early return drops the transaction, which rolls it back.
        let mut tx = self.pool.begin().await?;

        Self::lock_event(&mut *tx, &event_id_str).await?;

        let already: Option<String> = sqlx::query_scalar(
            "SELECT id FROM event_registrations WHERE event_id = ? AND user_id = ?"
        )
        .bind(&event_id_str)
        .bind(&user_id_str)
        .fetch_optional(&mut *tx)
        .await?;

        if already.is_some() {
            return Err(AppError::Conflict("Already registered for this event".to_string()));
        }

        let capacity: CapacityRow = sqlx::query_as(
            "SELECT status, max_participants, current_participants FROM events WHERE id = ?"
        )
        .bind(&event_id_str)
        .fetch_one(&mut *tx)
        .await?;

        if Self::parse_status(&capacity.status)? != EventStatus::Upcoming {
            return Err(AppError::Validation(format!(
                "Registration is closed for {} events",
                capacity.status
            )));
        }

        if let Some(max) = capacity.max_participants {
            if capacity.current_participants >= max {
                return Err(AppError::CapacityExceeded("Event is full".to_string()));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO event_registrations (id, event_id, user_id, registered_at)
            VALUES (?, ?, ?, ?)
            "#
        )
        .bind(registration_id.to_string())
        .bind(&event_id_str)
        .bind(&user_id_str)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Already registered for this event".to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        sqlx::query(
            "UPDATE events SET current_participants = current_participants + 1 WHERE id = ?"
        )
        .bind(&event_id_str)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(EventRegistration {
            id: registration_id,
            event_id,
            user_id,
            registered_at: DateTime::from_naive_utc_and_offset(now, Utc),
        })
    }

    async fn unregister(&self, event_id: Uuid, user_id: Uuid) -> Result<()> {
        let event_id_str = event_id.to_string();
        let mut tx = self.pool.begin().await?;

        Self::lock_event(&mut *tx, &event_id_str).await?;

        let deleted = sqlx::query(
            "DELETE FROM event_registrations WHERE event_id = ? AND user_id = ?"
        )
        .bind(&event_id_str)
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Registration not found".to_string()));
        }

        sqlx::query(
            "UPDATE events SET current_participants = current_participants - 1 WHERE id = ?"
        )
        .bind(&event_id_str)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn list_registered_events(&self, user_id: Uuid) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT e.id, e.title, e.description, e.event_date, e.location, e.image_url,
                   e.max_participants, e.current_participants, e.status, e.created_by,
                   e.created_at, e.updated_at
            FROM events e
            INNER JOIN event_registrations r ON e.id = r.event_id
            WHERE r.user_id = ?
            ORDER BY e.event_date ASC
            "#
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_event)
            .collect()
    }

    async fn list_attendees(&self, event_id: Uuid) -> Result<Vec<Attendee>> {
        let rows = sqlx::query_as::<_, AttendeeRow>(
            r#"
            SELECT p.id AS user_id, p.full_name, p.email, r.registered_at
            FROM event_registrations r
            INNER JOIN profiles p ON p.id = r.user_id
            WHERE r.event_id = ?
            ORDER BY r.registered_at ASC
            "#
        )
        .bind(event_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Attendee {
                    user_id: parse_id(&row.user_id)?,
                    full_name: row.full_name,
                    email: row.email,
                    registered_at: DateTime::from_naive_utc_and_offset(row.registered_at, Utc),
                })
            })
            .collect()
    }

    async fn count_upcoming(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM events WHERE status = 'upcoming'"
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }
}
