use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::EventRepository,
    service::membership_service::require_admin,
};

pub struct EventService {
    repo: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    pub async fn list_upcoming(&self, limit: i64) -> Result<Vec<Event>> {
        self.repo.list_upcoming(limit.clamp(1, 200)).await
    }

    pub async fn list_all(&self, actor: &Profile) -> Result<Vec<Event>> {
        require_admin(actor)?;
        self.repo.list().await
    }

    pub async fn create(&self, actor: &Profile, request: CreateEventRequest) -> Result<Event> {
        require_admin(actor)?;
        request.validate()?;

        let event = self.repo.create(actor.id, request).await?;
        tracing::info!(event_id = %event.id, created_by = %actor.id, "Event created");
        Ok(event)
    }

    pub async fn update(&self, actor: &Profile, id: Uuid, request: UpdateEventRequest) -> Result<Event> {
        require_admin(actor)?;
        request.validate()?;

        if let Some(Some(max)) = request.max_participants {
            if max < 1 {
                return Err(AppError::Validation("max_participants must be at least 1".to_string()));
            }
        }

        self.repo.update(id, request).await
    }

    pub async fn cancel(&self, actor: &Profile, id: Uuid) -> Result<Event> {
        require_admin(actor)?;

        let update = UpdateEventRequest {
            status: Some(EventStatus::Cancelled),
            ..Default::default()
        };
        let event = self.repo.update(id, update).await?;
        tracing::info!(event_id = %id, "Event cancelled");
        Ok(event)
    }

    pub async fn delete(&self, actor: &Profile, id: Uuid) -> Result<()> {
        require_admin(actor)?;
        self.repo.delete(id).await?;
        tracing::info!(event_id = %id, deleted_by = %actor.id, "Event deleted");
        Ok(())
    }
}
