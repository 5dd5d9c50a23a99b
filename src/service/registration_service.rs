use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::*,
    error::Result,
    repository::EventRepository,
    service::membership_service::{require_admin, require_approved},
};

/// Event sign-ups. The repository keeps `current_participants` equal to
/// the number of registrations; this layer decides who may sign up.
pub struct RegistrationService {
    repo: Arc<dyn EventRepository>,
}

impl RegistrationService {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    pub async fn register(&self, actor: &Profile, event_id: Uuid) -> Result<EventRegistration> {
        require_approved(actor)?;

        let registration = self.repo.register(event_id, actor.id).await?;
        tracing::info!(event_id = %event_id, user_id = %actor.id, "Registered for event");
        Ok(registration)
    }

    pub async fn unregister(&self, actor: &Profile, event_id: Uuid) -> Result<()> {
        self.repo.unregister(event_id, actor.id).await?;
        tracing::info!(event_id = %event_id, user_id = %actor.id, "Unregistered from event");
        Ok(())
    }

    pub async fn my_events(&self, actor: &Profile) -> Result<Vec<Event>> {
        self.repo.list_registered_events(actor.id).await
    }

    pub async fn attendees(&self, actor: &Profile, event_id: Uuid) -> Result<Vec<Attendee>> {
        require_admin(actor)?;
        self.repo.list_attendees(event_id).await
    }
}
