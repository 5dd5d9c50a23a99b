use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub max_participants: Option<i32>,
    pub current_participants: i32,
    pub status: EventStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.max_participants
            .map(|max| self.current_participants >= max)
            .unwrap_or(false)
    }

    pub fn spots_left(&self) -> Option<i32> {
        self.max_participants
            .map(|max| (max - self.current_participants).max(0))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Past,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub registered_at: DateTime<Utc>,
}

/// Attendee listing row for admins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub max_participants: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub image_url: Option<String>,
    /// `Some(None)` clears the limit.
    #[serde(default, with = "crate::domain::double_option")]
    pub max_participants: Option<Option<i32>>,
    pub status: Option<EventStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(max: Option<i32>, current: i32) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Rust night".into(),
            description: "Ownership deep dive".into(),
            event_date: Utc::now(),
            location: None,
            image_url: None,
            max_participants: max,
            current_participants: current,
            status: EventStatus::Upcoming,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unlimited_events_are_never_full() {
        let e = event(None, 500);
        assert!(!e.is_full());
        assert_eq!(e.spots_left(), None);
    }

    #[test]
    fn full_at_capacity() {
        assert!(event(Some(2), 2).is_full());
        assert_eq!(event(Some(2), 1).spots_left(), Some(1));
    }

    #[test]
    fn update_distinguishes_missing_and_null_limit() {
        let missing: UpdateEventRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(missing.max_participants, None);

        let cleared: UpdateEventRequest =
            serde_json::from_str(r#"{"max_participants": null}"#).unwrap();
        assert_eq!(cleared.max_participants, Some(None));

        let set: UpdateEventRequest =
            serde_json::from_str(r#"{"max_participants": 30}"#).unwrap();
        assert_eq!(set.max_participants, Some(Some(30)));
    }
}
