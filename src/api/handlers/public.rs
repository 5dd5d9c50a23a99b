use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{
        ActionOutcome, ContactMessage, CreateContactRequest, Event, GalleryItem, Stat,
        SubscribeRequest, TeamMember, UnsubscribeRequest,
    },
    error::{AppError, Result},
};
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct PublicEventsQuery {
    pub limit: Option<i64>,
    pub format: Option<String>, // "json" or "ical"
}

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
}

/// Event as shown on the public site, with the remaining capacity.
#[derive(Debug, Serialize)]
pub struct EventDto {
    #[serde(flatten)]
    pub event: Event,
    pub spots_left: Option<i32>,
    pub is_full: bool,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            spots_left: event.spots_left(),
            is_full: event.is_full(),
            event,
        }
    }
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<PublicEventsQuery>,
) -> Result<Response> {
    let events = state.service_context.event_service
        .list_upcoming(params.limit.unwrap_or(50))
        .await?;

    match params.format.as_deref() {
        None | Some("json") => {
            let events: Vec<EventDto> = events.into_iter().map(Into::into).collect();
            Ok(Json(events).into_response())
        }
        Some("ical") => Ok(calendar_response(&state, &events)),
        Some(other) => Err(AppError::BadRequest(format!(
            "Unsupported format '{}', expected json or ical",
            other
        ))),
    }
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDto>> {
    let event = state.service_context.event_service.get(id).await?;
    Ok(Json(event.into()))
}

pub async fn calendar_feed(
    State(state): State<AppState>,
) -> Result<Response> {
    let events = state.service_context.event_service.list_upcoming(200).await?;
    Ok(calendar_response(&state, &events))
}

fn calendar_response(state: &AppState, events: &[Event]) -> Response {
    let ical = generate_ical_feed(
        &state.settings.club.calendar_name,
        &state.settings.server.base_url,
        events,
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        ical,
    ).into_response()
}

pub async fn list_gallery(
    State(state): State<AppState>,
    Query(params): Query<GalleryQuery>,
) -> Result<Json<Vec<GalleryItem>>> {
    let items = state.service_context.gallery_repo
        .list(true, params.category.as_deref())
        .await?;
    Ok(Json(items))
}

pub async fn list_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<Stat>>> {
    let stats = state.service_context.stat_repo.list(true).await?;
    Ok(Json(stats))
}

pub async fn list_team(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamMember>>> {
    let team = state.service_context.team_repo.list(true).await?;
    Ok(Json(team))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<ContactMessage>)> {
    request.validate()?;

    let message = state.service_context.contact_repo.create(request).await?;
    tracing::info!(message_id = %message.id, "Contact message received");

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<ActionOutcome>> {
    let result = state.service_context.newsletter_service
        .subscribe(request)
        .await;

    outcome(result, "Thanks for subscribing to our newsletter!")
}

pub async fn unsubscribe_newsletter(
    State(state): State<AppState>,
    Json(request): Json<UnsubscribeRequest>,
) -> Result<Json<ActionOutcome>> {
    let result = state.service_context.newsletter_service
        .unsubscribe(request)
        .await;

    outcome(result, "You have been unsubscribed from the newsletter.")
}

/// Renders a service result as the `{success, message}` envelope. Refusals
/// the user can act on become `success: false`; infrastructure errors still
/// propagate as error responses.
pub(crate) fn outcome<T>(result: Result<T>, success_message: &str) -> Result<Json<ActionOutcome>> {
    match result {
        Ok(_) => Ok(Json(ActionOutcome::ok(success_message))),
        Err(e) if e.is_user_facing() => Ok(Json(ActionOutcome::refused(e.message()))),
        Err(e) => Err(e),
    }
}

fn escape_ical_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

fn generate_ical_feed(calendar_name: &str, base_url: &str, events: &[Event]) -> String {
    let mut ical = String::from("BEGIN:VCALENDAR\r\n");
    ical.push_str("VERSION:2.0\r\n");
    ical.push_str("PRODID:-//Clubhouse//Events//EN\r\n");
    ical.push_str("CALSCALE:GREGORIAN\r\n");
    ical.push_str("METHOD:PUBLISH\r\n");
    ical.push_str(&format!("X-WR-CALNAME:{}\r\n", escape_ical_text(calendar_name)));

    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");

    for event in events {
        ical.push_str("BEGIN:VEVENT\r\n");
        ical.push_str(&format!("UID:{}\r\n", event.id));
        ical.push_str(&format!("DTSTAMP:{}\r\n", stamp));
        ical.push_str(&format!("DTSTART:{}\r\n", event.event_date.format("%Y%m%dT%H%M%SZ")));
        ical.push_str(&format!("SUMMARY:{}\r\n", escape_ical_text(&event.title)));
        ical.push_str(&format!("DESCRIPTION:{}\r\n", escape_ical_text(&event.description)));
        ical.push_str(&format!(
            "URL:{}/public/events/{}\r\n",
            base_url.trim_end_matches('/'),
            event.id
        ));

        if let Some(location) = &event.location {
            ical.push_str(&format!("LOCATION:{}\r\n", escape_ical_text(location)));
        }

        ical.push_str(&format!("CREATED:{}\r\n", event.created_at.format("%Y%m%dT%H%M%SZ")));
        ical.push_str(&format!("LAST-MODIFIED:{}\r\n", event.updated_at.format("%Y%m%dT%H%M%SZ")));
        ical.push_str("STATUS:CONFIRMED\r\n");
        ical.push_str("END:VEVENT\r\n");
    }

    ical.push_str("END:VCALENDAR\r\n");
    ical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventStatus;

    #[test]
    fn ical_text_is_escaped() {
        assert_eq!(escape_ical_text("a,b;c\\d\ne"), "a\\,b\\;c\\\\d\\ne");
    }

    #[test]
    fn ical_feed_contains_one_vevent_per_event() {
        let event = Event {
            id: Uuid::new_v4(),
            title: "Hack night, vol. 2".into(),
            description: "Bring a laptop".into(),
            event_date: Utc::now(),
            location: Some("Room 301".into()),
            image_url: None,
            max_participants: Some(30),
            current_participants: 4,
            status: EventStatus::Upcoming,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let id = event.id;
        let feed = generate_ical_feed("Code Club Events", "https://club.test/", &[event.clone(), event]);
        assert!(feed.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(feed.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(feed.matches("BEGIN:VEVENT").count(), 2);
        assert!(feed.contains("SUMMARY:Hack night\\, vol. 2\r\n"));
        assert!(feed.contains("LOCATION:Room 301\r\n"));
        assert!(feed.contains(&format!("URL:https://club.test/public/events/{}\r\n", id)));
    }

    #[test]
    fn user_facing_errors_become_refusals() {
        let refused = outcome::<()>(Err(AppError::Conflict("already".into())), "done").unwrap();
        assert_eq!(refused.0, ActionOutcome::refused("already"));

        let ok = outcome(Ok(()), "done").unwrap();
        assert!(ok.0.success);

        assert!(outcome::<()>(Err(AppError::Database("io".into())), "done").is_err());
    }
}
