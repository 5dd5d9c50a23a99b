use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{handlers::public::EventDto, middleware::auth::CurrentUser, state::AppState},
    domain::EventRegistration,
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct MemberEventDto {
    #[serde(flatten)]
    pub event: EventDto,
    pub is_registered: bool,
}

/// Upcoming events annotated with the caller's registration state, as the
/// member dashboard shows them.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<MemberEventDto>>> {
    let ctx = &state.service_context;
    let events = ctx.event_service.list_upcoming(200).await?;
    let registered: Vec<Uuid> = ctx.registration_service
        .my_events(&user.profile)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();

    let events = events
        .into_iter()
        .map(|event| MemberEventDto {
            is_registered: registered.contains(&event.id),
            event: event.into(),
        })
        .collect();

    Ok(Json(events))
}

pub async fn register(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<EventRegistration>)> {
    let registration = state.service_context.registration_service
        .register(&user.profile, id)
        .await?;

    Ok((StatusCode::CREATED, Json(registration)))
}

pub async fn unregister(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.registration_service
        .unregister(&user.profile, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn my_registrations(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<EventDto>>> {
    let events = state.service_context.registration_service
        .my_events(&user.profile)
        .await?;

    Ok(Json(events.into_iter().map(Into::into).collect()))
}
