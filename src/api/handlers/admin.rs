use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{handlers::public::EventDto, middleware::auth::CurrentUser, state::AppState},
    domain::{
        ApplicationStatus, Attendee, ContactMessage, ContactStatus, CreateEventRequest, Decision,
        MemberApplication, NewsletterSubscription, Profile, ProfileStatus, Role,
        SubscriptionStatus, UpdateEventRequest,
    },
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ApplicationQuery {
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct MemberQuery {
    pub status: Option<ProfileStatus>,
}

#[derive(Debug, Deserialize)]
pub struct NewsletterQuery {
    pub status: Option<SubscriptionStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    pub status: Option<ContactStatus>,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct ContactStatusRequest {
    pub status: ContactStatus,
}

#[derive(Debug, Serialize)]
pub struct AdminSummary {
    pub pending_applications: i64,
    pub approved_members: i64,
    pub upcoming_events: i64,
    pub newsletter_subscribers: i64,
    pub new_contact_messages: i64,
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<AdminSummary>> {
    let ctx = &state.service_context;

    let (pending_applications, approved_members, upcoming_events, newsletter_subscribers, new_contact_messages) =
        tokio::try_join!(
            ctx.application_repo.count_pending(),
            ctx.profile_repo.count_by_status(ProfileStatus::Approved),
            ctx.event_repo.count_upcoming(),
            ctx.newsletter_repo.count_active(),
            ctx.contact_repo.count_new(),
        )?;

    Ok(Json(AdminSummary {
        pending_applications,
        approved_members,
        upcoming_events,
        newsletter_subscribers,
        new_contact_messages,
    }))
}

// Applications

pub async fn list_applications(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ApplicationQuery>,
) -> Result<Json<Vec<MemberApplication>>> {
    let applications = state.service_context.application_service
        .list(&user.profile, query.status)
        .await?;
    Ok(Json(applications))
}

pub async fn approve_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberApplication>> {
    let application = state.service_context.application_service
        .decide(&user.profile, id, Decision::Approve)
        .await?;
    Ok(Json(application))
}

pub async fn reject_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberApplication>> {
    let application = state.service_context.application_service
        .decide(&user.profile, id, Decision::Reject)
        .await?;
    Ok(Json(application))
}

// Members

pub async fn list_members(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<MemberQuery>,
) -> Result<Json<Vec<Profile>>> {
    let members = state.service_context.membership_service
        .list_members(&user.profile, query.status)
        .await?;
    Ok(Json(members))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>> {
    let profile = state.service_context.membership_service
        .remove_member(&user.profile, id)
        .await?;
    Ok(Json(profile))
}

pub async fn set_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<RoleRequest>,
) -> Result<Json<Profile>> {
    let profile = state.service_context.membership_service
        .set_role(&user.profile, id, request.role)
        .await?;
    Ok(Json(profile))
}

// Events

pub async fn list_events(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<EventDto>>> {
    let events = state.service_context.event_service
        .list_all(&user.profile)
        .await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

pub async fn create_event(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventDto>)> {
    let event = state.service_context.event_service
        .create(&user.profile, request)
        .await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

pub async fn update_event(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<EventDto>> {
    let event = state.service_context.event_service
        .update(&user.profile, id, request)
        .await?;
    Ok(Json(event.into()))
}

pub async fn cancel_event(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDto>> {
    let event = state.service_context.event_service
        .cancel(&user.profile, id)
        .await?;
    Ok(Json(event.into()))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.event_service
        .delete(&user.profile, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn event_registrations(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Attendee>>> {
    let attendees = state.service_context.registration_service
        .attendees(&user.profile, id)
        .await?;
    Ok(Json(attendees))
}

// Newsletter and contact inbox

pub async fn list_subscribers(
    State(state): State<AppState>,
    Query(query): Query<NewsletterQuery>,
) -> Result<Json<Vec<NewsletterSubscription>>> {
    let subscribers = state.service_context.newsletter_repo.list(query.status).await?;
    Ok(Json(subscribers))
}

pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> Result<Json<Vec<ContactMessage>>> {
    let messages = state.service_context.contact_repo.list(query.status).await?;
    Ok(Json(messages))
}

pub async fn set_contact_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ContactStatusRequest>,
) -> Result<Json<ContactMessage>> {
    let message = state.service_context.contact_repo
        .update_status(id, request.status)
        .await?;
    Ok(Json(message))
}
