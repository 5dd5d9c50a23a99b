use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::{
        CreateGalleryItemRequest, CreateStatRequest, CreateTeamMemberRequest, GalleryItem, Stat,
        TeamMember, UpdateGalleryItemRequest, UpdateStatRequest, UpdateTeamMemberRequest,
    },
    error::Result,
};

// Admin views list everything, hidden items included.

pub async fn list_gallery(State(state): State<AppState>) -> Result<Json<Vec<GalleryItem>>> {
    Ok(Json(state.service_context.gallery_repo.list(false, None).await?))
}

pub async fn create_gallery_item(
    State(state): State<AppState>,
    Json(request): Json<CreateGalleryItemRequest>,
) -> Result<(StatusCode, Json<GalleryItem>)> {
    request.validate()?;
    let item = state.service_context.gallery_repo.create(request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateGalleryItemRequest>,
) -> Result<Json<GalleryItem>> {
    request.validate()?;
    Ok(Json(state.service_context.gallery_repo.update(id, request).await?))
}

pub async fn delete_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.gallery_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_stats(State(state): State<AppState>) -> Result<Json<Vec<Stat>>> {
    Ok(Json(state.service_context.stat_repo.list(false).await?))
}

pub async fn create_stat(
    State(state): State<AppState>,
    Json(request): Json<CreateStatRequest>,
) -> Result<(StatusCode, Json<Stat>)> {
    request.validate()?;
    let stat = state.service_context.stat_repo.create(request).await?;
    Ok((StatusCode::CREATED, Json(stat)))
}

pub async fn update_stat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatRequest>,
) -> Result<Json<Stat>> {
    request.validate()?;
    Ok(Json(state.service_context.stat_repo.update(id, request).await?))
}

pub async fn delete_stat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.stat_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_team(State(state): State<AppState>) -> Result<Json<Vec<TeamMember>>> {
    Ok(Json(state.service_context.team_repo.list(false).await?))
}

pub async fn create_team_member(
    State(state): State<AppState>,
    Json(request): Json<CreateTeamMemberRequest>,
) -> Result<(StatusCode, Json<TeamMember>)> {
    request.validate()?;
    let member = state.service_context.team_repo.create(request).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_team_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTeamMemberRequest>,
) -> Result<Json<TeamMember>> {
    request.validate()?;
    Ok(Json(state.service_context.team_repo.update(id, request).await?))
}

pub async fn delete_team_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.team_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
