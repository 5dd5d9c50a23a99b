use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Profile, UpdateProfileRequest},
    error::Result,
};

pub async fn get(Extension(user): Extension<CurrentUser>) -> Json<Profile> {
    Json(user.profile)
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(update): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let profile = state.service_context.membership_service
        .update_profile(&user.profile, update)
        .await?;

    Ok(Json(profile))
}

pub async fn leave(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Profile>> {
    let profile = state.service_context.membership_service
        .leave_club(&user.profile)
        .await?;

    Ok(Json(profile))
}
