use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    api::{handlers::public::outcome, middleware::auth::CurrentUser, state::AppState},
    domain::{ActionOutcome, MemberApplication, SubmitApplicationRequest},
    error::Result,
};

pub async fn submit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<Json<ActionOutcome>> {
    let result = state.service_context.application_service
        .submit(&user.profile, request)
        .await;

    outcome(
        result,
        "Your application has been submitted. An admin will review it shortly.",
    )
}

pub async fn mine(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<MemberApplication>>> {
    let applications = state.service_context.application_service
        .mine(&user.profile)
        .await?;

    Ok(Json(applications))
}
