use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    auth::SESSION_COOKIE,
    domain::Profile,
    error::{AppError, Result},
};

/// The caller behind the session cookie. Handlers pass `&user.profile`
/// explicitly into every service call that depends on who is asking.
#[derive(Clone)]
pub struct CurrentUser {
    pub profile: Profile,
}

async fn resolve_user(state: &AppState, jar: &CookieJar) -> Result<CurrentUser> {
    let session_cookie = jar
        .get(SESSION_COOKIE)
        .ok_or(AppError::Unauthorized)?;

    let session = state.service_context.auth_service
        .validate_session(session_cookie.value())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let profile = state.service_context.profile_repo
        .find_by_id(session.profile_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(CurrentUser { profile })
}

/// Any signed-in account, whatever its membership status. Pending and
/// rejected applicants need this to apply and to see their status.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user = resolve_user(&state, &jar).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Approved members only.
pub async fn require_member(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user = resolve_user(&state, &jar).await?;

    if !user.profile.is_approved() {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user = resolve_user(&state, &jar).await?;

    if !user.profile.is_admin() {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
