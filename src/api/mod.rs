pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Account routes
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .merge(session_auth_routes(app_state.clone()))

        // Public routes (for the website)
        .nest("/public", public_routes())

        // Signed-in routes
        .nest("/api", api_routes(app_state.clone()))

        // Admin routes
        .nest("/admin", admin_routes(app_state.clone()))

        .with_state(app_state)

        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn session_auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route_layer(from_fn_with_state(state, middleware::auth::require_session))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(handlers::public::list_events))
        .route("/events/:id", get(handlers::public::get_event))
        .route("/feed/calendar", get(handlers::public::calendar_feed))
        .route("/gallery", get(handlers::public::list_gallery))
        .route("/stats", get(handlers::public::list_stats))
        .route("/team", get(handlers::public::list_team))
        .route("/contact", post(handlers::public::submit_contact))
        .route("/newsletter/subscribe", post(handlers::public::subscribe_newsletter))
        .route("/newsletter/unsubscribe", post(handlers::public::unsubscribe_newsletter))
}

fn api_routes(state: AppState) -> Router<AppState> {
    // Applicants are signed in but not yet approved.
    let applicant = Router::new()
        .route("/applications", post(handlers::applications::submit))
        .route("/applications/mine", get(handlers::applications::mine))
        .route("/profile", get(handlers::profile::get).put(handlers::profile::update))
        .route_layer(from_fn_with_state(state.clone(), middleware::auth::require_session));

    let member = Router::new()
        .route("/events", get(handlers::events::list))
        .route(
            "/events/:id/register",
            post(handlers::events::register).delete(handlers::events::unregister),
        )
        .route("/registrations", get(handlers::events::my_registrations))
        .route("/profile/leave", post(handlers::profile::leave))
        .route_layer(from_fn_with_state(state, middleware::auth::require_member));

    applicant.merge(member)
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::admin::summary))
        // Membership applications
        .route("/applications", get(handlers::admin::list_applications))
        .route("/applications/:id/approve", post(handlers::admin::approve_application))
        .route("/applications/:id/reject", post(handlers::admin::reject_application))
        // Members
        .route("/members", get(handlers::admin::list_members))
        .route("/members/:id/remove", post(handlers::admin::remove_member))
        .route("/members/:id/role", put(handlers::admin::set_role))
        // Events
        .route("/events", get(handlers::admin::list_events).post(handlers::admin::create_event))
        .route("/events/:id", put(handlers::admin::update_event).delete(handlers::admin::delete_event))
        .route("/events/:id/cancel", post(handlers::admin::cancel_event))
        .route("/events/:id/registrations", get(handlers::admin::event_registrations))
        // Site content
        .route("/gallery", get(handlers::content::list_gallery).post(handlers::content::create_gallery_item))
        .route(
            "/gallery/:id",
            put(handlers::content::update_gallery_item).delete(handlers::content::delete_gallery_item),
        )
        .route("/stats", get(handlers::content::list_stats).post(handlers::content::create_stat))
        .route("/stats/:id", put(handlers::content::update_stat).delete(handlers::content::delete_stat))
        .route("/team", get(handlers::content::list_team).post(handlers::content::create_team_member))
        .route(
            "/team/:id",
            put(handlers::content::update_team_member).delete(handlers::content::delete_team_member),
        )
        // Newsletter and contact inbox
        .route("/newsletter", get(handlers::admin::list_subscribers))
        .route("/contacts", get(handlers::admin::list_contacts))
        .route("/contacts/:id/status", put(handlers::admin::set_contact_status))
        .route_layer(from_fn_with_state(state, middleware::auth::require_admin))
}
