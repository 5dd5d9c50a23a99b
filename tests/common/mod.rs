#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, time::Duration as StdDuration};

use chrono::{Duration, Utc};
use clubhouse::{
    auth::AuthService,
    domain::{CreateEventRequest, CreateProfileRequest, Decision, Event, Profile, Role, SubmitApplicationRequest},
    service::ServiceContext,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

/// Every connection to `sqlite::memory:` opens its own empty database, so
/// the pool is pinned to a single long-lived connection.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

pub async fn test_context() -> anyhow::Result<Arc<ServiceContext>> {
    let pool = test_pool().await?;
    let auth_service = Arc::new(AuthService::new(pool.clone(), 24, false));
    Ok(Arc::new(ServiceContext::new(auth_service, pool)))
}

/// A database file shared by several real connections, for tests that need
/// writers to contend. Call `remove_database` with the returned path when done.
pub async fn file_context(max_connections: u32) -> anyhow::Result<(Arc<ServiceContext>, PathBuf)> {
    let path = std::env::temp_dir().join(format!("clubhouse-{}.db", uuid::Uuid::new_v4()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(StdDuration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let auth_service = Arc::new(AuthService::new(pool.clone(), 24, false));
    Ok((Arc::new(ServiceContext::new(auth_service, pool)), path))
}

pub async fn remove_database(ctx: Arc<ServiceContext>, path: PathBuf) {
    ctx.db_pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

/// A fresh pending account. Skips password hashing; these accounts never log in.
pub async fn account(ctx: &ServiceContext, email: &str) -> anyhow::Result<Profile> {
    let profile = ctx.profile_repo.create(
        CreateProfileRequest {
            email: email.to_string(),
            password: String::new(),
            full_name: format!("User {}", email.split('@').next().unwrap_or(email)),
        },
        "unused-hash",
    ).await?;
    Ok(profile)
}

pub fn application(profile: &Profile) -> SubmitApplicationRequest {
    SubmitApplicationRequest {
        email: profile.email.clone(),
        full_name: profile.full_name.clone(),
        motivation: "I want to build things with other students.".to_string(),
        experience: Some("Two semesters of systems programming".to_string()),
        skills: vec!["rust".to_string(), "Rust ".to_string(), "web".to_string()],
        github_username: None,
        linkedin_username: None,
    }
}

/// The first admin approves their own application; later admins go
/// through the normal service path.
pub async fn admin(ctx: &ServiceContext) -> anyhow::Result<Profile> {
    let profile = account(ctx, "admin@club.test").await?;
    let app = ctx.application_repo.create(profile.id, application(&profile)).await?;
    ctx.application_repo.decide(app.id, Decision::Approve, profile.id).await?;
    Ok(ctx.profile_repo.set_role(profile.id, Role::Admin).await?)
}

pub async fn approved_member(ctx: &ServiceContext, admin: &Profile, email: &str) -> anyhow::Result<Profile> {
    let profile = account(ctx, email).await?;
    let app = ctx.application_service.submit(&profile, application(&profile)).await?;
    ctx.application_service.decide(admin, app.id, Decision::Approve).await?;
    Ok(reload(ctx, &profile).await?)
}

pub async fn reload(ctx: &ServiceContext, profile: &Profile) -> anyhow::Result<Profile> {
    ctx.profile_repo
        .find_by_id(profile.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("profile {} vanished", profile.id))
}

pub async fn event(ctx: &ServiceContext, admin: &Profile, max_participants: Option<i32>) -> anyhow::Result<Event> {
    let event = ctx.event_service.create(admin, CreateEventRequest {
        title: "Hack Night".to_string(),
        description: "Bring a laptop and a project.".to_string(),
        event_date: Utc::now() + Duration::days(7),
        location: Some("Lab 2".to_string()),
        image_url: None,
        max_participants,
    }).await?;
    Ok(event)
}
