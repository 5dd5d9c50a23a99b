mod common;

use clubhouse::{
    domain::{CreateProfileRequest, ProfileStatus, Role, UpdateProfileRequest},
    error::AppError,
    repository::{ProfileRepository, SqliteProfileRepository},
};
use common::{admin, approved_member, test_context, test_pool};

fn signup(email: &str) -> CreateProfileRequest {
    CreateProfileRequest {
        email: email.to_string(),
        password: "secure_password123".to_string(),
        full_name: "Test User".to_string(),
    }
}

#[tokio::test]
async fn test_profile_crud() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteProfileRepository::new(pool);

    let profile = repo.create(signup("Test@Example.com "), "hash").await?;
    assert_eq!(profile.email, "test@example.com");
    assert_eq!(profile.role, Role::Member);
    assert_eq!(profile.status, ProfileStatus::Pending);
    assert!(profile.skills.is_empty());

    // Lookups are case-insensitive on email
    let found = repo.find_by_email("TEST@example.com").await?;
    assert_eq!(found.map(|p| p.id), Some(profile.id));

    let update = UpdateProfileRequest {
        bio: Some(Some("Hardware tinkerer".to_string())),
        skills: Some(vec!["C".to_string(), " c ".to_string(), "Verilog".to_string()]),
        github_username: Some(Some("tinker".to_string())),
        ..Default::default()
    };
    let updated = repo.update(profile.id, update).await?;
    assert_eq!(updated.full_name, "Test User");
    assert_eq!(updated.bio.as_deref(), Some("Hardware tinkerer"));
    assert_eq!(updated.skills, vec!["C".to_string(), "Verilog".to_string()]);
    assert_eq!(updated.github_username.as_deref(), Some("tinker"));

    // Explicit nulls and blanks clear; absent fields are untouched.
    let clear = UpdateProfileRequest {
        bio: Some(None),
        github_username: Some(Some("   ".to_string())),
        ..Default::default()
    };
    let cleared = repo.update(profile.id, clear).await?;
    assert_eq!(cleared.bio, None);
    assert_eq!(cleared.github_username, None);
    assert_eq!(cleared.skills, vec!["C".to_string(), "Verilog".to_string()]);

    assert_eq!(repo.list(None).await?.len(), 1);
    assert!(repo.list(Some(ProfileStatus::Approved)).await?.is_empty());
    assert_eq!(repo.count_by_status(ProfileStatus::Pending).await?, 1);

    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteProfileRepository::new(pool);

    repo.create(signup("dup@example.com"), "hash").await?;
    let second = repo.create(signup("DUP@example.com"), "hash").await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    Ok(())
}

#[tokio::test]
async fn only_approved_profiles_become_admins() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteProfileRepository::new(pool);
    let pending = repo.create(signup("pending@example.com"), "hash").await?;

    let result = repo.set_role(pending.id, Role::Admin).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let missing = repo.set_role(uuid::Uuid::new_v4(), Role::Admin).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn admins_stay_approved() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;

    // The schema refuses an admin outside the approved status.
    let demote_status = sqlx::query("UPDATE profiles SET status = 'rejected' WHERE id = ?")
        .bind(admin.id.to_string())
        .execute(&ctx.db_pool)
        .await;
    assert!(demote_status.is_err());

    let leave = ctx.membership_service.leave_club(&admin).await;
    assert!(matches!(leave, Err(AppError::Conflict(_))));

    let self_demote = ctx.membership_service.set_role(&admin, admin.id, Role::Member).await;
    assert!(matches!(self_demote, Err(AppError::Conflict(_))));

    Ok(())
}

#[tokio::test]
async fn admins_manage_roles() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let member = approved_member(&ctx, &admin, "helper@club.test").await?;

    let forbidden = ctx.membership_service.set_role(&member, member.id, Role::Admin).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let promoted = ctx.membership_service.set_role(&admin, member.id, Role::Admin).await?;
    assert!(promoted.is_admin());

    // The new admin can hand the role back to the original one.
    let demoted = ctx.membership_service.set_role(&promoted, admin.id, Role::Member).await?;
    assert_eq!(demoted.role, Role::Member);
    assert_eq!(demoted.status, ProfileStatus::Approved);

    let members = ctx.membership_service.list_members(&promoted, Some(ProfileStatus::Approved)).await?;
    assert_eq!(members.len(), 2);

    Ok(())
}

#[tokio::test]
async fn account_registration_and_login() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let profile = ctx.membership_service.register_account(signup("login@club.test")).await?;
    let (logged_in, token) = ctx.membership_service.login("login@club.test", "secure_password123").await?;
    assert_eq!(logged_in.id, profile.id);

    let session = ctx.auth_service.validate_session(&token).await?;
    assert_eq!(session.map(|s| s.profile_id), Some(profile.id));

    let wrong = ctx.membership_service.login("login@club.test", "not-the-password").await;
    assert!(matches!(wrong, Err(AppError::Unauthorized)));

    let short = ctx.membership_service.register_account(CreateProfileRequest {
        password: "short".to_string(),
        ..signup("other@club.test")
    }).await;
    assert!(matches!(short, Err(AppError::Validation(_))));

    ctx.auth_service.invalidate_session(&token).await?;
    assert!(ctx.auth_service.validate_session(&token).await?.is_none());

    Ok(())
}
