use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{self, AuthService},
    domain::*,
    error::{AppError, Result},
    repository::ProfileRepository,
};

/// Accounts, self-service profile edits and admin member management.
pub struct MembershipService {
    repo: Arc<dyn ProfileRepository>,
    auth_service: Arc<AuthService>,
    pool: sqlx::SqlitePool,
}

impl MembershipService {
    pub fn new(
        repo: Arc<dyn ProfileRepository>,
        auth_service: Arc<AuthService>,
        pool: sqlx::SqlitePool,
    ) -> Self {
        Self { repo, auth_service, pool }
    }

    pub async fn register_account(&self, request: CreateProfileRequest) -> Result<Profile> {
        request.validate()?;

        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = AuthService::hash_password(&request.password).await?;
        let profile = self.repo.create(request, &password_hash).await?;

        tracing::info!(profile_id = %profile.id, "Account registered");
        Ok(profile)
    }

    /// Checks credentials and opens a session, returning the profile and
    /// the raw session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Profile, String)> {
        let password_hash = auth::get_password_hash(&self.pool, email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !AuthService::verify_password(password, &password_hash).await? {
            tracing::debug!("Rejected login with bad password");
            return Err(AppError::Unauthorized);
        }

        let profile = self.repo.find_by_email(email).await?
            .ok_or(AppError::Unauthorized)?;

        let (_session, token) = self.auth_service.create_session(profile.id).await?;
        Ok((profile, token))
    }

    pub async fn update_profile(&self, actor: &Profile, update: UpdateProfileRequest) -> Result<Profile> {
        update.validate()?;
        self.repo.update(actor.id, update).await
    }

    /// Self-removal from the club.
    pub async fn leave_club(&self, actor: &Profile) -> Result<Profile> {
        if actor.is_admin() {
            return Err(AppError::Conflict(
                "Admins must hand over their role before leaving".to_string(),
            ));
        }

        let events = self.repo.remove_membership(actor.id).await?;
        tracing::info!(profile_id = %actor.id, dropped_registrations = events.len(), "Member left the club");

        self.require(actor.id).await
    }

    pub async fn list_members(&self, actor: &Profile, status: Option<ProfileStatus>) -> Result<Vec<Profile>> {
        require_admin(actor)?;
        self.repo.list(status).await
    }

    pub async fn remove_member(&self, actor: &Profile, id: Uuid) -> Result<Profile> {
        require_admin(actor)?;

        let events = self.repo.remove_membership(id).await?;
        tracing::info!(
            profile_id = %id,
            removed_by = %actor.id,
            dropped_registrations = events.len(),
            "Member removed"
        );

        self.require(id).await
    }

    pub async fn set_role(&self, actor: &Profile, id: Uuid, role: Role) -> Result<Profile> {
        require_admin(actor)?;

        if actor.id == id && role != Role::Admin {
            return Err(AppError::Conflict("Admins cannot demote themselves".to_string()));
        }

        let profile = self.repo.set_role(id, role).await?;
        tracing::info!(profile_id = %id, role = role.as_str(), changed_by = %actor.id, "Role changed");
        Ok(profile)
    }

    async fn require(&self, id: Uuid) -> Result<Profile> {
        self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }
}

pub(crate) fn require_admin(actor: &Profile) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub(crate) fn require_approved(actor: &Profile) -> Result<()> {
    if actor.is_approved() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
