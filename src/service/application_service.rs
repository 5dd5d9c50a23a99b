use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::ApplicationRepository,
    service::membership_service::require_admin,
};

/// Membership applications: `pending -> approved | rejected`, decided once.
pub struct ApplicationService {
    repo: Arc<dyn ApplicationRepository>,
}

impl ApplicationService {
    pub fn new(repo: Arc<dyn ApplicationRepository>) -> Self {
        Self { repo }
    }

    pub async fn submit(&self, actor: &Profile, request: SubmitApplicationRequest) -> Result<MemberApplication> {
        request.validate()?;

        if !request.email.trim().eq_ignore_ascii_case(&actor.email) {
            return Err(AppError::Validation(
                "email must match the email of your account".to_string(),
            ));
        }

        if actor.is_approved() {
            return Err(AppError::Conflict("You are already a member of the club".to_string()));
        }

        // Also enforced by a partial unique index; checked here for a
        // friendlier message on the common path.
        let open = self.repo.list_by_user(actor.id).await?
            .into_iter()
            .any(|a| a.status == ApplicationStatus::Pending);
        if open {
            return Err(AppError::Conflict("You already have a pending application".to_string()));
        }

        let application = self.repo.create(actor.id, request).await?;
        tracing::info!(application_id = %application.id, user_id = %actor.id, "Application submitted");
        Ok(application)
    }

    pub async fn decide(&self, actor: &Profile, id: Uuid, decision: Decision) -> Result<MemberApplication> {
        require_admin(actor)?;

        let application = self.repo.decide(id, decision, actor.id).await?;
        tracing::info!(
            application_id = %id,
            user_id = %application.user_id,
            status = application.status.as_str(),
            reviewed_by = %actor.id,
            "Application decided"
        );
        Ok(application)
    }

    pub async fn list(&self, actor: &Profile, status: Option<ApplicationStatus>) -> Result<Vec<MemberApplication>> {
        require_admin(actor)?;
        self.repo.list(status).await
    }

    pub async fn mine(&self, actor: &Profile) -> Result<Vec<MemberApplication>> {
        self.repo.list_by_user(actor.id).await
    }
}
