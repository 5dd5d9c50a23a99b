use std::sync::Arc;
use validator::Validate;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::NewsletterRepository,
};

pub struct NewsletterService {
    repo: Arc<dyn NewsletterRepository>,
}

impl NewsletterService {
    pub fn new(repo: Arc<dyn NewsletterRepository>) -> Self {
        Self { repo }
    }

    pub async fn subscribe(&self, request: SubscribeRequest) -> Result<NewsletterSubscription> {
        request.validate()?;

        if let Some(existing) = self.repo.find_by_email(&request.email).await? {
            if existing.status == SubscriptionStatus::Active {
                return Err(AppError::Conflict("This email is already subscribed".to_string()));
            }
        }

        let name = request.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let subscription = self.repo.subscribe(&request.email, name).await?;
        tracing::info!(subscription_id = %subscription.id, "Newsletter subscription active");
        Ok(subscription)
    }

    pub async fn unsubscribe(&self, request: UnsubscribeRequest) -> Result<NewsletterSubscription> {
        request.validate()?;

        let subscription = self.repo.unsubscribe(&request.email).await?;
        tracing::info!(subscription_id = %subscription.id, "Newsletter subscription cancelled");
        Ok(subscription)
    }
}
