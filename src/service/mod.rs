pub mod membership_service;
pub mod application_service;
pub mod event_service;
pub mod registration_service;
pub mod newsletter_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::repository::*;
use crate::auth::AuthService;
use membership_service::MembershipService;
use application_service::ApplicationService;
use event_service::EventService;
use registration_service::RegistrationService;
use newsletter_service::NewsletterService;

/// Everything a request handler needs, built once at startup.
pub struct ServiceContext {
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub application_repo: Arc<dyn ApplicationRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub gallery_repo: Arc<dyn GalleryRepository>,
    pub stat_repo: Arc<dyn StatRepository>,
    pub team_repo: Arc<dyn TeamRepository>,
    pub newsletter_repo: Arc<dyn NewsletterRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub auth_service: Arc<AuthService>,
    pub membership_service: Arc<MembershipService>,
    pub application_service: Arc<ApplicationService>,
    pub event_service: Arc<EventService>,
    pub registration_service: Arc<RegistrationService>,
    pub newsletter_service: Arc<NewsletterService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(auth_service: Arc<AuthService>, db_pool: SqlitePool) -> Self {
        let profile_repo: Arc<dyn ProfileRepository> =
            Arc::new(SqliteProfileRepository::new(db_pool.clone()));
        let application_repo: Arc<dyn ApplicationRepository> =
            Arc::new(SqliteApplicationRepository::new(db_pool.clone()));
        let event_repo: Arc<dyn EventRepository> =
            Arc::new(SqliteEventRepository::new(db_pool.clone()));
        let newsletter_repo: Arc<dyn NewsletterRepository> =
            Arc::new(SqliteNewsletterRepository::new(db_pool.clone()));

        let membership_service = Arc::new(MembershipService::new(
            profile_repo.clone(),
            auth_service.clone(),
            db_pool.clone(),
        ));
        let application_service = Arc::new(ApplicationService::new(application_repo.clone()));
        let event_service = Arc::new(EventService::new(event_repo.clone()));
        let registration_service = Arc::new(RegistrationService::new(event_repo.clone()));
        let newsletter_service = Arc::new(NewsletterService::new(newsletter_repo.clone()));

        Self {
            profile_repo,
            application_repo,
            event_repo,
            gallery_repo: Arc::new(SqliteGalleryRepository::new(db_pool.clone())),
            stat_repo: Arc::new(SqliteStatRepository::new(db_pool.clone())),
            team_repo: Arc::new(SqliteTeamRepository::new(db_pool.clone())),
            newsletter_repo,
            contact_repo: Arc::new(SqliteContactRepository::new(db_pool.clone())),
            auth_service,
            membership_service,
            application_service,
            event_service,
            registration_service,
            newsletter_service,
            db_pool,
        }
    }
}
