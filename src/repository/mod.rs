use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::{AppError, Result};

pub mod profile_repository;
pub mod application_repository;
pub mod event_repository;
pub mod gallery_repository;
pub mod stat_repository;
pub mod team_repository;
pub mod newsletter_repository;
pub mod contact_repository;

pub use profile_repository::SqliteProfileRepository;
pub use application_repository::SqliteApplicationRepository;
pub use event_repository::SqliteEventRepository;
pub use gallery_repository::SqliteGalleryRepository;
pub use stat_repository::SqliteStatRepository;
pub use team_repository::SqliteTeamRepository;
pub use newsletter_repository::SqliteNewsletterRepository;
pub use contact_repository::SqliteContactRepository;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, request: CreateProfileRequest, password_hash: &str) -> Result<Profile>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>>;
    async fn list(&self, status: Option<ProfileStatus>) -> Result<Vec<Profile>>;
    async fn update(&self, id: Uuid, update: UpdateProfileRequest) -> Result<Profile>;
    async fn set_role(&self, id: Uuid, role: Role) -> Result<Profile>;
    /// Marks the profile rejected and drops all of its event registrations,
    /// returning the ids of the events it was registered for.
    async fn remove_membership(&self, id: Uuid) -> Result<Vec<Uuid>>;
    async fn count_by_status(&self, status: ProfileStatus) -> Result<i64>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, request: SubmitApplicationRequest) -> Result<MemberApplication>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MemberApplication>>;
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<MemberApplication>>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<MemberApplication>>;
    async fn decide(&self, id: Uuid, decision: Decision, reviewer: Uuid) -> Result<MemberApplication>;
    async fn count_pending(&self) -> Result<i64>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, created_by: Uuid, event: CreateEventRequest) -> Result<Event>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;
    async fn list(&self) -> Result<Vec<Event>>;
    async fn list_upcoming(&self, limit: i64) -> Result<Vec<Event>>;
    async fn update(&self, id: Uuid, update: UpdateEventRequest) -> Result<Event>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn register(&self, event_id: Uuid, user_id: Uuid) -> Result<EventRegistration>;
    async fn unregister(&self, event_id: Uuid, user_id: Uuid) -> Result<()>;
    async fn list_registered_events(&self, user_id: Uuid) -> Result<Vec<Event>>;
    async fn list_attendees(&self, event_id: Uuid) -> Result<Vec<Attendee>>;
    async fn count_upcoming(&self) -> Result<i64>;
}

#[async_trait]
pub trait GalleryRepository: Send + Sync {
    async fn create(&self, item: CreateGalleryItemRequest) -> Result<GalleryItem>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<GalleryItem>>;
    async fn list(&self, active_only: bool, category: Option<&str>) -> Result<Vec<GalleryItem>>;
    async fn update(&self, id: Uuid, update: UpdateGalleryItemRequest) -> Result<GalleryItem>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait StatRepository: Send + Sync {
    async fn create(&self, stat: CreateStatRequest) -> Result<Stat>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Stat>>;
    async fn list(&self, active_only: bool) -> Result<Vec<Stat>>;
    async fn update(&self, id: Uuid, update: UpdateStatRequest) -> Result<Stat>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create(&self, member: CreateTeamMemberRequest) -> Result<TeamMember>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamMember>>;
    async fn list(&self, active_only: bool) -> Result<Vec<TeamMember>>;
    async fn update(&self, id: Uuid, update: UpdateTeamMemberRequest) -> Result<TeamMember>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<NewsletterSubscription>>;
    async fn subscribe(&self, email: &str, name: Option<&str>) -> Result<NewsletterSubscription>;
    async fn unsubscribe(&self, email: &str) -> Result<NewsletterSubscription>;
    async fn list(&self, status: Option<SubscriptionStatus>) -> Result<Vec<NewsletterSubscription>>;
    async fn count_active(&self) -> Result<i64>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, message: CreateContactRequest) -> Result<ContactMessage>;
    async fn list(&self, status: Option<ContactStatus>) -> Result<Vec<ContactMessage>>;
    async fn update_status(&self, id: Uuid, status: ContactStatus) -> Result<ContactMessage>;
    async fn count_new(&self) -> Result<i64>;
}

// String lists (skills, expertise) are stored as JSON arrays in TEXT columns.
pub(crate) fn decode_list(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| AppError::Database(format!("Invalid list column: {}", e)))
}

pub(crate) fn encode_list(items: &[String]) -> Result<String> {
    serde_json::to_string(items).map_err(|e| AppError::Internal(e.to_string()))
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::Database(e.to_string()))
}
