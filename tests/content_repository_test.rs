mod common;

use clubhouse::{
    domain::{
        ContactStatus, CreateContactRequest, CreateGalleryItemRequest, CreateStatRequest, CreateTeamMemberRequest,
        SubscribeRequest, SubscriptionStatus, UnsubscribeRequest, UpdateGalleryItemRequest,
        UpdateStatRequest, UpdateTeamMemberRequest,
    },
    error::AppError,
};
use common::test_context;
use validator::Validate;

fn photo(title: &str, category: &str, order: i32) -> CreateGalleryItemRequest {
    CreateGalleryItemRequest {
        title: title.to_string(),
        description: None,
        image_url: format!("https://img.example.com/{}.jpg", title),
        category: category.to_string(),
        display_order: Some(order),
    }
}

#[tokio::test]
async fn hidden_gallery_items_stay_off_the_public_site() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let repo = &ctx.gallery_repo;

    let kickoff = repo.create(photo("kickoff", "meetings", 2)).await?;
    repo.create(photo("finals", "hackathons", 1)).await?;
    repo.create(photo("demo", "meetings", 0)).await?;

    repo.update(kickoff.id, UpdateGalleryItemRequest {
        is_active: Some(false),
        ..Default::default()
    }).await?;

    let public: Vec<String> = repo.list(true, None).await?.into_iter().map(|i| i.title).collect();
    assert_eq!(public, vec!["demo", "finals"]);

    let meetings = repo.list(true, Some("meetings")).await?;
    assert_eq!(meetings.len(), 1);

    assert_eq!(repo.list(false, None).await?.len(), 3);

    repo.delete(kickoff.id).await?;
    assert!(matches!(repo.delete(kickoff.id).await, Err(AppError::NotFound(_))));

    Ok(())
}

fn stat(label: &str, value: i64, order: i32) -> CreateStatRequest {
    CreateStatRequest {
        label: label.to_string(),
        value,
        icon: None,
        display_order: Some(order),
    }
}

#[tokio::test]
async fn stats_are_ordered_and_filtered_for_the_public_site() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let repo = &ctx.stat_repo;

    repo.create(stat("Workshops", 12, 1)).await?;
    repo.create(stat("Alumni", 80, 1)).await?;
    let retired = repo.create(stat("Servers", 3, 0)).await?;
    repo.create(stat("Members", 150, 0)).await?;

    let all: Vec<String> = repo.list(false).await?.into_iter().map(|s| s.label).collect();
    assert_eq!(all, vec!["Members", "Servers", "Alumni", "Workshops"]);

    repo.update(retired.id, UpdateStatRequest {
        is_active: Some(false),
        ..Default::default()
    }).await?;

    let public: Vec<String> = repo.list(true).await?.into_iter().map(|s| s.label).collect();
    assert_eq!(public, vec!["Members", "Alumni", "Workshops"]);

    let bumped = repo.update(retired.id, UpdateStatRequest {
        value: Some(4),
        ..Default::default()
    }).await?;
    assert_eq!(bumped.value, 4);
    assert!(!bumped.is_active);

    assert!(stat("Projects", -3, 0).validate().is_err());
    let negative_update = UpdateStatRequest { value: Some(-1), ..Default::default() };
    assert!(negative_update.validate().is_err());
    assert!(stat("Projects", 0, 0).validate().is_ok());

    repo.delete(retired.id).await?;
    assert!(matches!(repo.delete(retired.id).await, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn team_members_keep_structured_fields() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let mut links = serde_json::Map::new();
    links.insert("github".to_string(), serde_json::json!("https://github.com/octo"));

    let member = ctx.team_repo.create(CreateTeamMemberRequest {
        name: "Octo Cat".to_string(),
        role: "President".to_string(),
        description: None,
        avatar_url: None,
        expertise: vec!["rust".to_string(), "embedded".to_string()],
        achievements: vec!["Hackathon winner".to_string()],
        social_links: links,
        display_order: None,
    }).await?;

    assert_eq!(member.expertise, vec!["rust", "embedded"]);
    assert_eq!(member.social_links["github"], "https://github.com/octo");
    assert!(member.is_active);

    let updated = ctx.team_repo.update(member.id, UpdateTeamMemberRequest {
        role: Some("Advisor".to_string()),
        achievements: Some(vec![]),
        ..Default::default()
    }).await?;
    assert_eq!(updated.role, "Advisor");
    assert!(updated.achievements.is_empty());
    assert_eq!(updated.expertise.len(), 2);

    Ok(())
}

#[tokio::test]
async fn newsletter_resubscribe_reactivates() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let service = &ctx.newsletter_service;

    let first = service.subscribe(SubscribeRequest {
        email: "Reader@Example.com".to_string(),
        name: Some("Reader".to_string()),
    }).await?;
    assert_eq!(first.email, "reader@example.com");

    let out = service.unsubscribe(UnsubscribeRequest { email: "reader@example.com".to_string() }).await?;
    assert_eq!(out.status, SubscriptionStatus::Unsubscribed);
    assert!(out.unsubscribed_at.is_some());

    let twice = service.unsubscribe(UnsubscribeRequest { email: "reader@example.com".to_string() }).await;
    assert!(matches!(twice, Err(AppError::Conflict(_))));

    let unknown = service.unsubscribe(UnsubscribeRequest { email: "ghost@example.com".to_string() }).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    let back = service.subscribe(SubscribeRequest {
        email: "reader@example.com".to_string(),
        name: None,
    }).await?;
    assert_eq!(back.id, first.id);
    assert_eq!(back.status, SubscriptionStatus::Active);
    assert_eq!(back.name.as_deref(), Some("Reader"));
    assert!(back.unsubscribed_at.is_none());

    assert_eq!(ctx.newsletter_repo.count_active().await?, 1);
    Ok(())
}

#[tokio::test]
async fn contact_messages_move_through_the_inbox() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let message = ctx.contact_repo.create(CreateContactRequest {
        name: "Visitor".to_string(),
        email: "visitor@example.com".to_string(),
        subject: "Workshop".to_string(),
        message: "Can alumni attend?".to_string(),
    }).await?;
    assert_eq!(message.status, ContactStatus::New);
    assert_eq!(ctx.contact_repo.count_new().await?, 1);

    let read = ctx.contact_repo.update_status(message.id, ContactStatus::Read).await?;
    assert_eq!(read.status, ContactStatus::Read);
    assert_eq!(ctx.contact_repo.count_new().await?, 0);
    assert_eq!(ctx.contact_repo.list(Some(ContactStatus::Read)).await?.len(), 1);

    let missing = ctx.contact_repo.update_status(uuid::Uuid::new_v4(), ContactStatus::Archived).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}
