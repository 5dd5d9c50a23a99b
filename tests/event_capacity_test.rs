mod common;

use clubhouse::{
    domain::{EventStatus, UpdateEventRequest},
    error::AppError,
    service::ServiceContext,
};
use common::{account, admin, approved_member, event, file_context, remove_database, test_context};
use uuid::Uuid;

async fn assert_counter_matches(ctx: &ServiceContext, event_id: Uuid) -> anyhow::Result<i32> {
    let event = ctx.event_service.get(event_id).await?;
    let registrations: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM event_registrations WHERE event_id = ?"
    )
    .bind(event_id.to_string())
    .fetch_one(&ctx.db_pool)
    .await?;
    assert_eq!(event.current_participants as i64, registrations);
    Ok(event.current_participants)
}

#[tokio::test]
async fn third_registration_exceeds_capacity_of_two() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let event = event(&ctx, &admin, Some(2)).await?;

    let a = approved_member(&ctx, &admin, "a@club.test").await?;
    let b = approved_member(&ctx, &admin, "b@club.test").await?;
    let c = approved_member(&ctx, &admin, "c@club.test").await?;

    ctx.registration_service.register(&a, event.id).await?;
    ctx.registration_service.register(&b, event.id).await?;
    let third = ctx.registration_service.register(&c, event.id).await;
    assert!(matches!(third, Err(AppError::CapacityExceeded(_))));

    assert_eq!(assert_counter_matches(&ctx, event.id).await?, 2);
    let full = ctx.event_service.get(event.id).await?;
    assert!(full.is_full());
    assert_eq!(full.spots_left(), Some(0));
    assert!(ctx.registration_service.my_events(&c).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts_and_leaves_counter_alone() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let event = event(&ctx, &admin, Some(10)).await?;
    let member = approved_member(&ctx, &admin, "dup@club.test").await?;

    ctx.registration_service.register(&member, event.id).await?;
    let again = ctx.registration_service.register(&member, event.id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    assert_eq!(assert_counter_matches(&ctx, event.id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn unregistering_frees_a_spot() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let event = event(&ctx, &admin, Some(1)).await?;
    let first = approved_member(&ctx, &admin, "first@club.test").await?;
    let second = approved_member(&ctx, &admin, "second@club.test").await?;

    ctx.registration_service.register(&first, event.id).await?;
    assert!(matches!(
        ctx.registration_service.register(&second, event.id).await,
        Err(AppError::CapacityExceeded(_))
    ));

    ctx.registration_service.unregister(&first, event.id).await?;
    assert_eq!(assert_counter_matches(&ctx, event.id).await?, 0);

    ctx.registration_service.register(&second, event.id).await?;
    assert_eq!(assert_counter_matches(&ctx, event.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn unregistering_without_registration_is_not_found() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let event = event(&ctx, &admin, None).await?;
    let member = approved_member(&ctx, &admin, "nobody@club.test").await?;

    let result = ctx.registration_service.unregister(&member, event.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(assert_counter_matches(&ctx, event.id).await?, 0);

    Ok(())
}

#[tokio::test]
async fn unknown_event_is_not_found() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let member = approved_member(&ctx, &admin, "lost@club.test").await?;

    let result = ctx.registration_service.register(&member, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn only_approved_members_register() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let event = event(&ctx, &admin, Some(5)).await?;
    let applicant = account(&ctx, "pending@club.test").await?;

    let result = ctx.registration_service.register(&applicant, event.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
    assert_eq!(assert_counter_matches(&ctx, event.id).await?, 0);

    Ok(())
}

#[tokio::test]
async fn cancelled_events_close_registration() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let event = event(&ctx, &admin, None).await?;
    let member = approved_member(&ctx, &admin, "late@club.test").await?;

    let cancelled = ctx.event_service.cancel(&admin, event.id).await?;
    assert_eq!(cancelled.status, EventStatus::Cancelled);

    let result = ctx.registration_service.register(&member, event.id).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_never_overbook() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let event = event(&ctx, &admin, Some(3)).await?;

    let mut members = Vec::new();
    for i in 0..8 {
        members.push(approved_member(&ctx, &admin, &format!("racer{}@club.test", i)).await?);
    }

    let mut handles = Vec::new();
    for member in members {
        let ctx = ctx.clone();
        let event_id = event.id;
        handles.push(tokio::spawn(async move {
            ctx.registration_service.register(&member, event_id).await
        }));
    }

    let mut accepted = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => accepted += 1,
            Err(AppError::CapacityExceeded(_)) => full += 1,
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    assert_eq!(accepted, 3);
    assert_eq!(full, 5);
    assert_eq!(assert_counter_matches(&ctx, event.id).await?, 3);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_registrations_across_connections_never_overbook() -> anyhow::Result<()> {
    let (ctx, path) = file_context(8).await?;
    let admin = admin(&ctx).await?;
    let event = event(&ctx, &admin, Some(3)).await?;

    let mut members = Vec::new();
    for i in 0..16 {
        members.push(approved_member(&ctx, &admin, &format!("crowd{}@club.test", i)).await?);
    }

    let start = std::sync::Arc::new(tokio::sync::Barrier::new(members.len()));
    let mut handles = Vec::new();
    for member in members {
        let ctx = ctx.clone();
        let start = start.clone();
        let event_id = event.id;
        handles.push(tokio::spawn(async move {
            start.wait().await;
            ctx.registration_service.register(&member, event_id).await
        }));
    }

    let mut accepted = 0;
    let mut full = 0;
    let mut other = Vec::new();
    for handle in handles {
        match handle.await? {
            Ok(_) => accepted += 1,
            Err(AppError::CapacityExceeded(_)) => full += 1,
            Err(e) => other.push(e.to_string()),
        }
    }

    let counted = assert_counter_matches(&ctx, event.id).await;
    remove_database(ctx, path).await;

    assert!(other.is_empty(), "unexpected errors: {:?}", other);
    assert_eq!(accepted, 3);
    assert_eq!(full, 13);
    assert_eq!(counted?, 3);

    Ok(())
}

#[tokio::test]
async fn capacity_cannot_drop_below_registrations() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let event = event(&ctx, &admin, Some(5)).await?;

    for i in 0..3 {
        let member = approved_member(&ctx, &admin, &format!("m{}@club.test", i)).await?;
        ctx.registration_service.register(&member, event.id).await?;
    }

    let shrink = UpdateEventRequest {
        max_participants: Some(Some(2)),
        ..Default::default()
    };
    let result = ctx.event_service.update(&admin, event.id, shrink).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let exact = UpdateEventRequest {
        max_participants: Some(Some(3)),
        ..Default::default()
    };
    let updated = ctx.event_service.update(&admin, event.id, exact).await?;
    assert!(updated.is_full());

    let unlimited = UpdateEventRequest {
        max_participants: Some(None),
        ..Default::default()
    };
    let updated = ctx.event_service.update(&admin, event.id, unlimited).await?;
    assert_eq!(updated.max_participants, None);
    assert_eq!(updated.spots_left(), None);

    Ok(())
}

#[tokio::test]
async fn leaving_the_club_releases_registrations() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let workshop = event(&ctx, &admin, Some(2)).await?;
    let social = event(&ctx, &admin, None).await?;
    let member = approved_member(&ctx, &admin, "leaver@club.test").await?;
    let stayer = approved_member(&ctx, &admin, "stayer@club.test").await?;

    ctx.registration_service.register(&member, workshop.id).await?;
    ctx.registration_service.register(&member, social.id).await?;
    ctx.registration_service.register(&stayer, social.id).await?;

    let left = ctx.membership_service.leave_club(&member).await?;
    assert!(!left.is_approved());

    assert_eq!(assert_counter_matches(&ctx, workshop.id).await?, 0);
    assert_eq!(assert_counter_matches(&ctx, social.id).await?, 1);
    assert!(ctx.registration_service.my_events(&left).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn admin_removal_releases_registrations() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let admin = admin(&ctx).await?;
    let event = event(&ctx, &admin, Some(1)).await?;
    let member = approved_member(&ctx, &admin, "removed@club.test").await?;
    let waiting = approved_member(&ctx, &admin, "waiting@club.test").await?;

    ctx.registration_service.register(&member, event.id).await?;
    ctx.membership_service.remove_member(&admin, member.id).await?;

    assert_eq!(assert_counter_matches(&ctx, event.id).await?, 0);
    ctx.registration_service.register(&waiting, event.id).await?;

    let attendees = ctx.registration_service.attendees(&admin, event.id).await?;
    assert_eq!(attendees.len(), 1);
    assert_eq!(attendees[0].user_id, waiting.id);

    Ok(())
}
