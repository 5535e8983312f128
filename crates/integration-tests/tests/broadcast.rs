//! Broadcast fan-out: batching, progress reporting, partial failure.

#![allow(clippy::unwrap_used)]

use alifi_console::messaging::{BroadcastProgress, MessagingService};
use alifi_console::models::{MessageDraft, MessageKind};
use alifi_integration_tests::TestContext;

fn draft() -> MessageDraft {
    MessageDraft {
        subject: "Scheduled maintenance".to_owned(),
        content: "The platform will be briefly unavailable tonight.".to_owned(),
        kind: MessageKind::Info,
    }
}

#[tokio::test]
async fn twenty_three_users_get_three_batches() {
    let ctx = TestContext::new();
    let users = ctx.seed_users(23);
    let service = MessagingService::new(ctx.gateway.clone(), &ctx.config);

    let mut progress: Vec<BroadcastProgress> = Vec::new();
    let report = service
        .broadcast(&users, &draft(), |p| progress.push(p))
        .await
        .unwrap();

    assert_eq!(report.total, 23);
    assert_eq!(report.sent, 23);
    assert_eq!(report.failed, 0);

    // Batches of 10, 10, and 3; progress is batch-granular and ends at 100.
    let percents: Vec<u8> = progress.iter().map(|p| p.percent).collect();
    assert_eq!(percents, [34, 67, 100]);
    let sent: Vec<usize> = progress.iter().map(|p| p.sent).collect();
    assert_eq!(sent, [10, 20, 23]);

    // Message of record plus a notification copy per recipient.
    assert_eq!(ctx.gateway.document_count("admin_messages"), 23);
    for user in &users {
        assert_eq!(
            ctx.gateway
                .document_count(&format!("users/{user}/notifications")),
            1
        );
    }
}

#[tokio::test]
async fn failed_batch_loses_only_its_own_recipients() {
    let ctx = TestContext::new();
    let users = ctx.seed_users(23);
    let service = MessagingService::new(ctx.gateway.clone(), &ctx.config);
    ctx.gateway.fail_batch_writes([0]);

    let report = service.broadcast(&users, &draft(), |_| {}).await.unwrap();

    assert_eq!(report.failed, 10);
    assert_eq!(report.sent, 13);
    assert_eq!(report.sent + report.failed, report.total);
    assert_eq!(ctx.gateway.document_count("admin_messages"), 13);
    // The first batch's recipients got nothing, atomically.
    assert_eq!(ctx.gateway.document_count("users/user-0/notifications"), 0);
}

#[tokio::test]
async fn every_batch_failing_still_returns_a_report() {
    let ctx = TestContext::new();
    let users = ctx.seed_users(12);
    let service = MessagingService::new(ctx.gateway.clone(), &ctx.config);
    ctx.gateway.fail_batch_writes([0, 1]);

    let report = service.broadcast(&users, &draft(), |_| {}).await.unwrap();
    assert_eq!(report.sent, 0);
    assert_eq!(report.failed, 12);
}
