//! End-to-end veterinarian provisioning: account creation, profile write,
//! and restoration of the admin's own session.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use alifi_console::error::ConsoleError;
use alifi_console::gateway::{AuthGateway, DocumentGateway, ProviderErrorKind};
use alifi_console::models::NewVeterinarian;
use alifi_console::provisioning::ProvisioningService;
use alifi_console::session::RoutingSuppression;
use alifi_integration_tests::{ADMIN_EMAIL, TestContext, email};

fn vet_form() -> NewVeterinarian {
    NewVeterinarian {
        name: "Dr. A".to_owned(),
        email: email("a@x.com"),
        phone: "0550 123 456".to_owned(),
        specialization: "Surgery".to_owned(),
        experience: "5 years".to_owned(),
        license: "VET-2210".to_owned(),
        password: SecretString::from("first-login-pw"),
    }
}

fn service(ctx: &TestContext) -> ProvisioningService<alifi_console::gateway::memory::MemoryGateway> {
    ProvisioningService::new(
        ctx.gateway.clone(),
        ctx.config.clone(),
        RoutingSuppression::new(),
    )
}

#[tokio::test]
async fn provisioning_ends_with_admin_signed_in() {
    let ctx = TestContext::new();
    ctx.seed_admin();
    let admin = ctx.sign_in_admin().await;

    let vet_id = service(&ctx).provision(vet_form(), &admin).await.unwrap();

    // The profile is keyed by the new account and fully populated.
    let doc = ctx
        .gateway
        .get("veterinarians", vet_id.as_str())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc["specialization"], "Surgery");
    assert_eq!(doc["email"], "a@x.com");
    assert_eq!(doc["isVerified"], true);

    // The active identity is the admin again, not the new veterinarian.
    let active = ctx.gateway.current_identity().unwrap();
    assert_eq!(active.email.as_str(), ADMIN_EMAIL);
}

#[tokio::test]
async fn duplicate_email_aborts_before_any_write() {
    let ctx = TestContext::new();
    ctx.seed_admin();
    let admin = ctx.sign_in_admin().await;
    ctx.gateway.register_account(&email("a@x.com"), "existing");

    let err = service(&ctx).provision(vet_form(), &admin).await.unwrap_err();
    match err {
        ConsoleError::Provider(p) => assert_eq!(p.kind, ProviderErrorKind::EmailAlreadyExists),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ctx.gateway.document_count("veterinarians"), 0);
    // The admin session was never replaced.
    assert_eq!(
        ctx.gateway.current_identity().unwrap().email.as_str(),
        ADMIN_EMAIL
    );
}

#[tokio::test]
async fn profile_write_failure_is_reported_as_orphan() {
    let ctx = TestContext::new();
    ctx.seed_admin();
    let admin = ctx.sign_in_admin().await;
    ctx.gateway.fail_writes_to("veterinarians");

    let err = service(&ctx).provision(vet_form(), &admin).await.unwrap_err();
    let ConsoleError::OrphanedRecord { account_id, .. } = err else {
        panic!("unexpected error: {err}");
    };
    // The orphaned account exists and is still the active identity.
    assert_eq!(ctx.gateway.current_identity().unwrap().id, account_id);
    assert_eq!(ctx.gateway.document_count("veterinarians"), 0);
}

#[tokio::test]
async fn failed_restore_still_leaves_account_and_profile() {
    let ctx = TestContext::new();
    ctx.seed_admin();
    ctx.sign_in_admin().await;

    // Credentials rotated out from under the cached copy.
    let stale = alifi_console::session::CachedCredentials {
        email: email(ADMIN_EMAIL),
        password: SecretString::from("stale"),
    };

    let err = service(&ctx).provision(vet_form(), &stale).await.unwrap_err();
    let ConsoleError::SessionIntegrity { admin_email, .. } = err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(admin_email.as_str(), ADMIN_EMAIL);
    assert_eq!(ctx.gateway.document_count("veterinarians"), 1);
    assert!(ctx.gateway.current_identity().is_none());
}
