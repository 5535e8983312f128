//! Integration tests for the Alifi admin console.
//!
//! The suite exercises the console's flows end to end against the in-memory
//! gateway: account provisioning with session restore, identity routing,
//! broadcast fan-out, and entity management.
//!
//! # Test Categories
//!
//! - `provisioning_flow` - Veterinarian account provisioning
//! - `session_routing` - Identity stream routing and suppression
//! - `broadcast` - Message fan-out and partial failure
//! - `resource_management` - Cross-entity management flows
//!
//! This crate's library target holds the shared fixtures.

use secrecy::SecretString;
use serde_json::json;

use alifi_console::config::ConsoleConfig;
use alifi_console::gateway::AuthGateway;
use alifi_console::gateway::memory::MemoryGateway;
use alifi_console::session::CachedCredentials;
use alifi_core::{AccountId, Email, UserId};

pub const ADMIN_EMAIL: &str = "admin@alifi.com";
pub const ADMIN_PASSWORD: &str = "hunter2hunter2";

/// Shared fixture: an in-memory backend plus the default configuration.
pub struct TestContext {
    pub gateway: MemoryGateway,
    pub config: ConsoleConfig,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            gateway: MemoryGateway::new(),
            config: ConsoleConfig::default(),
        }
    }

    /// Seed an admin account with its user document and claims.
    pub fn seed_admin(&self) -> AccountId {
        let id = self
            .gateway
            .register_account(&email(ADMIN_EMAIL), ADMIN_PASSWORD);
        self.gateway.seed_document(
            "users",
            id.as_str(),
            json!({
                "name": "Console Admin",
                "email": ADMIN_EMAIL,
                "status": "active",
                "customClaims": {"admin": true, "role": "super_admin"},
            }),
        );
        id
    }

    /// Sign the seeded admin in and hand back the credentials the console
    /// would have cached at login.
    pub async fn sign_in_admin(&self) -> CachedCredentials {
        self.gateway
            .sign_in(&email(ADMIN_EMAIL), &SecretString::from(ADMIN_PASSWORD))
            .await
            .expect("admin sign-in");
        CachedCredentials {
            email: email(ADMIN_EMAIL),
            password: SecretString::from(ADMIN_PASSWORD),
        }
    }

    /// Seed `n` ordinary platform users; returns their IDs.
    pub fn seed_users(&self, n: usize) -> Vec<UserId> {
        (0..n)
            .map(|i| {
                let id = format!("user-{i}");
                self.gateway.seed_document(
                    "users",
                    &id,
                    json!({
                        "name": format!("User {i}"),
                        "email": format!("user{i}@x.com"),
                        "status": "active",
                    }),
                );
                UserId::new(id)
            })
            .collect()
    }
}

/// Parse a known-good email literal.
#[must_use]
pub fn email(s: &str) -> Email {
    Email::parse(s).expect("valid test email")
}
