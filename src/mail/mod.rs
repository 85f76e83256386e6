//! Email delivery for verification and password-reset links.
//!
//! Delivery is synchronous from the caller's point of view and reports
//! plain success/failure; there is no retry or queueing. Handlers decide
//! how a failed send surfaces to the client.

mod message;
mod smtp;

pub use message::{password_reset_email, verification_email, OutgoingEmail};
pub use smtp::SmtpMailer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

/// Email delivery collaborator.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Attempt to deliver a verification email. Returns true on success.
    async fn send_verification(&self, to: &str, token: &str, display_name: &str) -> bool;

    /// Attempt to deliver a password-reset email. Returns true on success.
    async fn send_password_reset(&self, to: &str, token: &str, display_name: &str) -> bool;
}

/// A recorded outgoing email (for the stub mailer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient address.
    pub to: String,
    /// Token embedded in the link.
    pub token: String,
    /// Recipient display name.
    pub display_name: String,
    /// "verification" or "password_reset".
    pub kind: &'static str,
}

/// In-memory mailer that records sends instead of delivering them.
///
/// Used by the test suites and by local development setups without an
/// SMTP relay. Sends succeed by default; flip `set_failing` to exercise
/// the delivery-failure paths.
#[derive(Debug, Default)]
pub struct StubMailer {
    sent: Mutex<Vec<SentEmail>>,
    failing: AtomicBool,
}

impl StubMailer {
    /// Create a stub mailer that reports success for every send.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make all subsequent sends report failure (or success again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of everything recorded so far.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().expect("stub mailer lock").clone()
    }

    fn record(&self, to: &str, token: &str, display_name: &str, kind: &'static str) -> bool {
        if self.failing.load(Ordering::SeqCst) {
            return false;
        }
        self.sent.lock().expect("stub mailer lock").push(SentEmail {
            to: to.to_string(),
            token: token.to_string(),
            display_name: display_name.to_string(),
            kind,
        });
        true
    }
}

#[async_trait]
impl EmailSender for StubMailer {
    async fn send_verification(&self, to: &str, token: &str, display_name: &str) -> bool {
        self.record(to, token, display_name, "verification")
    }

    async fn send_password_reset(&self, to: &str, token: &str, display_name: &str) -> bool {
        self.record(to, token, display_name, "password_reset")
    }
}
