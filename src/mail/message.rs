//! Outgoing email content.

/// Subject and plain-text body for one outgoing email.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Build the email-verification message.
///
/// The link points at the frontend verify page, which posts the token
/// back to this service.
pub fn verification_email(base_url: &str, token: &str, display_name: &str) -> OutgoingEmail {
    let url = format!("{base_url}/auth/verify-email?token={token}");
    OutgoingEmail {
        subject: "Verify your email address - Vendorly".to_string(),
        body: format!(
            "Hi {display_name},\n\n\
             Thanks for signing up. Please verify your email address by\n\
             opening the link below. The link expires in 24 hours.\n\n\
             {url}\n\n\
             If you did not create this account, you can ignore this email.\n"
        ),
    }
}

/// Build the password-reset message.
pub fn password_reset_email(base_url: &str, token: &str, display_name: &str) -> OutgoingEmail {
    let url = format!("{base_url}/auth/reset-password?token={token}");
    OutgoingEmail {
        subject: "Reset your password - Vendorly".to_string(),
        body: format!(
            "Hi {display_name},\n\n\
             A password reset was requested for your account. Open the link\n\
             below to choose a new password. The link expires in 1 hour and\n\
             can be used once.\n\n\
             {url}\n\n\
             If you did not request this, you can ignore this email.\n"
        ),
    }
}
