//! Authentication handlers: registration, login, logout and the token
//! lifecycle endpoints (verification, password reset).

use axum::{extract::State, http::StatusCode, Json};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::auth::{hash_password, verify_password};
use crate::config::{ServerConfig, TokenConfig};
use crate::db::{
    Database, NewRefreshToken, NewResetToken, NewUser, NewVerificationToken,
    RefreshTokenRepository, ResetTokenRepository, User, UserRepository,
    VerificationTokenRepository,
};
use crate::mail::EmailSender;
use crate::web::dto::{
    ApiResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, LogoutRequest,
    MessageResponse, ProfileResponse, RegisterRequest, RegisterResponse,
    ResendVerificationRequest, ResetPasswordRequest, ValidatedJson, VerifyEmailRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, JwtClaims};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (the pool is internally shared).
    pub db: Database,
    /// Email delivery collaborator.
    pub mailer: Arc<dyn EmailSender>,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token expiry in seconds.
    pub access_token_expiry: u64,
    /// Refresh token expiry in days.
    pub refresh_token_expiry_days: u64,
    /// Verification token expiry in hours.
    pub verification_expiry_hours: u64,
    /// Password reset token expiry in minutes.
    pub reset_expiry_mins: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Database,
        mailer: Arc<dyn EmailSender>,
        server: &ServerConfig,
        tokens: &TokenConfig,
    ) -> Self {
        Self {
            db,
            mailer,
            encoding_key: EncodingKey::from_secret(server.jwt_secret.as_bytes()),
            access_token_expiry: server.access_token_expiry_secs,
            refresh_token_expiry_days: server.refresh_token_expiry_days,
            verification_expiry_hours: tokens.verification_expiry_hours,
            reset_expiry_mins: tokens.reset_expiry_mins,
        }
    }

    /// Generate a signed access token for a user.
    pub fn generate_access_token(&self, user: &User) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user.id,
            email: user.email.clone(),
            iat: now,
            exp: now + self.access_token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }
}

/// POST /api/auth/register - Create an account and send the verification email.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    let users = UserRepository::new(state.db.pool());

    if users.get_by_email(&req.email).await?.is_some() {
        return Err(ApiError::conflict(
            "A user with this email already exists",
        ));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal("Failed to process password")
    })?;

    let new_user =
        NewUser::new(&req.email, password_hash).with_names(&req.first_name, &req.last_name);
    let user = users.create(&new_user).await.map_err(|e| {
        // The pre-check races with concurrent registration; the UNIQUE
        // constraint is the authority.
        if e.to_string().contains("UNIQUE") {
            ApiError::conflict("A user with this email already exists")
        } else {
            ApiError::from(e)
        }
    })?;

    let tokens = VerificationTokenRepository::new(state.db.pool());
    let token = tokens
        .create(&NewVerificationToken::generate(
            user.id,
            state.verification_expiry_hours,
        ))
        .await?;

    let email_sent = state
        .mailer
        .send_verification(&user.email, &token.token, user.display_name())
        .await;

    let mut message = String::from("User registered successfully.");
    if email_sent {
        message.push_str(" Please check your email to verify your account.");
    } else {
        message.push_str(
            " However, there was an issue sending the verification email. \
             You can request a new one later.",
        );
    }

    tracing::info!(user_id = user.id, email_sent, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(RegisterResponse {
            message,
            user_id: user.id,
            email_sent,
        })),
    ))
}

/// POST /api/auth/login - Authenticate and issue a token pair.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let users = UserRepository::new(state.db.pool());

    // Unknown email and wrong password produce the same error, so a
    // caller cannot probe which addresses have accounts.
    let user = users
        .get_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    verify_password(&req.password, &user.password)
        .map_err(|_| ApiError::unauthorized("Invalid credentials"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("User account is disabled"));
    }

    let access_token = state.generate_access_token(&user)?;

    let refresh_tokens = RefreshTokenRepository::new(state.db.pool());
    let refresh = refresh_tokens
        .create(&NewRefreshToken::generate(
            user.id,
            state.refresh_token_expiry_days,
        ))
        .await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(ApiResponse::new(LoginResponse {
        access_token,
        refresh_token: refresh.token,
        expires_in: state.access_token_expiry,
        user: ProfileResponse::from(&user),
    })))
}

/// POST /api/auth/logout - Revoke the presented refresh token.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if let Some(token) = req.refresh_token.as_deref() {
        let refresh_tokens = RefreshTokenRepository::new(state.db.pool());
        if !refresh_tokens.revoke(token).await? {
            return Err(ApiError::bad_request("Invalid token"));
        }
        tracing::info!(user_id = auth.0.sub, "Refresh token revoked");
    }

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// POST /api/auth/verify-email - Consume a verification token.
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<VerifyEmailRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let tokens = VerificationTokenRepository::new(state.db.pool());

    let token = tokens
        .get_by_token(&req.token)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid verification token"))?;

    if token.is_expired() {
        return Err(ApiError::bad_request("Verification token has expired"));
    }

    let users = UserRepository::new(state.db.pool());
    users.mark_email_verified(token.user_id).await?;

    // Single use: the row goes away with the successful verification
    tokens.delete(token.id).await?;

    tracing::info!(user_id = token.user_id, "Email verified");

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Email verified successfully",
    ))))
}

/// POST /api/auth/resend-verification - Issue a fresh verification token.
pub async fn resend_verification(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ResendVerificationRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let users = UserRepository::new(state.db.pool());

    let user = users
        .get_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::bad_request("User with this email does not exist"))?;

    if user.is_email_verified {
        return Ok(Json(ApiResponse::new(MessageResponse::new(
            "Email is already verified",
        ))));
    }

    let tokens = VerificationTokenRepository::new(state.db.pool());
    tokens.delete_all_for_user(user.id).await?;
    let token = tokens
        .create(&NewVerificationToken::generate(
            user.id,
            state.verification_expiry_hours,
        ))
        .await?;

    let sent = state
        .mailer
        .send_verification(&user.email, &token.token, user.display_name())
        .await;

    if !sent {
        return Err(ApiError::internal(
            "Failed to send verification email. Please try again later.",
        ));
    }

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Verification email sent successfully",
    ))))
}

/// POST /api/auth/forgot-password - Issue a password reset token.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let users = UserRepository::new(state.db.pool());

    let user = users.get_by_email(&req.email).await?.ok_or_else(|| {
        let mut details = std::collections::HashMap::new();
        details.insert(
            "email".to_string(),
            vec!["No user found with this email address".to_string()],
        );
        ApiError::validation(details)
    })?;

    let tokens = ResetTokenRepository::new(state.db.pool());
    tokens.delete_all_for_user(user.id).await?;
    let token = tokens
        .create(&NewResetToken::generate(user.id, state.reset_expiry_mins))
        .await?;

    let sent = state
        .mailer
        .send_password_reset(&user.email, &token.token, user.display_name())
        .await;

    if !sent {
        return Err(ApiError::internal(
            "Failed to send password reset email. Please try again later.",
        ));
    }

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Password reset email sent successfully",
    ))))
}

/// POST /api/auth/reset-password - Set a new password with a reset token.
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let tokens = ResetTokenRepository::new(state.db.pool());

    // A used token is indistinguishable from an unknown one
    let token = tokens
        .get_unused_by_token(&req.token)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid or expired password reset token"))?;

    if token.is_expired() {
        return Err(ApiError::bad_request("Password reset token has expired"));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal("Failed to process password")
    })?;

    let users = UserRepository::new(state.db.pool());
    users.set_password(token.user_id, &password_hash).await?;
    tokens.mark_used(token.id).await?;

    tracing::info!(user_id = token.user_id, "Password reset completed");

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Password reset successfully",
    ))))
}
