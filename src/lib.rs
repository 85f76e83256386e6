//! vendauth - Email/password authentication backend for Vendorly.
//!
//! A REST API providing registration, login with JWT access and opaque
//! refresh tokens, email verification, password reset and profile
//! management, backed by SQLite.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod web;

pub use auth::{
    hash_password, username_base, validate_password, verify_password, PasswordError,
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository, UserUpdate};
pub use error::{AuthError, Result};
pub use mail::{EmailSender, SmtpMailer, StubMailer};
pub use web::{ApiError, WebServer};
