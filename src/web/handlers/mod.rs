//! API handlers.

pub mod auth;
pub mod profile;

pub use auth::*;
pub use profile::*;
