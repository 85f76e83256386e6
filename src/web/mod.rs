//! Web API module for vendauth.
//!
//! Provides the REST API surface: routing, middleware, request/response
//! DTOs and handlers for the authentication endpoints.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
