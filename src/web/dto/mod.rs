//! Request/response DTOs for the API.

mod request;
mod response;
mod validation;

pub use request::{
    ForgotPasswordRequest, LoginRequest, LogoutRequest, RegisterRequest, ResendVerificationRequest,
    ResetPasswordRequest, UpdateProfileRequest, VerifyEmailRequest,
};
pub use response::{
    ApiResponse, LoginResponse, MessageResponse, ProfileResponse, RegisterResponse,
};
pub use validation::ValidatedJson;
