//! Credential helpers: password hashing and username derivation.

mod password;
mod username;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use username::username_base;
