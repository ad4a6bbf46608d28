//! Error taxonomy shared by the workflow, chat, and auth components.
//!
//! Failures are ordinary values, not panics: validation errors are surfaced
//! in the status line, network and backend errors revert the workflow stage,
//! and auth errors map to the fixed messages shown on the login screen.

use thiserror::Error;

/// Top-level error type for all user-facing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifierError {
    /// Precondition failure caught before any request left the process.
    #[error("{0}")]
    Validation(String),

    /// Transport-level failure: the backend could not be reached at all.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered but the response was an error or undecodable.
    #[error("{0}")]
    Backend(String),

    /// Authentication failure with a fixed user-facing message.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Authentication failures, each carrying its exact login-screen message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("User not found! Please register.")]
    UserNotFound,
    #[error("Incorrect password!")]
    WrongPassword,
    #[error("User already exists! Please login.")]
    EmailInUse,
    #[error("Password is too weak! Use at least 6 characters.")]
    WeakPassword,
    #[error("Please enter a valid email address!")]
    InvalidEmail,
    /// Provider message passed through verbatim for codes without a fixed
    /// local message.
    #[error("{0}")]
    Other(String),
}

impl AuthError {
    /// Maps a provider error code to its fixed message, falling back to the
    /// provider's own message for unrecognized codes.
    pub fn from_code(code: &str, message: &str) -> Self {
        match code {
            "auth/user-not-found" => AuthError::UserNotFound,
            "auth/wrong-password" | "auth/invalid-credential" => AuthError::WrongPassword,
            "auth/email-already-in-use" => AuthError::EmailInUse,
            "auth/weak-password" => AuthError::WeakPassword,
            "auth/invalid-email" => AuthError::InvalidEmail,
            _ => AuthError::Other(message.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_fixed_messages() {
        assert_eq!(
            AuthError::from_code("auth/user-not-found", "ignored").to_string(),
            "User not found! Please register."
        );
        assert_eq!(
            AuthError::from_code("auth/wrong-password", "ignored").to_string(),
            "Incorrect password!"
        );
        assert_eq!(
            AuthError::from_code("auth/invalid-credential", "ignored"),
            AuthError::WrongPassword
        );
        assert_eq!(
            AuthError::from_code("auth/email-already-in-use", "ignored").to_string(),
            "User already exists! Please login."
        );
        assert_eq!(
            AuthError::from_code("auth/weak-password", "ignored").to_string(),
            "Password is too weak! Use at least 6 characters."
        );
        assert_eq!(
            AuthError::from_code("auth/invalid-email", "ignored").to_string(),
            "Please enter a valid email address!"
        );
    }

    #[test]
    fn unknown_code_passes_provider_message_through() {
        let err = AuthError::from_code("auth/too-many-requests", "Too many attempts.");
        assert_eq!(err.to_string(), "Too many attempts.");
    }
}
