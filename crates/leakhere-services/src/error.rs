use leakhere_core::{ApiError, InputError, SessionError};

/// Failure of a user action outside the upload workflow.
///
/// The `Display` text is what the user is shown.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The action needs a logged-in session.
    #[error("{0}")]
    LoginRequired(&'static str),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Media not found.")]
    NotFound,

    #[error("Failed to start download")]
    NoDownloadUrl,

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ServiceError {
    /// Wrap an API failure, preferring the server's message over `fallback`
    /// only when the server sent one.
    pub fn api(source: ApiError, fallback: &str) -> Self {
        let message = match &source {
            ApiError::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        };
        ServiceError::Api { message, source }
    }

    /// Wrap an API failure with a fixed user-facing message.
    pub fn api_with(source: ApiError, message: &str) -> Self {
        ServiceError::Api {
            message: message.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_prefers_server_message() {
        let err = ServiceError::api(
            ApiError::Status {
                status: 409,
                message: "Username taken".to_string(),
            },
            "Registration failed. Please try again.",
        );
        assert_eq!(err.to_string(), "Username taken");

        let err = ServiceError::api(
            ApiError::Transport("connection refused".to_string()),
            "Registration failed. Please try again.",
        );
        assert_eq!(err.to_string(), "Registration failed. Please try again.");
    }

    #[test]
    fn api_with_ignores_server_message() {
        let err = ServiceError::api_with(
            ApiError::Status {
                status: 500,
                message: "db down".to_string(),
            },
            "Failed to update like",
        );
        assert_eq!(err.to_string(), "Failed to update like");
    }
}
