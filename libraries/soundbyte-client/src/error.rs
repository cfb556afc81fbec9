//! Error types for the SoundByte API client.

use soundbyte_core::{glyph, ServiceType, UserMessage};
use thiserror::Error;

/// Errors that can occur when talking to SoundCloud or Fanburst.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The token was rejected by the server
    #[error("Unauthorized")]
    Unauthorized,

    /// The action needs a connected account and none is available
    #[error("Authentication required for {0}")]
    AuthRequired(ServiceType),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Whether the request never produced a usable HTTP response
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Request(_) | ClientError::ServerUnreachable(_) | ClientError::ServerError { .. }
        )
    }

    /// Reduce the error to what the user should see.
    pub fn user_message(&self) -> UserMessage {
        match self {
            ClientError::Request(_) | ClientError::ServerUnreachable(_) => UserMessage::new(
                "Could not connect",
                "SoundByte could not reach the server. Check your internet connection and try again.",
                glyph::WARNING,
            ),
            ClientError::ServerError { status, .. } => UserMessage::new(
                "Something went wrong",
                format!("The server answered with status {}. Try again later.", status),
                glyph::WARNING,
            ),
            ClientError::Unauthorized => UserMessage::new(
                "Session expired",
                "Your account session is no longer valid. Please log in again.",
                glyph::ACCOUNT,
            ),
            ClientError::AuthRequired(service) => UserMessage::new(
                "Please log in",
                format!("Connect your {} account to see this content.", service),
                glyph::ACCOUNT,
            ),
            ClientError::ParseError(_) => UserMessage::new(
                "Could not read response",
                "The server sent data SoundByte does not understand.",
                glyph::ERROR,
            ),
            ClientError::InvalidUrl(url) => UserMessage::new(
                "Invalid address",
                format!("The address {} is not valid.", url),
                glyph::ERROR,
            ),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_parse_share_treatment_but_not_text() {
        let transport = ClientError::ServerUnreachable("timeout".into()).user_message();
        let parse = ClientError::ParseError("expected array".into()).user_message();

        assert_ne!(transport.title, parse.title);
        assert!(!transport.description.is_empty());
        assert!(!parse.description.is_empty());
    }

    #[test]
    fn auth_required_names_service() {
        let message = ClientError::AuthRequired(ServiceType::SoundCloud).user_message();
        assert_eq!(message.title, "Please log in");
        assert!(message.description.contains("soundcloud"));
        assert_eq!(message.glyph, glyph::ACCOUNT);
    }

    #[test]
    fn transport_classification() {
        assert!(ClientError::ServerError { status: 500, message: String::new() }.is_transport());
        assert!(!ClientError::ParseError(String::new()).is_transport());
        assert!(!ClientError::AuthRequired(ServiceType::Fanburst).is_transport());
    }
}
