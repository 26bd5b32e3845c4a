/// Client error types

/// Result alias for client calls
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure or undecodable response body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status; `message` is its plain-text body
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Bad client settings (for example an unparseable user id)
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Text suitable for showing to a user
    ///
    /// API errors carry the server's message; an empty body falls back to
    /// the status code.
    pub fn message(&self) -> String {
        match self {
            ClientError::Api { status, message } if message.trim().is_empty() => {
                format!("Request failed with status {}", status)
            }
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
