/// Error type for every operation that reaches the remote store.
///
/// Local validation failures (blank trip names, inverted date ranges,
/// overlapping bookings) are never reported through this type; they are
/// returned as absent or rejected results instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TripPlannerError {
    /// The requested record does not exist on the remote store
    #[error("Resource not found")]
    NotFound,

    /// The remote store refused the credentials (HTTP 401/403)
    #[error("Authentication failed with remote store")]
    Unauthorized,

    /// Rate limited by the remote store (HTTP 429)
    #[error("Rate limited by remote store")]
    RateLimited,

    /// Any other non-success response
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code returned by the remote store
        status: u16,
        /// Message extracted from the response body, or the status text
        message: String,
    },

    /// The request could not be completed (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// A response or request body did not match the expected record shape
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Gateway configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TripPlannerError {
    /// Maps a non-success HTTP status to an error.
    ///
    /// `message` is the server-provided explanation, if the body carried one.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            404 => TripPlannerError::NotFound,
            401 | 403 => TripPlannerError::Unauthorized,
            429 => TripPlannerError::RateLimited,
            _ => TripPlannerError::Api {
                status,
                message: message.unwrap_or_else(|| format!("HTTP {}", status)),
            },
        }
    }

    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            TripPlannerError::Api { message, .. } => message.clone(),
            TripPlannerError::Network(_) => {
                "Could not reach the trip server. Check your connection and try again.".to_string()
            }
            TripPlannerError::DataFormat(_) | TripPlannerError::Config(_) => {
                "Unexpected error".to_string()
            }
            other => other.to_string(),
        }
    }
}
