//! Error types
//!
//! `ApiError` describes a failed exchange with the remote API. `SyncError`
//! is what collection operations report; every variant carries the
//! message shown to the user when the operation fails.

use thiserror::Error;

/// Errors raised while talking to the remote API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The configured base URL cannot be joined with a path
    #[error("Invalid API URL '{0}'")]
    InvalidUrl(String),

    /// The server answered with a non-success status
    #[error("Server returned status {status}")]
    Status { status: u16 },

    /// The response body is not what the endpoint promises
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// Failed to decode JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by collection sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// The token store could not be read
    ///
    /// Never surfaced by sync operations: the request goes out without
    /// an Authorization header instead.
    #[error("Failed to read auth token: {0}")]
    TokenRetrievalFailed(String),

    /// Listing the collection failed
    #[error("Failed to fetch collection: {0}")]
    FetchFailed(#[source] ApiError),

    /// A required field is empty; nothing was sent
    #[error("Missing required field '{field}'")]
    ValidationFailed { field: &'static str },

    /// Create or update failed, or the response carried no `data._id`
    #[error("Failed to save resource: {0}")]
    UpsertFailed(#[source] ApiError),

    /// Delete request failed
    #[error("Failed to delete resource '{id}': {source}")]
    DeleteFailed {
        id: String,
        #[source]
        source: ApiError,
    },
}

impl SyncError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            SyncError::TokenRetrievalFailed(_) => "Could not read your session.",
            SyncError::FetchFailed(ApiError::Transport { .. }) => "Error fetching books",
            SyncError::FetchFailed(_) => "Failed to fetch books",
            SyncError::ValidationFailed { .. } => "Please fill in all fields.",
            SyncError::UpsertFailed(ApiError::Transport { .. }) => {
                "An error occurred while adding/updating the book."
            }
            SyncError::UpsertFailed(_) => "Failed to add or update book. Please try again.",
            SyncError::DeleteFailed { .. } => "An error occurred while deleting the book.",
        }
    }
}

/// Errors from registration and login
#[derive(Error, Debug)]
pub enum AccountError {
    /// The requested username is already registered
    #[error("Username already exists")]
    UsernameTaken,

    /// The server rejected the username for another reason
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Registration failed without a username-specific reason
    #[error("Registration failed: {0}")]
    RegistrationFailed(#[source] ApiError),

    /// Login failed or returned no token
    #[error("Login failed: {0}")]
    LoginFailed(#[source] ApiError),

    /// The token could not be written to or removed from the token store
    #[error("Failed to update token store: {0}")]
    TokenStore(#[from] crate::token::TokenStoreError),
}

impl AccountError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            AccountError::UsernameTaken => {
                "This username is already taken. Please choose another one."
            }
            AccountError::InvalidUsername(_) => {
                "There was an error with your username. Please try again."
            }
            AccountError::RegistrationFailed(_) => "Registration failed. Please try again.",
            AccountError::LoginFailed(_) => "Login failed. Check your username and password.",
            AccountError::TokenStore(_) => "Could not save your session.",
        }
    }
}

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
