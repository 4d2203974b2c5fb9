use thiserror::Error;

use crate::session::StorageError;

/// Local precondition failures. No network call is issued for any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no file selected")]
    NoFileSelected,

    #[error("job description is empty")]
    EmptyJobDescription,

    #[error("no recipient address")]
    NoRecipient,

    #[error("username and password are required")]
    MissingCredentials,

    #[error("username, email and password are required")]
    IncompleteSignup,
}

/// Remote call completed with a non-success indication, or the response body
/// could not be understood. `detail` carries the service-provided message
/// when one was present in the error body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("login rejected{}", fmt_detail(.detail))]
    LoginFailed { detail: Option<String> },

    #[error("signup rejected{}", fmt_detail(.detail))]
    SignupFailed { detail: Option<String> },

    #[error("failed to fetch resumes{}", fmt_detail(.detail))]
    FetchFailed { detail: Option<String> },

    #[error("resume upload failed{}", fmt_detail(.detail))]
    UploadFailed { detail: Option<String> },

    #[error("ranking failed{}", fmt_detail(.detail))]
    RankingFailed { detail: Option<String> },

    #[error("notification failed{}", fmt_detail(.detail))]
    NotificationFailed { detail: Option<String> },

    #[error("invalid response from the screening service: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// The service-provided detail, when one was parsed out of the error body.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RemoteError::LoginFailed { detail }
            | RemoteError::SignupFailed { detail }
            | RemoteError::FetchFailed { detail }
            | RemoteError::UploadFailed { detail }
            | RemoteError::RankingFailed { detail }
            | RemoteError::NotificationFailed { detail } => detail.as_deref(),
            RemoteError::InvalidResponse(msg) => Some(msg),
        }
    }
}

fn fmt_detail(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {d}"),
        None => String::new(),
    }
}

/// Top-level client error. Every operation boundary returns this; the CLI
/// converts it into a user-visible message and nothing escapes unhandled.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("remote call failed: {0}")]
    Remote(#[from] RemoteError),

    /// The call never completed: connect failure, timeout, or the connection
    /// dropped mid-response.
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// The durable client state could not be read or written.
    #[error("client state error: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            ClientError::Remote(e) => Some(e),
            _ => None,
        }
    }
}
