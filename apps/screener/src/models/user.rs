use serde::{Deserialize, Serialize};

/// Body of `POST /admin_login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Success body of `POST /admin_login`. The token is opaque to the client.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of `POST /admin_signup`.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of the signup response. The service reports soft failures (taken
/// username, existing email) through `success: false` plus `error`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST /send_email`.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationRequest {
    pub email: String,
    pub message: String,
}
