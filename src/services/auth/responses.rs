//! Response types for the authentication service.

use crate::observability::Redacted;
use serde::Deserialize;

/// Status literal of a successful login
pub const LOGIN_SUCCESS_STATUS: &str = "success";

/// Response from `login`
///
/// Both fields are optional on the wire; validation happens in the service
/// so that a malformed answer reads as a rejected login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    /// `"success"` or an error status
    #[serde(default)]
    pub status: Option<String>,
    /// Session data, present on success
    #[serde(default)]
    pub data: Option<LoginData>,
    /// Human readable failure reason
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// Whether the status literal reports success
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(LOGIN_SUCCESS_STATUS)
    }
}

/// Session data returned by `login`
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Id of the logged-in user
    pub user_id: String,
    /// Session token
    pub auth_token: String,
}

impl std::fmt::Debug for LoginData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginData")
            .field("user_id", &self.user_id)
            .field("auth_token", &Redacted::new(&self.auth_token))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_success() {
        let response: LoginResponse = serde_json::from_value(json!({
            "status": "success",
            "data": { "userId": "u1", "authToken": "t1", "me": { "username": "relay-bot" } }
        }))
        .unwrap();

        assert!(response.is_success());
        assert_eq!(response.data.unwrap().user_id, "u1");
    }

    #[test]
    fn test_login_response_error() {
        let response: LoginResponse = serde_json::from_value(json!({
            "status": "error",
            "error": "Unauthorized",
            "message": "Unauthorized"
        }))
        .unwrap();

        assert!(!response.is_success());
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("Unauthorized"));
    }
}
