//! Request types for the authentication service.

use crate::observability::Redacted;
use serde::Serialize;

/// Body of the `login` call
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    /// Account username
    pub username: &'a str,
    /// Account password
    pub password: &'a str,
}

impl<'a> LoginRequest<'a> {
    /// Create a login request
    pub fn new(username: &'a str, password: &'a str) -> Self {
        Self { username, password }
    }
}

impl std::fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &Redacted::new(self.password))
            .finish()
    }
}
