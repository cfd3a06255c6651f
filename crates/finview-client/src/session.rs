//! Authenticated session handed to the client by the caller
//!
//! The token is injected explicitly rather than read from ambient
//! storage, so the client stays testable without a storage layer.

use serde::Deserialize;

/// An authenticated API session
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
}

impl Session {
    /// Create a session from an existing token
    pub fn new<T: Into<String>>(token: T) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Token {}", self.token)
    }

    /// The raw token string
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Body of a successful token login response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

impl From<TokenResponse> for Session {
    fn from(response: TokenResponse) -> Self {
        Session::new(response.auth_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let session = Session::new("abc123");
        assert_eq!(session.authorization(), "Token abc123");
        assert_eq!(session.token(), "abc123");
    }

    #[test]
    fn test_session_from_token_response() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"auth_token": "deadbeef"}"#).unwrap();
        let session: Session = response.into();
        assert_eq!(session.token(), "deadbeef");
    }
}
