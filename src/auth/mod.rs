//! Authentication against the storefront backend
//!
//! `POST {api_url}/api/login` and `POST {api_url}/api/register`, both answering
//! `{ "user": { "token": ..., <profile fields> } }` on success and an error
//! status with an optional `message` / `errors` JSON body on failure.
//!
//! Failures are classified into [`AuthError`] here, once, so callers never
//! inspect raw responses. The form controllers in [`form`] turn outcomes into
//! session changes and notifications.

pub mod form;

use crate::session::UserRecord;
use anyhow::Context;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub use form::{AuthOutcome, FormTicket, LoginForm, RegisterForm, SignIn, SubmitError};

pub const LOGIN_PATH: &str = "/api/login";
pub const REGISTER_PATH: &str = "/api/register";

/// Shown for a 401 on login when the server gave no better text
pub const INVALID_CREDENTIALS: &str = "Email atau kata sandi salah.";
/// Shown when no HTTP response was obtained at all
pub const SERVER_UNREACHABLE: &str = "Tidak dapat terhubung ke server. Periksa koneksi Anda.";

/// Which form a failure belongs to; login and register word 401s differently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
}

/// Why an authentication request failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The server explained itself in a `message` field
    ServerMessage(String),
    /// The server returned per-field validation errors
    FieldErrors(BTreeMap<String, Vec<String>>),
    /// HTTP 401 without any server text
    Unauthorized,
    /// Any other HTTP failure without server text
    Rejected { status: u16 },
    /// No HTTP response (DNS, refused connection, timeout, ...)
    Unreachable(String),
}

impl AuthError {
    /// Text to show the user
    ///
    /// Priority: server message, then flattened field errors, then the fixed
    /// credentials text (login only), then generic fallbacks.
    pub fn user_message(&self, kind: FormKind) -> String {
        match (self, kind) {
            (AuthError::ServerMessage(message), _) => message.clone(),
            (AuthError::FieldErrors(errors), _) => errors
                .values()
                .flatten()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
            (AuthError::Unauthorized, FormKind::Login) => INVALID_CREDENTIALS.to_string(),
            (AuthError::Unauthorized, FormKind::Register) => {
                generic_failure(StatusCode::UNAUTHORIZED.as_u16())
            }
            (AuthError::Rejected { status }, _) => generic_failure(*status),
            (AuthError::Unreachable(_), _) => SERVER_UNREACHABLE.to_string(),
        }
    }

    /// Classify an error response from its status and raw body
    fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        if let Some(message) = parsed.message.filter(|m| !m.trim().is_empty()) {
            return AuthError::ServerMessage(message);
        }

        if let Some(errors) = parsed.errors.filter(|e| e.values().any(|v| !v.is_empty())) {
            return AuthError::FieldErrors(errors);
        }

        if status == StatusCode::UNAUTHORIZED {
            AuthError::Unauthorized
        } else {
            AuthError::Rejected {
                status: status.as_u16(),
            }
        }
    }
}

fn generic_failure(status: u16) -> String {
    format!(
        "Terjadi kesalahan pada server (HTTP {}). Silakan coba lagi.",
        status
    )
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerMessage(msg) => write!(f, "Server rejected request: {}", msg),
            Self::FieldErrors(errors) => {
                let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
                write!(f, "Validation failed for: {}", fields.join(", "))
            }
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Rejected { status } => write!(f, "Request failed with HTTP {}", status),
            Self::Unreachable(msg) => write!(f, "Server unreachable: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Error body shape; both fields optional
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<BTreeMap<String, Vec<String>>>,
}

/// `{ "user": { "token": ..., ...profile } }`
#[derive(Debug, Deserialize)]
struct GrantEnvelope {
    user: Option<GrantUser>,
}

#[derive(Debug, Deserialize)]
struct GrantUser {
    token: Option<String>,
    #[serde(flatten)]
    profile: serde_json::Map<String, serde_json::Value>,
}

/// What a successful request yielded
///
/// Either part may be missing; a 2xx without a token is still a success at
/// the HTTP level and the forms decide what it means.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthGrant {
    pub token: Option<String>,
    pub user: Option<UserRecord>,
}

impl AuthGrant {
    fn from_body(body: &str) -> Self {
        let envelope: GrantEnvelope = match serde_json::from_str(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("Unexpected auth response body: {}", e);
                return Self::default();
            }
        };

        let Some(user) = envelope.user else {
            return Self::default();
        };

        let token = user.token.filter(|t| !t.is_empty());
        // Profile fields are carried as received; an empty object is no profile
        let profile = Some(user.profile)
            .filter(|fields| !fields.is_empty())
            .map(UserRecord::from);

        Self {
            token,
            user: profile,
        }
    }
}

/// Body of `POST /api/login`
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /api/register`
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP client for the authentication endpoints
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client for `base_url` (scheme + host, no `/api` suffix)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::info!("Auth client targeting {}", base_url);

        Ok(Self { client, base_url })
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthGrant, AuthError> {
        self.post(LOGIN_PATH, request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthGrant, AuthError> {
        self.post(REGISTER_PATH, request).await
    }

    async fn post<T: Serialize + fmt::Debug>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<AuthGrant, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {} {:?}", url, body);

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        let status = response.status();
        // A body that fails mid-read still came with a status, so classify on that
        let text = response.text().await.unwrap_or_default();

        if status.is_success() {
            tracing::info!("POST {} -> {}", path, status);
            Ok(AuthGrant::from_body(&text))
        } else {
            let error = AuthError::from_response(status, &text);
            tracing::warn!("POST {} -> {}: {}", path, status, error);
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field_wins() {
        let body = r#"{"message":"Akun diblokir","errors":{"email":["x"]}}"#;
        let error = AuthError::from_response(StatusCode::UNAUTHORIZED, body);
        assert_eq!(error, AuthError::ServerMessage("Akun diblokir".to_string()));
        assert_eq!(error.user_message(FormKind::Login), "Akun diblokir");
    }

    #[test]
    fn test_field_errors_are_flattened_by_line() {
        let body = r#"{"errors":{"email":["Email sudah dipakai."],"password":["Minimal 8 karakter.","Harus ada angka."]}}"#;
        let error = AuthError::from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(
            error.user_message(FormKind::Register),
            "Email sudah dipakai.\nMinimal 8 karakter.\nHarus ada angka."
        );
    }

    #[test]
    fn test_unauthorized_without_body() {
        let error = AuthError::from_response(StatusCode::UNAUTHORIZED, "");
        assert_eq!(error, AuthError::Unauthorized);
        assert_eq!(error.user_message(FormKind::Login), INVALID_CREDENTIALS);
        // Registration has no credentials text
        assert_ne!(error.user_message(FormKind::Register), INVALID_CREDENTIALS);
    }

    #[test]
    fn test_blank_message_falls_through() {
        let error = AuthError::from_response(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":"  "}"#);
        assert_eq!(error, AuthError::Rejected { status: 500 });
        assert!(error.user_message(FormKind::Login).contains("HTTP 500"));
    }

    #[test]
    fn test_unreachable_text() {
        let error = AuthError::Unreachable("connection refused".to_string());
        assert_eq!(error.user_message(FormKind::Login), SERVER_UNREACHABLE);
        assert_eq!(error.user_message(FormKind::Register), SERVER_UNREACHABLE);
    }

    #[test]
    fn test_grant_parses_token_and_profile() {
        let body = r#"{"user":{"token":"t1","id":1,"name":"Budi","email":"budi@example.com","role":"customer","email_verified_at":null,"created_at":"2024-05-01T08:00:00.000000Z","updated_at":"2024-05-01T08:00:00.000000Z"}}"#;
        let grant = AuthGrant::from_body(body);
        assert_eq!(grant.token.as_deref(), Some("t1"));
        let user = grant.user.unwrap();
        assert_eq!(user.name(), Some("Budi"));
        assert_eq!(user.get("id"), Some(&serde_json::json!(1)));
        assert_eq!(user.get("token"), None);
    }

    #[test]
    fn test_grant_keeps_profile_of_any_field_shape() {
        let body = r#"{"user":{"token":"t1","id":"1","name":"Budi","email":"budi@example.com","created_at":"2024-05-01 08:00:00"}}"#;
        let grant = AuthGrant::from_body(body);
        assert_eq!(grant.token.as_deref(), Some("t1"));
        let user = grant.user.unwrap();
        assert_eq!(user.name(), Some("Budi"));
        assert_eq!(user.get("id"), Some(&serde_json::json!("1")));
        assert_eq!(
            user.get("created_at"),
            Some(&serde_json::json!("2024-05-01 08:00:00"))
        );
    }

    #[test]
    fn test_grant_tolerates_missing_parts() {
        assert_eq!(AuthGrant::from_body("not json"), AuthGrant::default());
        assert_eq!(AuthGrant::from_body(r#"{"user":null}"#), AuthGrant::default());

        // Token without a usable profile
        let grant = AuthGrant::from_body(r#"{"user":{"token":"t9"}}"#);
        assert_eq!(grant.token.as_deref(), Some("t9"));
        assert_eq!(grant.user, None);

        // Empty token counts as none
        let grant = AuthGrant::from_body(r#"{"user":{"token":""}}"#);
        assert_eq!(grant.token, None);
    }

    #[test]
    fn test_request_debug_redacts_password() {
        let request = LoginRequest {
            email: "a@b.c".to_string(),
            password: "rahasia".to_string(),
        };
        assert!(!format!("{:?}", request).contains("rahasia"));
    }
}
