//! Login and registration form controllers
//!
//! Each form owns its input buffer and a `submitting` flag. A submission is
//! split in two halves so the terminal UI can run the request in the
//! background:
//!
//! - `begin` validates locally, raises `submitting` and yields the request body
//! - `finish` lowers `submitting`, applies the outcome to the session and
//!   posts error notifications
//!
//! `submit` runs both halves around the request inline and guarantees the
//! flag is lowered even if the future is dropped mid-request.

use super::{AuthClient, AuthError, AuthGrant, FormKind, LoginRequest, RegisterRequest};
use crate::notification::{Notify, Severity};
use crate::session::{SessionStore, UserRecord};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub const PASSWORD_MISMATCH: &str = "Kata sandi tidak cocok!";
pub const MISSING_FIELDS: &str = "Lengkapi semua kolom.";
pub const INVALID_EMAIL: &str = "Alamat email tidak valid.";
pub const LOGIN_WITHOUT_TOKEN: &str = "Login berhasil, tetapi token tidak diterima.";
pub const REGISTERED_PLEASE_LOGIN: &str = "Akun Anda berhasil didaftarkan! Silakan login.";

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identity of one mounted form instance
///
/// Responses are tagged with the ticket of the form that asked; a response
/// whose ticket no longer matches a mounted form is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormTicket(u64);

impl FormTicket {
    fn next() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

/// Local reasons a submission never reached the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// A request from this form is still in flight
    AlreadySubmitting,
    /// A required field is blank
    MissingField(&'static str),
    /// The email does not look like an address
    InvalidEmail,
    /// Registration password and confirmation differ
    PasswordMismatch,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySubmitting => write!(f, "A submission is already in flight"),
            Self::MissingField(field) => write!(f, "Missing required field: {}", field),
            Self::InvalidEmail => write!(f, "Invalid email address"),
            Self::PasswordMismatch => write!(f, "Password confirmation does not match"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl SubmitError {
    /// Notification for this failure; an in-flight request just ignores the click
    fn notification(&self) -> Option<(&'static str, Severity)> {
        match self {
            Self::AlreadySubmitting => None,
            Self::MissingField(_) => Some((MISSING_FIELDS, Severity::Warning)),
            Self::InvalidEmail => Some((INVALID_EMAIL, Severity::Warning)),
            Self::PasswordMismatch => Some((PASSWORD_MISMATCH, Severity::Error)),
        }
    }

    fn report(self, notify: &mut impl Notify) -> Self {
        tracing::debug!("Submission rejected locally: {}", self);
        if let Some((message, severity)) = self.notification() {
            notify.notify(message.to_string(), severity);
        }
        self
    }
}

/// A completed sign-in, session already updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub token: String,
    pub user: Option<UserRecord>,
}

/// What a successful registration means for the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Token issued, the user is signed in
    SignedIn(SignIn),
    /// Account created without a token, the caller should show the login form
    LoginRequired,
}

/// Lowers the flag when the request scope ends, however it ends
struct InFlight<'a>(&'a mut bool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Minimal shape check; the server does the real validation
fn plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.trim().split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn required(value: &str, field: &'static str) -> Result<(), SubmitError> {
    if value.trim().is_empty() {
        Err(SubmitError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Persist a granted token, or `None` if there was no token
fn sign_in(grant: AuthGrant, sessions: &mut SessionStore) -> Option<SignIn> {
    let token = grant.token?;
    sessions.login(&token, grant.user.clone());
    Some(SignIn {
        token,
        user: grant.user,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────────────────────────

pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    submitting: bool,
    ticket: FormTicket,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            show_password: false,
            submitting: false,
            ticket: FormTicket::next(),
        }
    }

    pub fn ticket(&self) -> FormTicket {
        self.ticket
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate and mark the form as submitting
    pub fn begin(&mut self, notify: &mut impl Notify) -> Result<LoginRequest, SubmitError> {
        if self.submitting {
            return Err(SubmitError::AlreadySubmitting.report(notify));
        }
        required(&self.email, "email")
            .and_then(|_| required(&self.password, "password"))
            .map_err(|e| e.report(notify))?;
        if !plausible_email(&self.email) {
            return Err(SubmitError::InvalidEmail.report(notify));
        }

        self.submitting = true;
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Apply a settled request
    ///
    /// Returns the sign-in when a token came back; every other outcome has
    /// already been reported through `notify` and leaves the session alone.
    pub fn finish(
        &mut self,
        result: Result<AuthGrant, AuthError>,
        sessions: &mut SessionStore,
        notify: &mut impl Notify,
    ) -> Option<SignIn> {
        self.submitting = false;

        match result {
            Ok(grant) => {
                let signed_in = sign_in(grant, sessions);
                if signed_in.is_none() {
                    tracing::warn!("Login succeeded without a token");
                    notify.notify(LOGIN_WITHOUT_TOKEN.to_string(), Severity::Error);
                } else {
                    self.password.clear();
                }
                signed_in
            }
            Err(e) => {
                tracing::info!("Login failed: {}", e);
                notify.notify(e.user_message(FormKind::Login), Severity::Error);
                None
            }
        }
    }

    /// Validate, send and apply in one go
    pub async fn submit(
        &mut self,
        client: &AuthClient,
        sessions: &mut SessionStore,
        notify: &mut impl Notify,
    ) -> Result<Option<SignIn>, SubmitError> {
        let request = self.begin(notify)?;
        let result = {
            let _in_flight = InFlight(&mut self.submitting);
            client.login(&request).await
        };
        Ok(self.finish(result, sessions, notify))
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub show_password: bool,
    pub show_confirmation: bool,
    submitting: bool,
    ticket: FormTicket,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            show_password: false,
            show_confirmation: false,
            submitting: false,
            ticket: FormTicket::next(),
        }
    }

    pub fn ticket(&self) -> FormTicket {
        self.ticket
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate (including the password confirmation) and mark as submitting
    pub fn begin(&mut self, notify: &mut impl Notify) -> Result<RegisterRequest, SubmitError> {
        if self.submitting {
            return Err(SubmitError::AlreadySubmitting.report(notify));
        }
        required(&self.name, "name")
            .and_then(|_| required(&self.email, "email"))
            .and_then(|_| required(&self.password, "password"))
            .and_then(|_| required(&self.password_confirmation, "password_confirmation"))
            .map_err(|e| e.report(notify))?;
        if !plausible_email(&self.email) {
            return Err(SubmitError::InvalidEmail.report(notify));
        }
        if self.password != self.password_confirmation {
            return Err(SubmitError::PasswordMismatch.report(notify));
        }

        self.submitting = true;
        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
        })
    }

    /// Apply a settled request; `None` means the failure was already reported
    pub fn finish(
        &mut self,
        result: Result<AuthGrant, AuthError>,
        sessions: &mut SessionStore,
        notify: &mut impl Notify,
    ) -> Option<AuthOutcome> {
        self.submitting = false;

        match result {
            Ok(grant) => {
                self.password.clear();
                self.password_confirmation.clear();
                match sign_in(grant, sessions) {
                    Some(signed_in) => Some(AuthOutcome::SignedIn(signed_in)),
                    None => {
                        tracing::info!("Registered without a token, manual login required");
                        notify.notify(REGISTERED_PLEASE_LOGIN.to_string(), Severity::Success);
                        Some(AuthOutcome::LoginRequired)
                    }
                }
            }
            Err(e) => {
                tracing::info!("Registration failed: {}", e);
                notify.notify(e.user_message(FormKind::Register), Severity::Error);
                None
            }
        }
    }

    /// Validate, send and apply in one go
    pub async fn submit(
        &mut self,
        client: &AuthClient,
        sessions: &mut SessionStore,
        notify: &mut impl Notify,
    ) -> Result<Option<AuthOutcome>, SubmitError> {
        let request = self.begin(notify)?;
        let result = {
            let _in_flight = InFlight(&mut self.submitting);
            client.register(&request).await
        };
        Ok(self.finish(result, sessions, notify))
    }
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self::new()
    }
}
