//! Shared setup for integration tests.
//!
//! A `Storefront` wired to a wiremock server and a file store in a temp dir.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;
use storefront::app::{LoginTab, Storefront};
use storefront::auth::AuthClient;
use storefront::catalog::Catalog;
use storefront::notification::NotificationChannel;
use storefront::session::SessionStore;
use storefront::storage::FileStore;

pub const STORAGE_FILE: &str = "local_storage.json";

/// Root mounted against `api_url`, persisting under `dir`
pub fn storefront(api_url: &str, dir: &Path) -> Storefront {
    let client = AuthClient::new(api_url, Duration::from_secs(5)).unwrap();
    let store = FileStore::open(dir.join(STORAGE_FILE)).unwrap();
    Storefront::new(
        client,
        SessionStore::new(store),
        Catalog::bundled().unwrap(),
        NotificationChannel::new(),
    )
}

/// `{ "user": { "token": .., "id": 1, "name": .., "email": .. } }`
pub fn grant_body(token: Option<&str>, name: &str) -> serde_json::Value {
    let mut user = serde_json::json!({
        "id": 1,
        "name": name,
        "email": "budi@example.com",
        "role": "customer",
        "created_at": "2024-05-01T08:00:00Z"
    });
    if let Some(token) = token {
        user["token"] = serde_json::Value::String(token.to_string());
    }
    serde_json::json!({ "user": user })
}

pub fn fill_login(app: &mut Storefront, email: &str, password: &str) {
    app.navigate("/login");
    let view = app.login_view_mut().expect("login view mounted");
    view.switch_to(LoginTab::Login);
    view.login.email = email.to_string();
    view.login.password = password.to_string();
}

pub fn fill_register(app: &mut Storefront, name: &str, password: &str, confirmation: &str) {
    app.navigate("/login");
    let view = app.login_view_mut().expect("login view mounted");
    view.switch_to(LoginTab::Register);
    view.register.name = name.to_string();
    view.register.email = "sari@example.com".to_string();
    view.register.password = password.to_string();
    view.register.password_confirmation = confirmation.to_string();
}
