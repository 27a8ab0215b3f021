//! Composition root - owns the session and the notification channel
//!
//! [`Storefront`] decides which view a route shows, hydrates the session once
//! at construction, and is the only place session changes turn into
//! notifications and redirects. Front-ends (the terminal UI, the headless CLI)
//! drive it and render what it exposes.
//!
//! Auth submissions come in two shapes:
//! - inline: [`Storefront::submit`] awaits the request on the caller's task
//! - deferred: [`Storefront::begin_submit`] hands out a [`PendingAuth`] that
//!   runs anywhere and comes back through [`Storefront::settle`]; a response
//!   for a form that has since been unmounted is dropped there

use crate::auth::{
    AuthClient, AuthError, AuthGrant, AuthOutcome, FormTicket, LoginForm, LoginRequest,
    RegisterForm, RegisterRequest, SignIn, SubmitError,
};
use crate::catalog::{Catalog, ProductBrowser, ProductLookup};
use crate::notification::{Notification, NotificationChannel, Severity};
use crate::router::{self, Route, View};
use crate::session::{self, Session, SessionStore};

pub const LOGOUT_MESSAGE: &str = "Anda telah berhasil keluar.";

/// Which form the login view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginTab {
    #[default]
    Login,
    Register,
}

/// State of the mounted login view
///
/// Exists only while the login view is on screen; dropping it is the unmount.
#[derive(Default)]
pub struct LoginView {
    pub tab: LoginTab,
    pub login: LoginForm,
    pub register: RegisterForm,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn switch_to(&mut self, tab: LoginTab) {
        self.tab = tab;
    }

    fn is_submitting(&self) -> bool {
        self.login.is_submitting() || self.register.is_submitting()
    }
}

/// Request body of a deferred submission
#[derive(Debug, Clone)]
pub enum AuthRequest {
    Login(LoginRequest),
    Register(RegisterRequest),
}

/// A submission that passed local validation and awaits its response
#[derive(Debug, Clone)]
pub struct PendingAuth {
    pub ticket: FormTicket,
    pub request: AuthRequest,
}

impl PendingAuth {
    /// Perform the request; owns everything so it can be spawned
    pub async fn send(self, client: AuthClient) -> SettledAuth {
        let result = match &self.request {
            AuthRequest::Login(request) => client.login(request).await,
            AuthRequest::Register(request) => client.register(request).await,
        };
        SettledAuth {
            ticket: self.ticket,
            result,
        }
    }
}

/// A response on its way back to the form that asked for it
#[derive(Debug)]
pub struct SettledAuth {
    pub ticket: FormTicket,
    pub result: Result<AuthGrant, AuthError>,
}

/// How a submission ended, from the composition root's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Session established, greeting posted, redirected home
    SignedIn,
    /// Account created without a token, login tab shown
    LoginRequired,
    /// Failure already reported as a notification
    Failed,
    /// The form that asked is gone; nothing was applied
    Discarded,
}

pub struct Storefront {
    client: AuthClient,
    sessions: SessionStore,
    notifications: NotificationChannel,
    catalog: Catalog,
    route: Route,
    /// View whose local state is currently mounted
    mounted: View,
    login_view: Option<LoginView>,
    browser: ProductBrowser,
}

impl Storefront {
    /// Mount the root at `/`, hydrating the session from storage
    pub fn new(
        client: AuthClient,
        mut sessions: SessionStore,
        catalog: Catalog,
        notifications: NotificationChannel,
    ) -> Self {
        sessions.hydrate();

        Self {
            client,
            sessions,
            notifications,
            catalog,
            route: Route::Home,
            mounted: View::Home,
            login_view: None,
            browser: ProductBrowser::new(),
        }
    }

    pub fn session(&self) -> &Session {
        self.sessions.current()
    }

    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn view(&self) -> View {
        router::resolve_view(&self.route, self.session().state())
    }

    pub fn navbar_visible(&self) -> bool {
        router::navbar_visible(&self.route)
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifications.current()
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    pub fn dismiss_notification(&mut self) {
        self.notifications.dismiss();
    }

    pub fn login_view(&self) -> Option<&LoginView> {
        self.login_view.as_ref()
    }

    pub fn login_view_mut(&mut self) -> Option<&mut LoginView> {
        self.login_view.as_mut()
    }

    /// Products view inputs together with the catalog they filter
    pub fn browser_mut(&mut self) -> (&mut ProductBrowser, &Catalog) {
        (&mut self.browser, &self.catalog)
    }

    /// Resolve the `:id` of the current detail route
    pub fn product_lookup(&self) -> Option<ProductLookup<'_>> {
        match self.view() {
            View::ProductDetail { id } => Some(self.catalog.lookup(id.as_deref())),
            _ => None,
        }
    }

    /// Change route and (un)mount per-view state to match
    pub fn navigate(&mut self, path: &str) {
        let route = Route::parse(path);
        tracing::debug!("Navigate {} -> {}", self.route, route);
        self.route = route;
        self.remount();
    }

    /// Mount or drop view-local state when the resolved view changed
    ///
    /// The resolved view depends on the session too, so this runs after
    /// session changes as well as after navigation.
    fn remount(&mut self) {
        let view = self.view();
        if view == self.mounted {
            return;
        }

        self.login_view = (view == View::Login).then(LoginView::new);
        if view == View::Products {
            self.browser = ProductBrowser::new();
        }
        self.mounted = view;
    }

    /// Sign out, tell the user, and go to the login route
    pub fn logout(&mut self) {
        self.sessions.logout();
        tracing::info!("Logged out");
        self.notifications.post(LOGOUT_MESSAGE, Severity::Info);
        self.navigate(router::LOGIN_PATH);
    }

    /// Log the add-to-cart intent for the product on the detail route
    pub fn add_to_cart(&mut self, product_id: u64) {
        let Some(product) = self.catalog.products().iter().find(|p| p.id == product_id) else {
            tracing::warn!("Add to cart for unknown product {}", product_id);
            return;
        };
        let message = self.catalog.add_to_cart(product);
        self.notifications.post(message, Severity::Info);
    }

    /// Start a submission of the active login-view form
    ///
    /// `None` when the login view is not mounted or local validation failed
    /// (already reported).
    pub fn begin_submit(&mut self) -> Option<PendingAuth> {
        let view = self.login_view.as_mut()?;
        let notifications = &mut self.notifications;

        let pending = match view.tab {
            LoginTab::Login => view.login.begin(notifications).map(|request| PendingAuth {
                ticket: view.login.ticket(),
                request: AuthRequest::Login(request),
            }),
            LoginTab::Register => view.register.begin(notifications).map(|request| PendingAuth {
                ticket: view.register.ticket(),
                request: AuthRequest::Register(request),
            }),
        };

        pending.ok()
    }

    /// Apply a deferred response if its form is still mounted
    pub fn settle(&mut self, settled: SettledAuth) -> Settlement {
        let SettledAuth { ticket, result } = settled;

        let Some(view) = self.login_view.as_mut() else {
            tracing::debug!("Dropping auth response, login view unmounted");
            return Settlement::Discarded;
        };

        if view.login.ticket() == ticket {
            let signed_in = view.login.finish(result, &mut self.sessions, &mut self.notifications);
            self.after_login(signed_in)
        } else if view.register.ticket() == ticket {
            let outcome = view
                .register
                .finish(result, &mut self.sessions, &mut self.notifications);
            self.after_register(outcome)
        } else {
            tracing::debug!("Dropping auth response for replaced form {:?}", ticket);
            Settlement::Discarded
        }
    }

    /// Submit the active form and wait for the response on this task
    pub async fn submit(&mut self) -> Result<Settlement, SubmitError> {
        let Some(view) = self.login_view.as_mut() else {
            return Ok(Settlement::Discarded);
        };

        match view.tab {
            LoginTab::Login => {
                let signed_in = view
                    .login
                    .submit(&self.client, &mut self.sessions, &mut self.notifications)
                    .await?;
                Ok(self.after_login(signed_in))
            }
            LoginTab::Register => {
                let outcome = view
                    .register
                    .submit(&self.client, &mut self.sessions, &mut self.notifications)
                    .await?;
                Ok(self.after_register(outcome))
            }
        }
    }

    /// Whether a submission from the mounted login view is in flight
    pub fn is_submitting(&self) -> bool {
        self.login_view.as_ref().is_some_and(LoginView::is_submitting)
    }

    fn after_login(&mut self, signed_in: Option<SignIn>) -> Settlement {
        match signed_in {
            Some(signed_in) => {
                let name = session::display_name(signed_in.user.as_ref());
                let greeting = format!("Selamat datang kembali, {}!", name);
                self.welcome(greeting)
            }
            None => Settlement::Failed,
        }
    }

    fn after_register(&mut self, outcome: Option<AuthOutcome>) -> Settlement {
        match outcome {
            Some(AuthOutcome::SignedIn(signed_in)) => {
                let name = session::display_name(signed_in.user.as_ref());
                let greeting = format!("Selamat datang, {}!", name);
                self.welcome(greeting)
            }
            Some(AuthOutcome::LoginRequired) => {
                if let Some(view) = self.login_view.as_mut() {
                    view.switch_to(LoginTab::Login);
                }
                Settlement::LoginRequired
            }
            None => Settlement::Failed,
        }
    }

    /// Session is already updated; greet, then redirect
    fn welcome(&mut self, greeting: String) -> Settlement {
        tracing::info!("Signed in as {}", self.session().display_name());
        self.notifications.post(greeting, Severity::Success);
        self.navigate(router::HOME_PATH);
        Settlement::SignedIn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{UserRecord, TOKEN_KEY};
    use crate::storage::MemoryStore;
    use std::time::Duration;

    fn storefront(store: MemoryStore) -> Storefront {
        let client = AuthClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        Storefront::new(
            client,
            SessionStore::new(store),
            Catalog::bundled().unwrap(),
            NotificationChannel::new(),
        )
    }

    fn budi() -> UserRecord {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Budi",
            "email": "budi@example.com"
        }))
        .unwrap()
    }

    fn fill_login(app: &mut Storefront) {
        let view = app.login_view_mut().unwrap();
        view.login.email = "budi@example.com".to_string();
        view.login.password = "rahasia123".to_string();
    }

    #[tokio::test]
    async fn test_mount_hydrates_session() {
        let app = storefront(MemoryStore::with_entries([(TOKEN_KEY, "t1")]));
        assert!(app.session().is_authenticated());
        assert_eq!(app.view(), View::Home);
    }

    #[tokio::test]
    async fn test_login_view_mounts_and_unmounts() {
        let mut app = storefront(MemoryStore::new());
        assert!(app.login_view().is_none());

        app.navigate("/login");
        assert_eq!(app.view(), View::Login);
        assert!(!app.navbar_visible());
        assert!(app.login_view().is_some());

        app.navigate("/products");
        assert!(app.navbar_visible());
        assert!(app.login_view().is_none());
    }

    #[tokio::test]
    async fn test_signed_in_user_never_sees_login() {
        let mut app = storefront(MemoryStore::with_entries([(TOKEN_KEY, "t1")]));
        app.navigate("/login");
        assert_eq!(app.view(), View::Home);
        assert!(app.login_view().is_none());
    }

    #[tokio::test]
    async fn test_deferred_login_success_greets_and_redirects() {
        let mut app = storefront(MemoryStore::new());
        app.navigate("/login");
        fill_login(&mut app);

        let pending = app.begin_submit().unwrap();
        assert!(app.is_submitting());
        // A second press while in flight is ignored
        assert!(app.begin_submit().is_none());

        let settlement = app.settle(SettledAuth {
            ticket: pending.ticket,
            result: Ok(AuthGrant {
                token: Some("t1".to_string()),
                user: Some(budi()),
            }),
        });

        assert_eq!(settlement, Settlement::SignedIn);
        assert_eq!(app.session().display_name(), "Budi");
        assert_eq!(app.route(), &Route::Home);
        assert!(app.login_view().is_none());
        let note = app.notification().unwrap();
        assert_eq!(note.severity, Severity::Success);
        assert!(note.message.contains("Budi"));
    }

    #[tokio::test]
    async fn test_response_for_unmounted_form_is_dropped() {
        let mut app = storefront(MemoryStore::new());
        app.navigate("/login");
        fill_login(&mut app);
        let pending = app.begin_submit().unwrap();

        // User walks away, then comes back to a fresh form
        app.navigate("/about");
        let settled = SettledAuth {
            ticket: pending.ticket,
            result: Ok(AuthGrant {
                token: Some("t1".to_string()),
                user: None,
            }),
        };
        assert_eq!(app.settle(settled), Settlement::Discarded);

        app.navigate("/login");
        let settled = SettledAuth {
            ticket: pending.ticket,
            result: Err(AuthError::Unauthorized),
        };
        assert_eq!(app.settle(settled), Settlement::Discarded);

        assert!(!app.session().is_authenticated());
        assert_eq!(app.notification(), None);
        assert!(!app.is_submitting());
    }

    #[tokio::test]
    async fn test_register_without_token_switches_to_login_tab() {
        let mut app = storefront(MemoryStore::new());
        app.navigate("/login");
        {
            let view = app.login_view_mut().unwrap();
            view.switch_to(LoginTab::Register);
            view.register.name = "Sari".to_string();
            view.register.email = "sari@example.com".to_string();
            view.register.password = "rahasia123".to_string();
            view.register.password_confirmation = "rahasia123".to_string();
        }

        let pending = app.begin_submit().unwrap();
        assert!(matches!(pending.request, AuthRequest::Register(_)));

        let settlement = app.settle(SettledAuth {
            ticket: pending.ticket,
            result: Ok(AuthGrant::default()),
        });
        assert_eq!(settlement, Settlement::LoginRequired);
        assert_eq!(app.login_view().unwrap().tab, LoginTab::Login);
        assert_eq!(app.route(), &Route::Login);
        assert!(!app.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_redirects() {
        let mut app = storefront(MemoryStore::with_entries([(TOKEN_KEY, "t1")]));
        app.navigate("/products");

        app.logout();
        assert!(!app.session().is_authenticated());
        assert_eq!(app.route(), &Route::Login);
        assert_eq!(app.view(), View::Login);
        let note = app.notification().unwrap();
        assert_eq!(note.message, LOGOUT_MESSAGE);
        assert_eq!(note.severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_product_lookup_states() {
        let mut app = storefront(MemoryStore::new());
        assert_eq!(app.product_lookup(), None);

        app.navigate("/product/999");
        assert_eq!(
            app.product_lookup(),
            Some(ProductLookup::NotFound {
                id: "999".to_string()
            })
        );

        app.navigate("/product");
        assert_eq!(app.product_lookup(), Some(ProductLookup::MissingId));

        app.navigate("/product/2");
        assert!(matches!(app.product_lookup(), Some(ProductLookup::Found(p)) if p.id == 2));

        app.add_to_cart(2);
        assert!(app.notification().unwrap().message.starts_with("Menambahkan"));
    }
}
