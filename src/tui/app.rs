// App state for the TUI
//
// Wraps the Storefront with what only the terminal needs: which login field
// has focus, the address bar, and the quit flag. Key handling is layered:
// global keys, then the address bar when open, then the mounted view.

use super::theme::Theme;
use crate::app::{LoginTab, LoginView, SettledAuth, Storefront};
use crate::catalog::ProductLookup;
use crate::logging::LogBuffer;
use crate::router::{self, View};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

/// Events arriving from background tasks
#[derive(Debug)]
pub enum AppEvent {
    AuthSettled(SettledAuth),
}

/// An input on the login view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
    Confirmation,
}

impl Field {
    pub fn for_tab(tab: LoginTab) -> &'static [Field] {
        match tab {
            LoginTab::Login => &[Field::Email, Field::Password],
            LoginTab::Register => &[
                Field::Name,
                Field::Email,
                Field::Password,
                Field::Confirmation,
            ],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Nama",
            Field::Email => "Email",
            Field::Password => "Kata Sandi",
            Field::Confirmation => "Konfirmasi Kata Sandi",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Password | Field::Confirmation)
    }
}

/// Mutable buffer and visibility flag behind a field of the active form
fn field_mut(view: &mut LoginView, field: Field) -> (&mut String, Option<&mut bool>) {
    match (view.tab, field) {
        (LoginTab::Login, Field::Password) => {
            (&mut view.login.password, Some(&mut view.login.show_password))
        }
        (LoginTab::Login, _) => (&mut view.login.email, None),
        (LoginTab::Register, Field::Name) => (&mut view.register.name, None),
        (LoginTab::Register, Field::Email) => (&mut view.register.email, None),
        (LoginTab::Register, Field::Password) => (
            &mut view.register.password,
            Some(&mut view.register.show_password),
        ),
        (LoginTab::Register, Field::Confirmation) => (
            &mut view.register.password_confirmation,
            Some(&mut view.register.show_confirmation),
        ),
    }
}

/// Current text of a field and whether it is shown in clear
pub fn field_value(view: &LoginView, field: Field) -> (&str, bool) {
    match (view.tab, field) {
        (LoginTab::Login, Field::Password) => (&view.login.password, view.login.show_password),
        (LoginTab::Login, _) => (&view.login.email, true),
        (LoginTab::Register, Field::Name) => (&view.register.name, true),
        (LoginTab::Register, Field::Email) => (&view.register.email, true),
        (LoginTab::Register, Field::Password) => {
            (&view.register.password, view.register.show_password)
        }
        (LoginTab::Register, Field::Confirmation) => (
            &view.register.password_confirmation,
            view.register.show_confirmation,
        ),
    }
}

pub struct App {
    pub storefront: Storefront,
    pub log_buffer: LogBuffer,
    pub theme: Theme,
    /// Text being edited in the address bar, when open
    pub address_bar: Option<String>,
    /// Index into `Field::for_tab` of the active tab
    pub login_focus: usize,
    pub should_quit: bool,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        storefront: Storefront,
        log_buffer: LogBuffer,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            storefront,
            log_buffer,
            theme: Theme::default(),
            address_bar: None,
            login_focus: 0,
            should_quit: false,
            events,
        }
    }

    /// Field with focus on the mounted login view
    pub fn focused_field(&self) -> Option<Field> {
        let view = self.storefront.login_view()?;
        let fields = Field::for_tab(view.tab);
        Some(fields[self.login_focus % fields.len()])
    }

    pub fn navigate(&mut self, path: &str) {
        self.storefront.navigate(path);
        if self.storefront.view() == View::Login {
            self.login_focus = 0;
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::AuthSettled(settled) => {
                let tab_before = self.storefront.login_view().map(|v| v.tab);
                self.storefront.settle(settled);
                // Registration may flip the view to the login tab
                if self.storefront.login_view().map(|v| v.tab) != tab_before {
                    self.login_focus = 0;
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Key handling
    // ─────────────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.handle_global_key(&key) {
            return;
        }
        if self.address_bar.is_some() {
            self.handle_address_key(&key);
            return;
        }

        match self.storefront.view() {
            View::Products => self.handle_products_key(&key),
            View::ProductDetail { .. } => self.handle_detail_key(&key),
            View::Login => self.handle_login_key(&key),
            View::Home | View::About | View::Blank { .. } => {}
        }
    }

    fn handle_global_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('l') if ctrl => {
                self.address_bar = Some(self.storefront.route().path());
            }
            KeyCode::F(1) => self.navigate(router::HOME_PATH),
            KeyCode::F(2) => self.navigate("/about"),
            KeyCode::F(3) => self.navigate("/products"),
            KeyCode::F(4) => self.navigate(router::LOGIN_PATH),
            KeyCode::F(5) => {
                if self.storefront.session().is_authenticated() {
                    self.storefront.logout();
                    self.login_focus = 0;
                }
            }
            KeyCode::Esc => {
                if self.address_bar.take().is_none() {
                    self.storefront.dismiss_notification();
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_address_key(&mut self, key: &KeyEvent) {
        let Some(address) = self.address_bar.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                let path = std::mem::take(address);
                self.address_bar = None;
                self.navigate(&path);
            }
            KeyCode::Backspace => {
                address.pop();
            }
            KeyCode::Char(c) => address.push(c),
            _ => {}
        }
    }

    fn handle_products_key(&mut self, key: &KeyEvent) {
        let (browser, catalog) = self.storefront.browser_mut();
        match key.code {
            KeyCode::Up => browser.select_prev(),
            KeyCode::Down => browser.select_next(catalog),
            KeyCode::Tab => browser.cycle_category(catalog, true),
            KeyCode::BackTab => browser.cycle_category(catalog, false),
            KeyCode::Backspace => browser.pop_search_char(),
            KeyCode::Char(c) => browser.push_search_char(c),
            KeyCode::Enter => {
                if let Some(product) = browser.selected_product(catalog) {
                    let path = format!("/product/{}", product.id);
                    self.navigate(&path);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('a') => {
                let found = match self.storefront.product_lookup() {
                    Some(ProductLookup::Found(product)) => Some(product.id),
                    _ => None,
                };
                if let Some(id) = found {
                    self.storefront.add_to_cart(id);
                }
            }
            KeyCode::Backspace => self.navigate("/products"),
            _ => {}
        }
    }

    fn handle_login_key(&mut self, key: &KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let focused = self.focused_field();
        let Some(view) = self.storefront.login_view_mut() else {
            return;
        };
        let field_count = Field::for_tab(view.tab).len();

        match key.code {
            KeyCode::Char('t') if ctrl => {
                let next = match view.tab {
                    LoginTab::Login => LoginTab::Register,
                    LoginTab::Register => LoginTab::Login,
                };
                view.switch_to(next);
                self.login_focus = 0;
            }
            KeyCode::Char('p') if ctrl => {
                // Toggle the focused secret field, or the main password
                let field = focused.filter(Field::is_secret).unwrap_or(Field::Password);
                if let (_, Some(show)) = field_mut(view, field) {
                    *show = !*show;
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                self.login_focus = (self.login_focus + 1) % field_count;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.login_focus = (self.login_focus + field_count - 1) % field_count;
            }
            KeyCode::Backspace => {
                if let Some(field) = focused {
                    field_mut(view, field).0.pop();
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(field) = focused {
                    field_mut(view, field).0.push(c);
                }
            }
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    /// Start the active form's request in the background
    fn submit(&mut self) {
        let Some(pending) = self.storefront.begin_submit() else {
            return;
        };
        let client = self.storefront.client().clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let settled = pending.send(client).await;
            // Receiver gone means the UI is shutting down
            let _ = events.send(AppEvent::AuthSettled(settled));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthClient;
    use crate::catalog::Catalog;
    use crate::notification::NotificationChannel;
    use crate::router::Route;
    use crate::session::{SessionStore, TOKEN_KEY};
    use crate::storage::MemoryStore;
    use std::time::Duration;

    fn app_with(store: MemoryStore) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let client = AuthClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let storefront = Storefront::new(
            client,
            SessionStore::new(store),
            Catalog::bundled().unwrap(),
            NotificationChannel::new(),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(storefront, LogBuffer::new(), tx), rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_function_keys_navigate() {
        let (mut app, _rx) = app_with(MemoryStore::new());
        press(&mut app, KeyCode::F(3));
        assert_eq!(app.storefront.route(), &Route::Products);
        press(&mut app, KeyCode::F(4));
        assert_eq!(app.storefront.view(), View::Login);
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.storefront.route(), &Route::About);
    }

    #[tokio::test]
    async fn test_address_bar_navigates() {
        let (mut app, _rx) = app_with(MemoryStore::new());
        ctrl(&mut app, 'l');
        assert_eq!(app.address_bar.as_deref(), Some("/"));

        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "/product/3");
        press(&mut app, KeyCode::Enter);

        assert!(app.address_bar.is_none());
        assert!(matches!(
            app.storefront.product_lookup(),
            Some(ProductLookup::Found(p)) if p.id == 3
        ));
    }

    #[tokio::test]
    async fn test_products_search_and_open() {
        let (mut app, _rx) = app_with(MemoryStore::new());
        press(&mut app, KeyCode::F(3));
        type_str(&mut app, "batik");
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.storefront.route(),
            &Route::ProductDetail {
                id: Some("3".to_string())
            }
        );

        press(&mut app, KeyCode::Char('a'));
        let note = app.storefront.notification().unwrap();
        assert_eq!(note.message, "Menambahkan Kemeja Batik Parang ke keranjang!");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.storefront.notification(), None);

        // Fresh browser state on the way back
        press(&mut app, KeyCode::Backspace);
        let (browser, _) = app.storefront.browser_mut();
        assert_eq!(browser.criteria().search_term, "");
    }

    #[tokio::test]
    async fn test_login_typing_and_focus() {
        let (mut app, _rx) = app_with(MemoryStore::new());
        press(&mut app, KeyCode::F(4));
        assert_eq!(app.focused_field(), Some(Field::Email));

        type_str(&mut app, "budi@example.com");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "rahasia");
        ctrl(&mut app, 'p');

        let view = app.storefront.login_view().unwrap();
        assert_eq!(view.login.email, "budi@example.com");
        assert_eq!(view.login.password, "rahasia");
        assert!(view.login.show_password);

        ctrl(&mut app, 't');
        assert_eq!(app.storefront.login_view().unwrap().tab, LoginTab::Register);
        assert_eq!(app.focused_field(), Some(Field::Name));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.focused_field(), Some(Field::Confirmation));
    }

    #[tokio::test]
    async fn test_register_mismatch_never_spawns() {
        let (mut app, mut rx) = app_with(MemoryStore::new());
        press(&mut app, KeyCode::F(4));
        ctrl(&mut app, 't');
        for value in ["Sari", "sari@example.com", "satu", "dua"] {
            type_str(&mut app, value);
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Enter);

        assert!(!app.storefront.is_submitting());
        assert_eq!(
            app.storefront.notification().unwrap().message,
            crate::auth::form::PASSWORD_MISMATCH
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_logout_key_only_when_signed_in() {
        let (mut app, _rx) = app_with(MemoryStore::new());
        press(&mut app, KeyCode::F(5));
        assert_eq!(app.storefront.route(), &Route::Home);

        let (mut app, _rx) = app_with(MemoryStore::with_entries([(TOKEN_KEY, "t1")]));
        press(&mut app, KeyCode::F(5));
        assert_eq!(app.storefront.route(), &Route::Login);
        assert!(!app.storefront.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let (mut app, _rx) = app_with(MemoryStore::new());
        press(&mut app, KeyCode::Char('c'));
        assert!(!app.should_quit);
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }
}
