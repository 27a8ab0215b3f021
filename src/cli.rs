// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the terminal UI starts. Subcommands:
// - config --show/--path/--reset: configuration management
// - login/register/logout/whoami: session management against the backend
// - products/product: catalog queries
//
// Session and catalog commands drive the same Storefront the TUI does and
// print the notification it is left showing.

use crate::app::{LoginTab, LoginView, Settlement, Storefront};
use crate::catalog::{self, FilterCriteria, ProductLookup, ALL_CATEGORIES};
use crate::config::{Config, VERSION};
use crate::router::{self, View};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;

/// Storefront - terminal client for the shop
#[derive(Parser)]
#[command(name = "storefront")]
#[command(version = VERSION)]
#[command(about = "Terminal storefront with login, registration and product catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Sign in and keep the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirmation: String,
    },

    /// Drop the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// List products, optionally narrowed
    Products {
        /// Case-insensitive match on name or description
        #[arg(long, default_value = "")]
        search: String,

        /// Exact category ("Semua" for all)
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
    },

    /// Show one product
    Product {
        /// Product id; omitted means "no id in the route"
        id: Option<String>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Config commands
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_config(show: bool, reset: bool, path: bool) -> Result<()> {
    if path {
        let path = Config::config_path().context("Could not determine config path")?;
        println!("{}", path.display());
    } else if show {
        handle_config_show();
    } else if reset {
        handle_config_reset()?;
    } else {
        println!("Usage: storefront config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
    Ok(())
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Storefront commands
// ─────────────────────────────────────────────────────────────────────────────

/// Run a session or catalog command against `app`, writing to `out`
pub async fn run_command(command: Commands, app: &mut Storefront, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Config { .. } => bail!("config commands do not use the storefront"),

        Commands::Login { email, password } => {
            let Some(view) = open_login(app, LoginTab::Login, out)? else {
                return Ok(());
            };
            view.login.email = email;
            view.login.password = password;
            report_settlement(app, out).await?;
        }

        Commands::Register {
            name,
            email,
            password,
            password_confirmation,
        } => {
            let Some(view) = open_login(app, LoginTab::Register, out)? else {
                return Ok(());
            };
            view.register.name = name;
            view.register.email = email;
            view.register.password = password;
            view.register.password_confirmation = password_confirmation;
            report_settlement(app, out).await?;
        }

        Commands::Logout => {
            if app.session().is_authenticated() {
                app.logout();
            } else {
                writeln!(out, "Not signed in.")?;
            }
        }

        Commands::Whoami => {
            let session = app.session();
            if !session.is_authenticated() {
                writeln!(out, "Not signed in.")?;
            } else {
                match session.user().and_then(|user| user.email()) {
                    Some(email) => writeln!(out, "{} <{}>", session.display_name(), email)?,
                    None => writeln!(out, "{}", session.display_name())?,
                }
            }
        }

        Commands::Products { search, category } => {
            let criteria = FilterCriteria::new(search, category);
            let products = catalog::filter(app.catalog().products(), &criteria);
            if products.is_empty() {
                writeln!(out, "{}", catalog::EMPTY_RESULT)?;
            }
            for product in products {
                writeln!(
                    out,
                    "{:>3}  {:<28} {:<14} {}",
                    product.id, product.name, product.category, product.price
                )?;
            }
        }

        Commands::Product { id } => {
            let path = match id {
                Some(id) => format!("/product/{}", id),
                None => "/product".to_string(),
            };
            app.navigate(&path);
            match app.product_lookup() {
                Some(ProductLookup::Found(product)) => {
                    writeln!(out, "{} ({})", product.name, product.category)?;
                    writeln!(out, "{}", product.price)?;
                    writeln!(out)?;
                    writeln!(out, "{}", product.description)?;
                    for item in product.detail_items() {
                        writeln!(out, "  - {}", item)?;
                    }
                }
                Some(ProductLookup::MissingId) => writeln!(out, "{}", catalog::MISSING_ID)?,
                Some(ProductLookup::NotFound { .. }) => {
                    writeln!(out, "{}", catalog::UNKNOWN_PRODUCT)?
                }
                None => {}
            }
        }
    }

    print_notification(app, out)?;
    Ok(())
}

/// Navigate to the login view with `tab` active; `None` if already signed in
fn open_login<'a>(
    app: &'a mut Storefront,
    tab: LoginTab,
    out: &mut impl Write,
) -> Result<Option<&'a mut LoginView>> {
    app.navigate(router::LOGIN_PATH);
    if app.view() != View::Login {
        writeln!(
            out,
            "Already signed in as {}. Run `storefront logout` first.",
            app.session().display_name()
        )?;
        return Ok(None);
    }

    Ok(app.login_view_mut().map(|view| {
        view.switch_to(tab);
        view
    }))
}

async fn report_settlement(app: &mut Storefront, out: &mut impl Write) -> Result<()> {
    // Local validation failures are already posted as notifications
    if let Ok(settlement) = app.submit().await {
        tracing::debug!("Headless submission settled: {:?}", settlement);
        if settlement == Settlement::SignedIn {
            writeln!(out, "Signed in as {}.", app.session().display_name())?;
        }
    }
    Ok(())
}

fn print_notification(app: &Storefront, out: &mut impl Write) -> Result<()> {
    if let Some(notification) = app.notification() {
        writeln!(
            out,
            "[{}] {}",
            notification.severity.as_str(),
            notification.message
        )?;
    }
    Ok(())
}
