//! # Café CLI Library
//!
//! Presentation layer for the café catalog client. Each invocation builds
//! the client containers, resolves the stored session, runs one command and
//! prints its result as JSON.
//!
//! ## Module Organization
//! ```text
//! cafe_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState (composition root)
//! │   └── db.rs       ◄─── Token store database wrapper
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── auth.rs     ◄─── login, register, logout, status
//! │   ├── product.rs  ◄─── product list/detail, ProductForm, image upload
//! │   └── categories.rs
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cafe_client::ClientConfig;
use cafe_core::{LoginData, RegisterData};

use cli::{Cli, Command, ConfigCommand, ProductCommand};
use commands::{ImageArg, ProductForm};
use error::ApiError;
use state::AppState;

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       CLI Startup                                       │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → client.toml → CAFE_* env → --api-url                   │
/// │                                                                         │
/// │  3. Open Token Store ─────────────────────────────────────────────────► │
/// │     • Linux: ~/.local/share/catalog/cafe.db (or CAFE_DB_PATH)           │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │                                                                         │
/// │  4. Build Containers ─────────────────────────────────────────────────► │
/// │     • SessionManager starts in Checking                                 │
/// │     • CatalogManager starts with an empty list                          │
/// │                                                                         │
/// │  5. Resolve Session ──────────────────────────────────────────────────► │
/// │     • check_token: Checking → Authenticated | NotAuthenticated         │
/// │                                                                         │
/// │  6. Run Command & Print ──────────────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    debug!(command = ?cli.command, "Parsed command line");

    let config = load_config(&cli)?;

    if cli.command.is_offline() {
        return run_config_command(&cli, &config);
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let output = runtime.block_on(run_command(cli.command, config))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cafe_client=trace` - Show trace for the client crate only
/// - Default: INFO, DEBUG for cafe crates
///
/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    subscriber(filter).init();
}

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,cafe=debug,sqlx=warn";

/// fmt subscriber on stderr, gated only by `filter`.
fn subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

/// Loads the layered config and applies `--api-url`.
fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::load(cli.config.clone()).context("failed to load config")?;

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
        config.validate().context("invalid --api-url")?;
    }

    Ok(config)
}

fn run_config_command(cli: &Cli, config: &ClientConfig) -> anyhow::Result<()> {
    let Command::Config { command } = &cli.command else {
        anyhow::bail!("not a config command");
    };

    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigCommand::Init => {
            config.save(cli.config.clone()).context("failed to save config")?;
            let path = cli.config.clone().or_else(ClientConfig::default_config_path);
            info!(?path, "Config written");
        }
    }
    Ok(())
}

/// Builds the state, resolves the session, runs `command`, then closes the
/// token store whatever the outcome.
pub async fn run_command(command: Command, config: ClientConfig) -> Result<Value, ApiError> {
    let state = AppState::init(config).await?;
    state.resolve_session().await?;

    let result = execute(command, &state).await;
    state.shutdown().await;

    result
}

/// Dispatches one command against an initialized state.
pub async fn execute(command: Command, state: &AppState) -> Result<Value, ApiError> {
    if command.requires_auth() {
        state.require_auth()?;
    }

    match command {
        Command::Login { email, password } => {
            to_json(commands::login(&state.session, LoginData::new(email, password)).await?)
        }
        Command::Register {
            email,
            password,
            name,
        } => to_json(
            commands::register(&state.session, RegisterData::new(email, password, name)).await?,
        ),
        Command::Logout => {
            commands::logout(&state.session).await?;
            to_json(commands::session_status(&state.session))
        }
        Command::Status => to_json(commands::session_status(&state.session)),
        Command::Products { grouped: false } => {
            to_json(commands::list_products(&state.catalog).await?)
        }
        Command::Products { grouped: true } => {
            to_json(commands::list_products_grouped(&state.catalog).await?)
        }
        Command::Product { command } => execute_product(command, state).await,
        Command::Categories => to_json(commands::list_categories(&state.categories).await?),
        Command::Config { .. } => Err(ApiError::internal("config commands run without state")),
    }
}

async fn execute_product(command: ProductCommand, state: &AppState) -> Result<Value, ApiError> {
    match command {
        ProductCommand::Show { id } => to_json(commands::get_product(&state.catalog, &id).await?),
        ProductCommand::Save {
            id,
            name,
            category,
            image,
            mime,
        } => {
            let mut form = ProductForm::new(name);
            form.id = id;
            form.category_id = category;
            let image = image.map(|path| ImageArg {
                path,
                mime_type: mime,
            });

            to_json(commands::save_product(&state.catalog, &state.categories, form, image).await?)
        }
        ProductCommand::UploadImage { id, path, mime } => {
            let image = ImageArg {
                path,
                mime_type: mime,
            };
            commands::upload_product_image(&state.catalog, &id, image).await
        }
        ProductCommand::Delete { id } => {
            commands::delete_product(&state.catalog, &id).await?;
            Ok(Value::Null)
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}
