//! # cafe-client: REST Client and State Containers
//!
//! Talks to the catalog backend and owns the two pieces of mutable client
//! state: the session and the product list.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  Presentation (cafe-cli)                                               │
//! │     │ snapshot() / subscribe()          ▲ watch::Receiver              │
//! │     ▼                                   │                               │
//! │  ┌────────────────────┐   ┌─────────────┴────────┐  ┌───────────────┐ │
//! │  │  SessionManager    │   │   CatalogManager     │  │CategoryService│ │
//! │  │  reduce(state, a)  │   │   Catalog (list)     │  │  read-through │ │
//! │  └──────┬──────┬──────┘   └──────────┬───────────┘  └──────┬────────┘ │
//! │         │      │                     │                     │          │
//! │         │      ▼                     ▼                     ▼          │
//! │         │   ┌──────────────────────────────────────────────────────┐  │
//! │         │   │                 CafeApi (reqwest)                    │  │
//! │         │   │        x-token header ◄── TokenStore                 │  │
//! │         │   └──────────────────────────────────────────────────────┘  │
//! │         ▼                                                              │
//! │   TokenStore (cafe-store)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use cafe_client::{CafeApi, CatalogManager, ClientConfig, SessionManager};
//! use cafe_store::MemoryTokenStore;
//!
//! let config = ClientConfig::load(None)?;
//! let tokens = Arc::new(MemoryTokenStore::new());
//! let api = Arc::new(CafeApi::new(&config.api, tokens.clone())?);
//!
//! let session = SessionManager::new(api.clone(), tokens, &config.session);
//! session.check_token().await?;
//!
//! let catalog = CatalogManager::new(api, config.api.products_limit);
//! catalog.load_products().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod error;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::CafeApi;
pub use catalog::{CatalogManager, UploadOutcome};
pub use categories::CategoryService;
pub use config::{ApiSettings, ClientConfig, SessionSettings, StorageSettings};
pub use error::{ClientError, ClientResult};
pub use session::SessionManager;
