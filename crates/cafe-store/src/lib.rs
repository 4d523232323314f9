//! # cafe-store: Local Persistence for the Café Catalog Client
//!
//! The client keeps exactly one durable thing on the device: the session
//! token. This crate stores it in SQLite with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Token Data Flow                                  │
//! │                                                                         │
//! │  SessionManager (cafe-client)                                          │
//! │       │  Arc<dyn TokenStore>                                           │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   cafe-store (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│   (kv.rs)     │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼────────┐                      │   │
//! │  │                        │  TokenStore    │                      │   │
//! │  │                        │  (token.rs)    │                      │   │
//! │  │                        └────────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file under the platform data dir (cafe.db)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cafe_store::{Database, DbConfig, SqliteTokenStore, TokenStore};
//!
//! let db = Database::new(DbConfig::new("cafe.db")).await?;
//! let tokens = SqliteTokenStore::new(db.key_values());
//! tokens.set_token("eyJhbGci...").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod token;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KeyValueRepository;
pub use token::{MemoryTokenStore, SqliteTokenStore, TokenStore};
