//! # cafe-core: Pure Domain Logic for the Café Catalog Client
//!
//! This crate holds everything about the catalog client that can be expressed
//! without touching the network or the disk.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Café Catalog Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (cafe-cli)                   │   │
//! │  │    Login ──► Products list ──► Product form ──► Photo upload    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        cafe-client (SessionManager, CatalogManager)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cafe-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  session  │  │  catalog  │  │ validation│  │   │
//! │  │   │  Product  │  │  reduce() │  │  Catalog  │  │   rules   │  │   │
//! │  │   │   User    │  │  actions  │  │  groups   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire/domain types (Product, Category, User, requests, responses)
//! - [`session`] - Session state and its pure transition function
//! - [`catalog`] - In-memory product list with id-based reconciliation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for forms
//!
//! ## Example Usage
//!
//! ```rust
//! use cafe_core::session::{reduce, SessionAction, SessionState};
//! use cafe_core::AuthStatus;
//!
//! let state = SessionState::default();
//! assert_eq!(state.status, AuthStatus::Checking);
//!
//! let state = reduce(&state, SessionAction::AddError("Invalid credentials".into()));
//! assert_eq!(state.status, AuthStatus::NotAuthenticated);
//! assert_eq!(state.error_message, "Invalid credentials");
//!
//! let state = reduce(&state, SessionAction::RemoveError);
//! assert!(state.error_message.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, CategoryGroup};
pub use error::{CoreError, CoreResult, ValidationError};
pub use session::{reduce, AuthStatus, SessionAction, SessionState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of products requested per catalog load (`/productos?limite=50`).
pub const PRODUCTS_PAGE_LIMIT: u32 = 50;

/// Key under which the session token is persisted.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Message shown when the backend rejects a sign-in/sign-up without
/// providing its own message.
pub const DEFAULT_AUTH_ERROR: &str = "Información incorrecta";
