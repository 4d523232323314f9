//! # Commands Module
//!
//! Everything the CLI can do, one function per user action.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── auth.rs        ◄─── login, register, logout, status
//! ├── product.rs     ◄─── product list, detail, save form, image upload
//! └── categories.rs  ◄─── category picker data
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  $ cafe product save --name Latte --category cat1                       │
//! │         │                                                               │
//! │         │ (clap parses into Command::Product)                           │
//! │         ▼                                                               │
//! │  lib.rs::execute                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn save_product(                                                 │
//! │      catalog: &CatalogManager,    ◄── only the containers it needs     │
//! │      categories: &CategoryService,                                      │
//! │      form: ProductForm,                                                 │
//! │  ) -> Result<ProductDto, ApiError>                                      │
//! │         │                                                               │
//! │         │ (JSON or plain text)                                          │
//! │         ▼                                                               │
//! │  stdout                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod categories;
pub mod product;

pub use auth::*;
pub use categories::*;
pub use product::*;
