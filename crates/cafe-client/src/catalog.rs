//! # Catalog Manager
//!
//! Owns the in-memory product list and keeps it in step with the backend
//! after each remote write.
//!
//! ## Reconciliation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Remote write, then local fix-up                     │
//! │                                                                         │
//! │  load_products ──► GET  /productos?limite=N ──► replace whole list     │
//! │  add_product   ──► POST /productos          ──► append returned record │
//! │  update_product──► PUT  /productos/:id      ──► replace entry by id    │
//! │  upload_image  ──► PUT  /uploads/productos/:id ─► replace entry if the │
//! │                                                   body is a product    │
//! │  load_product_by_id ► GET /productos/:id    ──► (list untouched)       │
//! │  delete_product ──► (no call)               ──► Unsupported            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each fix-up is applied to the list as it is when the response arrives,
//! so two overlapping writes never overwrite each other's result.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::CafeApi;
use crate::error::{ClientError, ClientResult};
use cafe_core::validation::validate_id;
use cafe_core::{Catalog, CategoryGroup, ImageAsset, Product, ProductInput};

/// What an image upload produced.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The backend answered with the updated product; the list now holds it.
    Updated(Product),
    /// The backend accepted the file but answered with something else.
    Accepted(serde_json::Value),
}

impl UploadOutcome {
    pub fn product(&self) -> Option<&Product> {
        match self {
            UploadOutcome::Updated(product) => Some(product),
            UploadOutcome::Accepted(_) => None,
        }
    }
}

/// Product list container.
pub struct CatalogManager {
    api: Arc<CafeApi>,
    state: watch::Sender<Catalog>,
    products_limit: u32,
}

impl CatalogManager {
    /// Creates the manager with an empty list.
    pub fn new(api: Arc<CafeApi>, products_limit: u32) -> Self {
        let (state, _) = watch::channel(Catalog::new());

        CatalogManager {
            api,
            state,
            products_limit,
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Current product list.
    pub fn products(&self) -> Vec<Product> {
        self.state.borrow().products().to_vec()
    }

    pub fn catalog(&self) -> Catalog {
        self.state.borrow().clone()
    }

    /// Receiver notified after every list change.
    pub fn subscribe(&self) -> watch::Receiver<Catalog> {
        self.state.subscribe()
    }

    /// Current list grouped by category name.
    pub fn grouped_by_category(&self) -> Vec<CategoryGroup> {
        self.state.borrow().grouped_by_category()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Fetches the first page of products and replaces the list with it.
    pub async fn load_products(&self) -> ClientResult<Vec<Product>> {
        let response = self.api.products(self.products_limit).await?;
        let products = response.products;

        info!(
            count = products.len(),
            total = ?response.total,
            "Products loaded"
        );

        let at = Utc::now();
        self.state
            .send_modify(|catalog| catalog.replace_all(products.clone(), at));

        Ok(products)
    }

    /// Creates a product and appends it to the list.
    pub async fn add_product(&self, category_id: &str, name: &str) -> ClientResult<Product> {
        validate_id("categoria", category_id)?;

        let created = self
            .api
            .create_product(&ProductInput::new(category_id, name))
            .await?;

        info!(product_id = %created.id, name = %created.name, "Product created");
        self.state.send_modify(|catalog| catalog.append(created.clone()));

        Ok(created)
    }

    /// Renames / recategorizes a product and replaces its list entry in place.
    ///
    /// An id that is not in the list leaves the list unchanged.
    pub async fn update_product(
        &self,
        category_id: &str,
        name: &str,
        product_id: &str,
    ) -> ClientResult<Product> {
        validate_id("categoria", category_id)?;
        validate_id("id", product_id)?;

        let updated = self
            .api
            .update_product(product_id, &ProductInput::new(category_id, name))
            .await?;

        info!(product_id = %product_id, name = %updated.name, "Product updated");
        self.replace_entry(product_id, &updated);

        Ok(updated)
    }

    /// Deleting products is not offered by this client.
    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        warn!(product_id = %id, "Delete requested but not supported");
        Err(ClientError::Unsupported("delete product".to_string()))
    }

    /// Fetches one product without touching the list.
    pub async fn load_product_by_id(&self, id: &str) -> ClientResult<Product> {
        validate_id("id", id)?;
        self.api.product(id).await
    }

    /// Uploads a product photo.
    pub async fn upload_image(
        &self,
        asset: &ImageAsset,
        product_id: &str,
    ) -> ClientResult<UploadOutcome> {
        validate_id("id", product_id)?;

        let body = self.api.upload_product_image(product_id, asset).await?;

        match serde_json::from_value::<Product>(body.clone()) {
            Ok(product) => {
                info!(product_id = %product_id, image = ?product.image, "Product image uploaded");
                self.replace_entry(product_id, &product);
                Ok(UploadOutcome::Updated(product))
            }
            Err(_) => {
                info!(product_id = %product_id, "Product image uploaded");
                Ok(UploadOutcome::Accepted(body))
            }
        }
    }

    fn replace_entry(&self, product_id: &str, product: &Product) {
        let replaced = self
            .state
            .send_if_modified(|catalog| catalog.replace(product_id, product.clone()));

        if !replaced {
            debug!(product_id = %product_id, "Product not in local list; list unchanged");
        }
    }
}

impl std::fmt::Debug for CatalogManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogManager")
            .field("products", &self.state.borrow().len())
            .field("products_limit", &self.products_limit)
            .finish_non_exhaustive()
    }
}
