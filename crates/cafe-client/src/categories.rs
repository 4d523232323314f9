//! # Category Lookup
//!
//! Categories are reference data: fetched on demand for pickers, never
//! cached by a container.

use std::sync::Arc;
use tracing::debug;

use crate::api::CafeApi;
use crate::error::ClientResult;
use cafe_core::Category;

#[derive(Debug, Clone)]
pub struct CategoryService {
    api: Arc<CafeApi>,
}

impl CategoryService {
    pub fn new(api: Arc<CafeApi>) -> Self {
        CategoryService { api }
    }

    /// `GET /categorias`.
    pub async fn load_categories(&self) -> ClientResult<Vec<Category>> {
        let response = self.api.categories().await?;
        debug!(count = response.categories.len(), "Categories loaded");
        Ok(response.categories)
    }
}
