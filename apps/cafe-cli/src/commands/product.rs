//! # Product Commands
//!
//! Product list, detail, the save form, and photo upload.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Form Save                                    │
//! │                                                                         │
//! │  ProductForm { id?, name, category_id?, image? }                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  Has id?                                  │                         │
//! │  │  YES: update_product(category, name, id)  │──► entry replaced       │
//! │  │  NO:  add_product(category, name)         │──► form adopts new id   │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       │  category missing? ──► first category from GET /categorias     │
//! │       ▼                                                                 │
//! │  Image attached? (only once the form has an id)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  upload_image(asset, id) ──► entry refreshed if body is a product      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::ApiError;
use cafe_client::{CatalogManager, CategoryService, UploadOutcome};
use cafe_core::validation::validate_product_name;
use cafe_core::{CategoryGroup, CoreError, ImageAsset, Product};

/// Product DTO for output.
///
/// Flattens the embedded category so list output stays one level deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub category_name: String,
    pub image: Option<String>,
    pub available: Option<bool>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            id: p.id,
            name: p.name,
            category_id: p.category.id,
            category_name: p.category.name,
            image: p.image,
            available: p.available,
        }
    }
}

/// One section of the grouped product list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroupDto {
    pub category_id: String,
    pub category_name: String,
    pub products: Vec<ProductDto>,
}

impl From<CategoryGroup> for ProductGroupDto {
    fn from(g: CategoryGroup) -> Self {
        ProductGroupDto {
            category_id: g.category_id,
            category_name: g.category_name,
            products: g.products.into_iter().map(ProductDto::from).collect(),
        }
    }
}

// =============================================================================
// Product Form
// =============================================================================

/// The product edit screen's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    /// Set once the product exists on the backend.
    pub id: Option<String>,
    pub name: String,
    pub category_id: Option<String>,
    /// Current image URL (display only).
    pub image: Option<String>,
}

impl ProductForm {
    /// Empty form for a new product.
    pub fn new(name: impl Into<String>) -> Self {
        ProductForm {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Form pre-filled from an existing product.
    pub fn from_product(product: &Product) -> Self {
        ProductForm {
            id: Some(product.id.clone()),
            name: product.name.clone(),
            category_id: Some(product.category.id.clone()),
            image: product.image.clone(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Fetches a product and fills the form with it.
    pub async fn load(catalog: &CatalogManager, id: &str) -> Result<Self, ApiError> {
        let product = catalog.load_product_by_id(id).await?;
        Ok(Self::from_product(&product))
    }

    /// Creates or updates the product behind this form.
    ///
    /// Without a category the first category from the backend is used.
    /// After a create the form holds the new id.
    pub async fn save(
        &mut self,
        catalog: &CatalogManager,
        categories: &CategoryService,
    ) -> Result<Product, ApiError> {
        validate_product_name(&self.name)?;

        let category_id = match &self.category_id {
            Some(id) => id.clone(),
            None => first_category_id(categories).await?,
        };

        let saved = match &self.id {
            Some(id) => catalog.update_product(&category_id, &self.name, id).await?,
            None => {
                let created = catalog.add_product(&category_id, &self.name).await?;
                info!(product_id = %created.id, "Form adopted new product id");
                created
            }
        };

        self.id = Some(saved.id.clone());
        self.category_id = Some(saved.category.id.clone());
        self.image = saved.image.clone();

        Ok(saved)
    }

    /// Uploads a photo for the saved product.
    pub async fn attach_image(
        &mut self,
        catalog: &CatalogManager,
        asset: &ImageAsset,
    ) -> Result<UploadOutcome, ApiError> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| ApiError::from(CoreError::ProductNotSaved))?;

        let outcome = catalog.upload_image(asset, id).await?;

        if let Some(product) = outcome.product() {
            self.image = product.image.clone();
        }

        Ok(outcome)
    }
}

async fn first_category_id(categories: &CategoryService) -> Result<String, ApiError> {
    let all = categories.load_categories().await?;
    let first = all.into_iter().next().ok_or(CoreError::NoCategories)?;
    debug!(category_id = %first.id, "Defaulting to first category");
    Ok(first.id)
}

// =============================================================================
// Commands
// =============================================================================

/// Loads the first page of products.
pub async fn list_products(catalog: &CatalogManager) -> Result<Vec<ProductDto>, ApiError> {
    let products = catalog.load_products().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Loads the first page of products, sectioned by category.
pub async fn list_products_grouped(
    catalog: &CatalogManager,
) -> Result<Vec<ProductGroupDto>, ApiError> {
    catalog.load_products().await?;
    Ok(catalog
        .grouped_by_category()
        .into_iter()
        .map(ProductGroupDto::from)
        .collect())
}

pub async fn get_product(catalog: &CatalogManager, id: &str) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "get_product command");
    let product = catalog.load_product_by_id(id).await?;
    Ok(ProductDto::from(product))
}

/// Image to attach while saving.
#[derive(Debug, Clone)]
pub struct ImageArg {
    pub path: PathBuf,
    pub mime_type: Option<String>,
}

impl ImageArg {
    fn to_asset(&self) -> ImageAsset {
        let asset = ImageAsset::from_path(&self.path);
        match &self.mime_type {
            Some(mime) => asset.with_mime_type(mime),
            None => asset,
        }
    }
}

/// Saves the form, then uploads the image if one was given.
///
/// The product list is loaded first so the saved entry lands in it.
pub async fn save_product(
    catalog: &CatalogManager,
    categories: &CategoryService,
    mut form: ProductForm,
    image: Option<ImageArg>,
) -> Result<ProductDto, ApiError> {
    debug!(id = ?form.id, name = %form.name, "save_product command");

    catalog.load_products().await?;
    let mut saved = form.save(catalog, categories).await?;

    if let Some(image) = image {
        let outcome = form.attach_image(catalog, &image.to_asset()).await?;
        if let UploadOutcome::Updated(product) = outcome {
            saved = product;
        }
    }

    Ok(ProductDto::from(saved))
}

/// Uploads a photo for an existing product.
pub async fn upload_product_image(
    catalog: &CatalogManager,
    id: &str,
    image: ImageArg,
) -> Result<serde_json::Value, ApiError> {
    let mut form = ProductForm::load(catalog, id).await?;

    match form.attach_image(catalog, &image.to_asset()).await? {
        UploadOutcome::Updated(product) => serde_json::to_value(ProductDto::from(product))
            .map_err(|e| ApiError::internal(e.to_string())),
        UploadOutcome::Accepted(body) => Ok(body),
    }
}

pub async fn delete_product(catalog: &CatalogManager, id: &str) -> Result<(), ApiError> {
    catalog.delete_product(id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use cafe_client::{CafeApi, ClientConfig};
    use cafe_store::MemoryTokenStore;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn managers_for(server: &MockServer) -> (CatalogManager, CategoryService) {
        let config = ClientConfig::with_base_url(format!("{}/api", server.uri()));
        let tokens = Arc::new(MemoryTokenStore::with_token("jwt"));
        let api = Arc::new(CafeApi::new(&config.api, tokens).unwrap());
        (
            CatalogManager::new(api.clone(), config.api.products_limit),
            CategoryService::new(api),
        )
    }

    fn product_json(id: &str, name: &str, category: (&str, &str)) -> Value {
        json!({
            "_id": id,
            "nombre": name,
            "categoria": { "_id": category.0, "nombre": category.1 }
        })
    }

    async fn mount_empty_list(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/productos"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "productos": [] })),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn test_product_dto_flattens_category() {
        let product: Product =
            serde_json::from_value(product_json("p1", "Latte", ("cat1", "Coffee"))).unwrap();
        let dto = ProductDto::from(product);

        assert_eq!(dto.category_id, "cat1");
        assert_eq!(dto.category_name, "Coffee");
        assert_eq!(dto.image, None);
    }

    #[test]
    fn test_form_from_product() {
        let mut value = product_json("p1", "Latte", ("cat1", "Coffee"));
        value["img"] = json!("https://img/p1.jpg");
        let product: Product = serde_json::from_value(value).unwrap();

        let form = ProductForm::from_product(&product);

        assert_eq!(form.id.as_deref(), Some("p1"));
        assert_eq!(form.name, "Latte");
        assert_eq!(form.category_id.as_deref(), Some("cat1"));
        assert_eq!(form.image.as_deref(), Some("https://img/p1.jpg"));
    }

    #[tokio::test]
    async fn test_save_new_product_defaults_to_first_category_and_adopts_id() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/categorias"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 2,
                "categorias": [
                    { "_id": "cat1", "nombre": "Coffee" },
                    { "_id": "cat2", "nombre": "Tea" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/productos"))
            .and(body_json(json!({ "nombre": "Latte", "categoria": "cat1" })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(product_json("p9", "Latte", ("cat1", "Coffee"))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (catalog, categories) = managers_for(&server);
        let mut form = ProductForm::new("Latte");

        let saved = form.save(&catalog, &categories).await.unwrap();

        assert_eq!(saved.id, "p9");
        assert_eq!(form.id.as_deref(), Some("p9"));
        assert_eq!(form.category_id.as_deref(), Some("cat1"));
        assert_eq!(catalog.products().len(), 1);
    }

    #[tokio::test]
    async fn test_save_existing_product_updates_in_place() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/productos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 2,
                "productos": [
                    product_json("p1", "Latte", ("cat1", "Coffee")),
                    product_json("p2", "Mocha", ("cat1", "Coffee"))
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/productos/p1"))
            .and(body_json(json!({ "nombre": "Oat Latte", "categoria": "cat1" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(product_json("p1", "Oat Latte", ("cat1", "Coffee"))),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/categorias"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (catalog, categories) = managers_for(&server);
        let form = ProductForm::new("Oat Latte").with_id("p1").with_category("cat1");

        let dto = save_product(&catalog, &categories, form, None).await.unwrap();

        assert_eq!(dto.name, "Oat Latte");
        let names: Vec<String> = catalog.products().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Oat Latte", "Mocha"]);
    }

    #[tokio::test]
    async fn test_save_without_categories_fails() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/categorias"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "categorias": [] })),
            )
            .mount(&server)
            .await;

        let (catalog, categories) = managers_for(&server);
        let mut form = ProductForm::new("Latte");

        let err = form.save(&catalog, &categories).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(form.id.is_none());
    }

    #[tokio::test]
    async fn test_save_rejects_blank_name() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        let (catalog, categories) = managers_for(&server);
        let mut form = ProductForm::new("   ").with_category("cat1");

        let err = form.save(&catalog, &categories).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_attach_image_requires_saved_product() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        let (catalog, _) = managers_for(&server);
        let mut form = ProductForm::new("Latte");

        let err = form
            .attach_image(&catalog, &ImageAsset::from_path("photo.jpg"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, CoreError::ProductNotSaved.to_string());
    }

    #[tokio::test]
    async fn test_save_with_image_uploads_after_create() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        mount_empty_list(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/productos"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(product_json("p9", "Latte", ("cat1", "Coffee"))),
            )
            .mount(&server)
            .await;

        let mut uploaded = product_json("p9", "Latte", ("cat1", "Coffee"));
        uploaded["img"] = json!("https://img/p9.jpg");
        Mock::given(method("PUT"))
            .and(path("/api/uploads/productos/p9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(uploaded))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("latte.jpg");
        std::fs::write(&photo, b"fake jpeg").unwrap();

        let (catalog, categories) = managers_for(&server);
        let image = ImageArg {
            path: photo,
            mime_type: None,
        };

        let dto = save_product(
            &catalog,
            &categories,
            ProductForm::new("Latte").with_category("cat1"),
            Some(image),
        )
        .await
        .unwrap();

        assert_eq!(dto.id, "p9");
        assert_eq!(dto.image.as_deref(), Some("https://img/p9.jpg"));
        assert_eq!(
            catalog.products()[0].image.as_deref(),
            Some("https://img/p9.jpg")
        );
    }

    #[tokio::test]
    async fn test_delete_is_unsupported() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        let (catalog, _) = managers_for(&server);

        let err = delete_product(&catalog, "p1").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Unsupported);
    }
}
