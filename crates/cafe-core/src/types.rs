//! # Domain Types
//!
//! Types exchanged with the catalog REST backend and handed to the UI.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Category     │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id   (_id)     │──►│  id   (_id)     │   │  id   (uid)     │       │
//! │  │  name (nombre)  │   │  name (nombre)  │   │  name (nombre)  │       │
//! │  │  category       │   │  created_by?    │   │  email (correo) │       │
//! │  │  image (img)?   │   └─────────────────┘   │  role (rol)     │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  Requests: LoginData, RegisterData, ProductInput                       │
//! │  Responses: LoginResponse, ProductsResponse, CategoriesResponse        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! The backend speaks Spanish field names (`nombre`, `correo`, `categoria`).
//! Rust fields use English names and serde renames keep the wire format.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use ts_rs::TS;

// =============================================================================
// Users
// =============================================================================

/// The authenticated user's profile (`usuario` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    /// Backend identifier.
    #[serde(rename = "uid")]
    pub id: String,

    /// Display name.
    #[serde(rename = "nombre")]
    pub name: String,

    /// Login identifier.
    #[serde(rename = "correo")]
    pub email: String,

    /// Role string as issued by the backend (e.g. `USER_ROLE`).
    #[serde(rename = "rol")]
    pub role: String,

    /// Account enabled flag.
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Whether the account was created through Google sign-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<bool>,

    /// Avatar URL.
    #[serde(rename = "img", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl User {
    /// Returns true when the backend granted the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == "ADMIN_ROLE"
    }
}

/// Short reference to the user that created a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserRef {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "nombre")]
    pub name: String,
}

// =============================================================================
// Categories
// =============================================================================

/// A product category.
///
/// Also used for the category embedded in every [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
}

// =============================================================================
// Products
// =============================================================================

/// A catalog product (`producto` on the wire).
///
/// Identity is [`Product::id`]; every other field may change on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "categoria")]
    pub category: Category,

    /// Image URL, absent until a photo has been uploaded.
    #[serde(rename = "img", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(rename = "precio", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(rename = "disponible", default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,

    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
}

impl Product {
    /// Returns the id of the category this product belongs to.
    #[inline]
    pub fn category_id(&self) -> &str {
        &self.category.id
    }

    /// Returns true once an image has been attached.
    #[inline]
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|img| !img.is_empty())
    }
}

/// Body of `POST /productos` and `PUT /productos/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(rename = "nombre")]
    pub name: String,

    /// Category id.
    #[serde(rename = "categoria")]
    pub category_id: String,
}

impl ProductInput {
    pub fn new(category_id: impl Into<String>, name: impl Into<String>) -> Self {
        ProductInput {
            name: name.into(),
            category_id: category_id.into(),
        }
    }
}

// =============================================================================
// Auth Requests / Responses
// =============================================================================

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(rename = "correo")]
    pub email: String,
    pub password: String,
}

impl LoginData {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        LoginData {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration form for `POST /usuarios`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterData {
    #[serde(rename = "correo")]
    pub email: String,
    pub password: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

impl RegisterData {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        RegisterData {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}

/// Successful response of every auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: User,
}

// =============================================================================
// Listing Responses
// =============================================================================

/// Response of `GET /productos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(rename = "productos")]
    pub products: Vec<Product>,
}

/// Response of `GET /categorias`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(rename = "categorias")]
    pub categories: Vec<Category>,
}

// =============================================================================
// Image Assets
// =============================================================================

/// A local image picked for upload (camera or gallery result).
///
/// Only the path is required; file name and MIME type fall back to values
/// derived from the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
}

impl ImageAsset {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        ImageAsset {
            path: path.into(),
            mime_type: None,
            file_name: None,
        }
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// File name sent in the multipart part.
    pub fn upload_name(&self) -> String {
        self.file_name
            .clone()
            .or_else(|| {
                self.path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "image".to_string())
    }

    /// MIME type sent in the multipart part.
    pub fn upload_mime(&self) -> &str {
        match self.mime_type.as_deref() {
            Some(mime) if !mime.trim().is_empty() => mime,
            _ => mime_from_extension(&self.path),
        }
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_minimal_backend_record() {
        let json = r#"{"_id":"p9","nombre":"Latte","categoria":{"_id":"cat1","nombre":"Coffee"}}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, "p9");
        assert_eq!(product.name, "Latte");
        assert_eq!(product.category_id(), "cat1");
        assert_eq!(product.category.name, "Coffee");
        assert!(!product.has_image());
        assert_eq!(product.price, None);
    }

    #[test]
    fn test_product_full_record() {
        let json = r#"{
            "precio": 3.5,
            "_id": "p1",
            "nombre": "Espresso",
            "categoria": {"_id": "c1", "nombre": "Coffee"},
            "usuario": {"_id": "u1", "nombre": "Test"},
            "img": "https://cdn.example.com/p1.jpg",
            "disponible": true
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert!(product.has_image());
        assert_eq!(product.price, Some(3.5));
        assert_eq!(product.available, Some(true));
        assert_eq!(product.created_by.unwrap().name, "Test");
    }

    #[test]
    fn test_login_response_user_fields() {
        let json = r#"{
            "token": "abc",
            "usuario": {"rol": "ADMIN_ROLE", "estado": true, "google": false,
                        "nombre": "Ana", "correo": "a@b.com", "uid": "u1"}
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();

        assert_eq!(resp.token, "abc");
        assert_eq!(resp.user.id, "u1");
        assert_eq!(resp.user.email, "a@b.com");
        assert!(resp.user.is_admin());
        assert_eq!(resp.user.active, Some(true));
    }

    #[test]
    fn test_request_bodies_use_wire_names() {
        let body = serde_json::to_value(LoginData::new("a@b.com", "secret")).unwrap();
        assert_eq!(body["correo"], "a@b.com");
        assert_eq!(body["password"], "secret");

        let body = serde_json::to_value(RegisterData::new("a@b.com", "secret", "Ana")).unwrap();
        assert_eq!(body["nombre"], "Ana");

        let body = serde_json::to_value(ProductInput::new("cat1", "Latte")).unwrap();
        assert_eq!(body["nombre"], "Latte");
        assert_eq!(body["categoria"], "cat1");
    }

    #[test]
    fn test_image_asset_defaults_from_path() {
        let asset = ImageAsset::from_path("/tmp/photos/latte.JPG");
        assert_eq!(asset.upload_name(), "latte.JPG");
        assert_eq!(asset.upload_mime(), "image/jpeg");

        let asset = ImageAsset::from_path("/tmp/blob")
            .with_mime_type("image/png")
            .with_file_name("cover.png");
        assert_eq!(asset.upload_name(), "cover.png");
        assert_eq!(asset.upload_mime(), "image/png");
    }
}
