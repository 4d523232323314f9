//! # Catalog REST API
//!
//! Thin typed wrapper over the backend endpoints. No state lives here apart
//! from the HTTP connection pool; the managers own all client state.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CafeApi request                                 │
//! │                                                                         │
//! │  manager call                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  url(path) ─────────► base_url + "/productos/p9"                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  authorize() ───────► TokenStore::get_token() ──► x-token: <token>     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send (timeout from ClientConfig)                                      │
//! │       │                                                                 │
//! │       ├── 2xx ──► decode JSON body into T                              │
//! │       └── else ─► ClientError::Http { status, msg, errors[].msg }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use cafe_core::{
    CategoriesResponse, ImageAsset, LoginData, LoginResponse, Product, ProductInput,
    ProductsResponse, RegisterData,
};
use cafe_store::TokenStore;

/// Header carrying the session token on authenticated requests.
pub const TOKEN_HEADER: &str = "x-token";

/// Multipart field name the upload endpoint reads the file from.
pub const UPLOAD_FIELD: &str = "archivo";

/// Typed client for the catalog backend.
pub struct CafeApi {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for CafeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CafeApi")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CafeApi {
    pub fn new(settings: &ApiSettings, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let base_url = Url::parse(&settings.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(CafeApi {
            http,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// `GET /auth`: validates the stored token and returns a fresh one.
    ///
    /// Only a 200 counts as valid.
    pub async fn renew_token(&self) -> ClientResult<LoginResponse> {
        let request = self.http.get(self.url("auth")?);
        let response = self.send(request).await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::Http {
                status: response.status().as_u16(),
                message: None,
                errors: Vec::new(),
            });
        }

        decode(response).await
    }

    /// `POST /auth/login`.
    pub async fn login(&self, data: &LoginData) -> ClientResult<LoginResponse> {
        let request = self.http.post(self.url("auth/login")?).json(data);
        decode(self.send(request).await?).await
    }

    /// `POST /usuarios`.
    pub async fn register(&self, data: &RegisterData) -> ClientResult<LoginResponse> {
        let request = self.http.post(self.url("usuarios")?).json(data);
        decode(self.send(request).await?).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// `GET /categorias`.
    pub async fn categories(&self) -> ClientResult<CategoriesResponse> {
        let request = self.http.get(self.url("categorias")?);
        decode(self.send(request).await?).await
    }

    /// `GET /productos?limite=N`.
    pub async fn products(&self, limit: u32) -> ClientResult<ProductsResponse> {
        let mut url = self.url("productos")?;
        url.query_pairs_mut().append_pair("limite", &limit.to_string());

        decode(self.send(self.http.get(url)).await?).await
    }

    /// `GET /productos/:id`.
    pub async fn product(&self, id: &str) -> ClientResult<Product> {
        let request = self.http.get(self.url(&format!("productos/{}", id))?);
        decode(self.send(request).await?).await
    }

    /// `POST /productos`.
    pub async fn create_product(&self, input: &ProductInput) -> ClientResult<Product> {
        let request = self.http.post(self.url("productos")?).json(input);
        decode(self.send(request).await?).await
    }

    /// `PUT /productos/:id`.
    pub async fn update_product(&self, id: &str, input: &ProductInput) -> ClientResult<Product> {
        let request = self
            .http
            .put(self.url(&format!("productos/{}", id))?)
            .json(input);
        decode(self.send(request).await?).await
    }

    /// `PUT /uploads/productos/:id` with the file in the `archivo` field.
    ///
    /// The body is returned untyped; the backend usually answers with the
    /// updated product but is not required to.
    pub async fn upload_product_image(
        &self,
        id: &str,
        asset: &ImageAsset,
    ) -> ClientResult<serde_json::Value> {
        let bytes = tokio::fs::read(&asset.path).await?;

        debug!(
            product_id = %id,
            file = %asset.upload_name(),
            mime = %asset.upload_mime(),
            size = bytes.len(),
            "Uploading product image"
        );

        let part = Part::bytes(bytes)
            .file_name(asset.upload_name())
            .mime_str(asset.upload_mime())
            .map_err(|e| ClientError::Internal(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let request = self
            .http
            .put(self.url(&format!("uploads/productos/{}", id))?)
            .multipart(form);

        let response = self.send(request).await?;
        let body = response.text().await?;

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Joins `path` onto the base URL, keeping the base path prefix.
    fn url(&self, path: &str) -> ClientResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?)
    }

    /// Attaches the stored token, if any.
    ///
    /// A failing token store downgrades the request to anonymous.
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.get_token().await {
            Ok(Some(token)) => request.header(TOKEN_HEADER, token),
            Ok(None) => request,
            Err(e) => {
                warn!(error = %e, "Could not read session token; sending request without it");
                request
            }
        }
    }

    /// Sends the request and turns non-2xx statuses into `ClientError::Http`.
    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = self.authorize(request).await.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_response(status.as_u16(), &body);
        debug!(status = status.as_u16(), error = %err, "Backend rejected request");
        Err(err)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_store::MemoryTokenStore;

    fn api_at(base: &str) -> CafeApi {
        let settings = ApiSettings {
            base_url: base.to_string(),
            ..ApiSettings::default()
        };
        CafeApi::new(&settings, Arc::new(MemoryTokenStore::new())).unwrap()
    }

    #[test]
    fn test_url_keeps_base_path() {
        let api = api_at("https://cafe.example.com/api");
        assert_eq!(
            api.url("productos/p9").unwrap().as_str(),
            "https://cafe.example.com/api/productos/p9"
        );

        let api = api_at("https://cafe.example.com/api/");
        assert_eq!(
            api.url("/auth").unwrap().as_str(),
            "https://cafe.example.com/api/auth"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let settings = ApiSettings {
            base_url: "::nope::".to_string(),
            ..ApiSettings::default()
        };
        let err = CafeApi::new(&settings, Arc::new(MemoryTokenStore::new())).unwrap_err();
        assert!(err.is_config_error());
    }
}
