//! Shared fixtures for the client integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use cafe_client::{CafeApi, CatalogManager, ClientConfig, SessionManager};
use cafe_store::{MemoryTokenStore, TokenStore};
use serde_json::{json, Value};
use wiremock::MockServer;

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::with_base_url(format!("{}/api", server.uri()))
}

pub fn api_for(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Arc<CafeApi> {
    Arc::new(CafeApi::new(&config.api, tokens).unwrap())
}

pub struct SessionFixture {
    pub session: Arc<SessionManager>,
    pub tokens: Arc<MemoryTokenStore>,
}

pub fn session_for(server: &MockServer, tokens: MemoryTokenStore) -> SessionFixture {
    session_with_config(config_for(server), tokens)
}

pub fn session_with_config(config: ClientConfig, tokens: MemoryTokenStore) -> SessionFixture {
    let tokens = Arc::new(tokens);
    let api = api_for(&config, tokens.clone());
    let session = Arc::new(SessionManager::new(api, tokens.clone(), &config.session));
    SessionFixture { session, tokens }
}

pub fn catalog_for(server: &MockServer, tokens: MemoryTokenStore) -> Arc<CatalogManager> {
    let config = config_for(server);
    let api = api_for(&config, Arc::new(tokens));
    Arc::new(CatalogManager::new(api, config.api.products_limit))
}

// =============================================================================
// JSON bodies
// =============================================================================

pub fn user_json() -> Value {
    json!({
        "uid": "u1",
        "nombre": "Ana",
        "correo": "a@b.com",
        "rol": "ADMIN_ROLE",
        "estado": true,
        "google": false
    })
}

pub fn login_json(token: &str) -> Value {
    json!({ "token": token, "usuario": user_json() })
}

pub fn product_json(id: &str, name: &str, category: (&str, &str)) -> Value {
    json!({
        "_id": id,
        "nombre": name,
        "categoria": { "_id": category.0, "nombre": category.1 },
        "precio": 0,
        "disponible": true,
        "usuario": { "_id": "u1", "nombre": "Ana" }
    })
}

pub fn coffee_json(id: &str, name: &str) -> Value {
    product_json(id, name, ("cat1", "Coffee"))
}

pub fn products_page(products: Vec<Value>) -> Value {
    json!({ "total": products.len(), "productos": products })
}
