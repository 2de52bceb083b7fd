// Allow dead code: the client mirrors the backend's full endpoint surface
#![allow(dead_code)]

//! API client for the Warehouse Management System REST backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the inventory, shipment, user and dashboard endpoints.

use std::time::Duration;

use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::auth::guard::RefreshTokens;
use crate::auth::token::TokenPair;
use crate::models::{
    DashboardData, InventoryItem, NewInventoryItem, NewShipment, NewUser, Shipment,
    ShipmentStatus, ShipmentType, User,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the warehouse backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer token, e.g. after logout.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidResponse(format!("Invalid token header: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &[]).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .query(query)
            .headers(self.auth_headers()?)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "PUT");
        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        let response = self
            .client
            .delete(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Authentication =====

    /// Exchange credentials for an access/refresh token pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        self.post("/api/token/", &body).await
    }

    // ===== Users =====

    /// Register a new account. Open endpoint, no token required.
    pub async fn register(&self, user: &NewUser) -> Result<User, ApiError> {
        self.post("/api/users/register/", user).await
    }

    /// Fetch the currently authenticated user.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/api/user/me/").await
    }

    /// List all users. Admin only; others get `AccessDenied`.
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/api/users/").await
    }

    /// Delete a user. Admin only.
    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/users/{}/", id)).await
    }

    // ===== Inventory =====

    /// List inventory items, optionally narrowed by search text or category.
    pub async fn list_inventory(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<InventoryItem>, ApiError> {
        let mut query = Vec::new();
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        if let Some(category) = category {
            query.push(("category", category.to_string()));
        }
        self.get_with_query("/api/inventory/", &query).await
    }

    /// Fetch a single inventory item.
    pub async fn get_item(&self, id: i64) -> Result<InventoryItem, ApiError> {
        self.get(&format!("/api/inventory/{}/", id)).await
    }

    /// Create a new inventory item.
    pub async fn create_item(&self, item: &NewInventoryItem) -> Result<InventoryItem, ApiError> {
        self.post("/api/inventory/", item).await
    }

    /// Replace an inventory item.
    pub async fn update_item(
        &self,
        id: i64,
        item: &NewInventoryItem,
    ) -> Result<InventoryItem, ApiError> {
        self.put(&format!("/api/inventory/{}/", id), item).await
    }

    /// Delete an inventory item.
    pub async fn delete_item(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/inventory/{}/", id)).await
    }

    /// List the distinct categories in use.
    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.get("/api/inventory/categories/").await
    }

    /// List items at or below their minimum stock level.
    pub async fn low_stock(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.get("/api/inventory/low_stock/").await
    }

    /// Fetch aggregate statistics for the dashboard.
    pub async fn dashboard_data(&self) -> Result<DashboardData, ApiError> {
        self.get("/api/inventory/dashboard_data/").await
    }

    // ===== Shipments =====

    /// List shipments, optionally narrowed by type, status or search text.
    pub async fn list_shipments(
        &self,
        shipment_type: Option<ShipmentType>,
        status: Option<ShipmentStatus>,
        search: Option<&str>,
    ) -> Result<Vec<Shipment>, ApiError> {
        let mut query = Vec::new();
        if let Some(shipment_type) = shipment_type {
            query.push(("type", shipment_type.as_str().to_string()));
        }
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        self.get_with_query("/api/shipments/", &query).await
    }

    /// List shipments from the last 30 days.
    pub async fn recent_shipments(&self) -> Result<Vec<Shipment>, ApiError> {
        self.get("/api/shipments/recent/").await
    }

    /// Fetch a single shipment with its lines.
    pub async fn get_shipment(&self, id: i64) -> Result<Shipment, ApiError> {
        self.get(&format!("/api/shipments/{}/", id)).await
    }

    /// Create a new shipment with nested lines.
    pub async fn create_shipment(&self, shipment: &NewShipment) -> Result<Shipment, ApiError> {
        self.post("/api/shipments/", shipment).await
    }

    /// Replace a shipment and its lines.
    pub async fn update_shipment(
        &self,
        id: i64,
        shipment: &NewShipment,
    ) -> Result<Shipment, ApiError> {
        self.put(&format!("/api/shipments/{}/", id), shipment).await
    }

    /// Delete a shipment.
    pub async fn delete_shipment(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/shipments/{}/", id)).await
    }

    /// Move a shipment to a new status. The server rejects transitions out
    /// of final states and recalculates inventory on delivery; the returned
    /// shipment reflects the result.
    pub async fn update_shipment_status(
        &self,
        id: i64,
        status: ShipmentStatus,
    ) -> Result<Shipment, ApiError> {
        let body = serde_json::json!({ "status": status.as_str() });
        self.post(&format!("/api/shipments/{}/update_status/", id), &body)
            .await
    }

    /// Shipment history for one inventory item.
    pub async fn item_history(&self, item_id: i64) -> Result<Vec<Shipment>, ApiError> {
        self.get_with_query("/api/shipments/item_history/", &[("item_id", item_id.to_string())])
            .await
    }
}

impl RefreshTokens for ApiClient {
    /// One refresh exchange: the current refresh token for a new pair.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let body = serde_json::json!({ "refresh": refresh_token });
        self.post("/api/token/refresh/", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/").expect("client");
        assert_eq!(client.url("/api/token/"), "http://localhost:8000/api/token/");

        let client = ApiClient::new("http://localhost:8000").expect("client");
        assert_eq!(
            client.url("/api/inventory/low_stock/"),
            "http://localhost:8000/api/inventory/low_stock/"
        );
    }

    #[test]
    fn test_with_token_keeps_base_url() {
        let client = ApiClient::new("https://warehouse.example.com").expect("client");
        let authed = client.with_token("abc".to_string());
        assert_eq!(authed.url("/api/users/"), "https://warehouse.example.com/api/users/");
        assert!(authed.token.is_some());
        assert!(client.token.is_none());
    }
}
