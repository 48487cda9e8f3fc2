//! HTTP client for the feature API.
//!
//! [`FeatureClient`] is the remote implementation of [`FeatureStore`].
//! Configuration comes from [`Config`](crate::config::Config): base URL plus an
//! optional API key sent as a bearer token.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::models::*;
use crate::store::{FeatureStore, StoreError, StoreResult};

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: API key required or invalid")]
    Unauthorized,

    #[error("Server error: {0}")]
    Server(String),
}

impl From<ClientError> for StoreError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Http(e) => StoreError::Transport(e.to_string()),
            ClientError::NotFound(msg) => StoreError::NotFound(msg),
            ClientError::BadRequest(msg) => StoreError::BadRequest(msg),
            ClientError::Unauthorized => StoreError::Unauthorized,
            ClientError::Server(msg) => StoreError::Server(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl FeatureClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.server_url.clone(), config.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), ClientError> {
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            _ => Err(ClientError::Server(format!("{}: {}", status, body))),
        }
    }

    // ============================================================
    // Feature Operations
    // ============================================================

    pub async fn list_features(&self, project_id: Uuid) -> Result<Vec<Feature>, ClientError> {
        let response = self
            .request(Method::GET, "/features")
            .query(&FeatureSearchParams { project_id })
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn get_feature(&self, id: Uuid) -> Result<Feature, ClientError> {
        let response = self
            .request(Method::GET, &format!("/features/{}", id))
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn create_feature(&self, input: &CreateFeature) -> Result<Feature, ClientError> {
        let response = self
            .request(Method::POST, "/features")
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn update_feature(
        &self,
        id: Uuid,
        input: &UpdateFeature,
    ) -> Result<Feature, ClientError> {
        let response = self
            .request(Method::PUT, &format!("/features/{}", id))
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn delete_feature(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/features/{}", id))
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    // ============================================================
    // Project Operations
    // ============================================================

    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let response = self.request(Method::GET, "/projects").send().await?;
        self.handle_response(response).await
    }

    pub async fn create_project(&self, input: &CreateProject) -> Result<Project, ClientError> {
        let response = self
            .request(Method::POST, "/projects")
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }
}

#[async_trait]
impl FeatureStore for FeatureClient {
    async fn list(&self, project_id: Uuid) -> StoreResult<Vec<Feature>> {
        Ok(self.list_features(project_id).await?)
    }

    async fn create(&self, input: &CreateFeature) -> StoreResult<Feature> {
        Ok(self.create_feature(input).await?)
    }

    async fn update(&self, id: Uuid, input: &UpdateFeature) -> StoreResult<Feature> {
        Ok(self.update_feature(id, input).await?)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        Ok(self.delete_feature(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let client = FeatureClient::new("http://localhost:17020/api/v1/", None);
        assert_eq!(client.base_url(), "http://localhost:17020/api/v1");
    }

    #[test]
    fn client_errors_map_onto_store_errors() {
        assert_eq!(
            StoreError::from(ClientError::NotFound("Feature not found".into())),
            StoreError::NotFound("Feature not found".into())
        );
        assert_eq!(
            StoreError::from(ClientError::Unauthorized),
            StoreError::Unauthorized
        );
        assert_eq!(
            StoreError::from(ClientError::Server("500: boom".into())).to_string(),
            "500: boom"
        );
    }
}
