//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all copier endpoints.
//!
//! Page actions are form posts answered with a redirect to `/`; reqwest
//! follows it, so each action returns the page rendered afterwards.
//!
//! When routes or form fields change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a new client with an empty cookie jar
    ///
    /// Each client is a separate browser: it gets its own copier session on
    /// its first request.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Keeps the copier session across requests
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("Page action request failed")
    }

    // ========================================================================
    // Pages
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect("Home page request failed")
    }

    /// GET / and returns the page body
    pub async fn home_page(&self) -> String {
        self.get_home()
            .await
            .text()
            .await
            .expect("Failed to read home page")
    }

    /// POST /ui/workflows
    pub async fn fetch_workflows(&self) -> Response {
        self.post_form("/ui/workflows", &[]).await
    }

    /// POST /ui/continue
    ///
    /// `workflow_id` of `None` submits the form with no radio selected.
    pub async fn continue_with(&self, workflow_id: Option<&str>, reason: &str) -> Response {
        let mut fields = vec![("reason", reason)];
        if let Some(id) = workflow_id {
            fields.push(("workflow_id", id));
        }
        self.post_form("/ui/continue", &fields).await
    }

    /// POST /ui/copy
    ///
    /// `answer` is the overwrite confirmation ("yes" or "no"); `None` is a
    /// plain click on the copy button.
    pub async fn copy(&self, answer: Option<&str>) -> Response {
        match answer {
            Some(answer) => self.post_form("/ui/copy", &[("answer", answer)]).await,
            None => self.post_form("/ui/copy", &[]).await,
        }
    }

    /// POST /ui/back
    pub async fn back(&self) -> Response {
        self.post_form("/ui/back", &[]).await
    }

    /// POST /ui/restart
    pub async fn restart(&self) -> Response {
        self.post_form("/ui/restart", &[]).await
    }

    // ========================================================================
    // JSON API
    // ========================================================================

    /// GET /health
    pub async fn health(&self) -> Response {
        self.client
            .get(self.url("/health"))
            .send()
            .await
            .expect("Health request failed")
    }

    /// GET /api/workflows
    pub async fn api_workflows(&self) -> Response {
        self.client
            .get(self.url("/api/workflows"))
            .send()
            .await
            .expect("Workflow list request failed")
    }

    /// GET /api/workflow/{id}
    pub async fn api_workflow(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/api/workflow/{}", id)))
            .send()
            .await
            .expect("Workflow detail request failed")
    }

    /// GET /api/check-destination/{id}
    pub async fn api_check_destination(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/api/check-destination/{}", id)))
            .send()
            .await
            .expect("Destination check request failed")
    }

    /// POST /api/copy-workflow
    pub async fn api_copy(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/api/copy-workflow"))
            .json(body)
            .send()
            .await
            .expect("Copy request failed")
    }
}
