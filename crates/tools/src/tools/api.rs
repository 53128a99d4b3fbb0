//! HTTP API tools.
//!
//! These never touch the browser session: they carry their own `reqwest`
//! client and the dispatcher skips session provisioning for them. A non-2xx
//! status is still a successful envelope - the caller asked for the request
//! to be performed and it was; only transport failures are tool errors.

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

use crate::args::{parse_args, HttpRequestArgs};
use crate::error::ToolError;
use crate::response::{error_response, success_response, ToolResponse};
use crate::tool::{Tool, ToolContext};

pub struct HttpRequestTool {
    name: &'static str,
    method: Method,
    client: Client,
}

impl HttpRequestTool {
    fn new(name: &'static str, method: Method) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            name,
            method,
            client,
        }
    }

    pub fn get() -> Self {
        Self::new("playwright_get", Method::GET)
    }

    pub fn post() -> Self {
        Self::new("playwright_post", Method::POST)
    }

    pub fn put() -> Self {
        Self::new("playwright_put", Method::PUT)
    }

    pub fn patch() -> Self {
        Self::new("playwright_patch", Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new("playwright_delete", Method::DELETE)
    }

    async fn perform(&self, args: &HttpRequestArgs) -> Result<ToolResponse, ToolError> {
        let mut request = self.client.request(self.method.clone(), &args.url);
        if let Some(body) = &args.value {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(success_response(format!(
            "{} request to {}\nStatus: {}\nResponse: {}",
            self.method, args.url, status, body
        )))
    }
}

#[async_trait]
impl Tool for HttpRequestTool {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn execute(&self, args: serde_json::Value, _ctx: &ToolContext) -> ToolResponse {
        let args: HttpRequestArgs = match parse_args(args) {
            Ok(args) => args,
            Err(envelope) => return envelope,
        };

        match self.perform(&args).await {
            Ok(response) => response,
            Err(e) => error_response(format!("Operation failed: {e}")),
        }
    }
}
