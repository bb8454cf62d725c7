use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use defectscan_core::{GenerationRequest, GenerationResponse, MultimodalGenerator};

type FailureFn = Box<dyn Fn() -> anyhow::Error + Send + Sync>;

/// A generator that returns canned text (or a canned failure) without
/// touching the network. Every request it receives is recorded.
pub struct MockGenerator {
    name: String,
    fixed_response: Option<String>,
    failure: Option<FailureFn>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed_response: None,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Fail every call with the error produced by `make_error`.
    pub fn with_failure<F>(mut self, make_error: F) -> Self
    where
        F: Fn() -> anyhow::Error + Send + Sync + 'static,
    {
        self.failure = Some(Box::new(make_error));
        self
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl MultimodalGenerator for MockGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        self.requests.lock().await.push(request.clone());

        if let Some(make_error) = &self.failure {
            return Err(make_error());
        }

        Ok(GenerationResponse {
            text: self
                .fixed_response
                .clone()
                .unwrap_or_else(|| "Mock response".to_string()),
            provider: self.name.clone(),
            model: "mock".to_string(),
            latency_ms: 0,
        })
    }
}
