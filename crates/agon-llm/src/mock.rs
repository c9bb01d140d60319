//! Mock completion provider for testing

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::provider::{CompletionProvider, CompletionRequest, ProviderError};

/// One scripted outcome
pub type MockReply = Result<String, ProviderError>;

/// A mock provider that replays scripted outcomes
///
/// Replies are consumed in order. Once the script runs out the provider
/// answers with its constant reply, or `"{model} reply #{n}"` when it has
/// none, so open-ended sessions still work.
/// Every request is recorded for inspection.
#[derive(Debug)]
pub struct MockProvider {
    /// Name of this mock
    pub name: String,
    script: Mutex<VecDeque<MockReply>>,
    fallback: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
    calls: AtomicUsize,
    latency: Duration,
    gate: Option<Arc<Semaphore>>,
}

impl MockProvider {
    /// Create a mock that replays `replies` in order
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            name: "mock".to_string(),
            script: Mutex::new(replies.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            latency: Duration::ZERO,
            gate: None,
        }
    }

    /// Create a mock that always returns the same response
    pub fn constant(response: &str) -> Self {
        let mut mock = Self::new(Vec::new());
        mock.fallback = Some(response.to_string());
        mock
    }

    /// Create a mock that succeeds for `successes` calls, then fails once
    pub fn failing_after(successes: usize, error: ProviderError) -> Self {
        let mut replies: Vec<MockReply> = (1..=successes)
            .map(|n| Ok(format!("scripted reply #{}", n)))
            .collect();
        replies.push(Err(error));
        Self::new(replies)
    }

    /// Simulate network latency on every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Hold every call until a permit is added to the returned gate
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Number of calls started so far (including ones waiting on the gate)
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self, request: &CompletionRequest, call: usize) -> MockReply {
        let scripted = self.script.lock().ok().and_then(|mut script| script.pop_front());
        scripted.unwrap_or_else(|| match &self.fallback {
            Some(text) => Ok(text.clone()),
            None => Ok(format!("{} reply #{}", request.model, call)),
        })
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| ProviderError::Connection("mock gate closed".to_string()))?;
            permit.forget();
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.next_reply(&request, call)
    }
}
