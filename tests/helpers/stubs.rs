// ABOUTME: Stub generation providers and mailers for driving the request pipeline in tests
// ABOUTME: Canned replies, failures, and hangs so every stage outcome can be reproduced offline

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use mealprep_core::EmailMessage;
use mealprep_server::llm::{ChatRequest, ChatResponse, GenerationError, LlmProvider};
use mealprep_server::mail::{DeliveryError, DeliveryMode, DeliveryReceipt, Mailer};

/// Returns the same text for every completion and records what it was asked
pub struct StubProvider {
    reply: String,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatRequest>>,
}

impl StubProvider {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_owned(),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(ChatResponse {
            content: self.reply.clone(),
            model: "stub-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }
}

/// Fails every completion with the error built by `make`
pub struct FailingProvider {
    make: fn() -> GenerationError,
}

impl FailingProvider {
    pub const fn new(make: fn() -> GenerationError) -> Self {
        Self { make }
    }
}

#[async_trait]
impl LlmProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, GenerationError> {
        Err((self.make)())
    }
}

/// Never answers
pub struct HangingProvider;

#[async_trait]
impl LlmProvider for HangingProvider {
    fn name(&self) -> &'static str {
        "hanging"
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, GenerationError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(GenerationError::EmptyResponse)
    }
}

/// Accepts every message and keeps a copy
pub struct RecordingMailer {
    mode: DeliveryMode,
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::with_mode(DeliveryMode::Smtp)
    }

    pub fn with_mode(mode: DeliveryMode) -> Self {
        Self {
            mode,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn mode(&self) -> DeliveryMode {
        self.mode
    }

    async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(DeliveryReceipt::now(self.mode, Some("250 OK".to_owned())))
    }
}

/// Rejects every message at the transport
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Smtp
    }

    async fn send(&self, _message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        Err(DeliveryError::Transport("connection reset by relay".to_owned()))
    }
}

/// Never acknowledges
pub struct HangingMailer;

#[async_trait]
impl Mailer for HangingMailer {
    fn mode(&self) -> DeliveryMode {
        DeliveryMode::Smtp
    }

    async fn send(&self, _message: &EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(DeliveryError::Transport("unreachable".to_owned()))
    }
}
