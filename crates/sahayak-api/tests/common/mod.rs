#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use sahayak_api::{build_router, payment::PaymentValidator, AppState, Collaborators, Config};
use sahayak_cloud::{ObjectStore, TextDetector};
use sahayak_llm::{ChatClient, ChatRequest, ChatResponse, TokenUsage};
use sahayak_persist::{
    ChatRecord, DocumentRecord, InMemoryPersistenceClient, PersistError, PersistenceClient,
    SubscriptionUpdate, UserRecord,
};

pub const TEST_CONFIG: &str = r#"
    [server]
    host = "127.0.0.1"
    port = 0

    [cors]
    origins = ["*"]

    [persistence]
    backend = "memory"

    [mongodb]
    database = "sahayak_test"

    [llm]
    model = "gpt-4-turbo-preview"
    temperature = 0.7
    max_tokens = 1000

    [storage]
    bucket = "default-bucket"

    [logging]
    level = "debug"
    format = "pretty"
"#;

pub fn test_config() -> Config {
    toml::from_str(TEST_CONFIG).unwrap()
}

// ============================================================================
// COLLABORATOR FAKES
// ============================================================================

/// Language model that answers with a fixed reply, or fails
pub struct ScriptedChat {
    reply: Option<String>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn replying(text: &str) -> Self {
        Self { reply: Some(text.to_string()), requests: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { reply: None, requests: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);

        let text = self
            .reply
            .clone()
            .ok_or_else(|| anyhow!("OpenAI API error (503 Service Unavailable): overloaded"))?;
        Ok(ChatResponse {
            content: Some(text),
            usage: Some(TokenUsage { input_tokens: 30, output_tokens: 12, total_tokens: 42 }),
            finish_reason: Some("stop".to_string()),
            model,
        })
    }
}

/// Object store serving the same bytes for every object
pub struct StaticObjects {
    bytes: Option<Vec<u8>>,
    pub downloads: Mutex<Vec<(String, String)>>,
}

impl StaticObjects {
    pub fn serving(bytes: &[u8]) -> Self {
        Self { bytes: Some(bytes.to_vec()), downloads: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { bytes: None, downloads: Mutex::new(Vec::new()) }
    }

    pub fn downloads(&self) -> Vec<(String, String)> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for StaticObjects {
    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>> {
        self.downloads
            .lock()
            .unwrap()
            .push((bucket.to_string(), path.to_string()));
        self.bytes
            .clone()
            .ok_or_else(|| anyhow!("Storage API error (404 Not Found) for {bucket}/{path}"))
    }
}

/// OCR that always reports the same text (or nothing)
pub struct StaticOcr {
    text: Option<String>,
    pub images: Mutex<Vec<Vec<u8>>>,
}

impl StaticOcr {
    pub fn detecting(text: Option<&str>) -> Self {
        Self { text: text.map(str::to_string), images: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.images.lock().unwrap().len()
    }
}

#[async_trait]
impl TextDetector for StaticOcr {
    async fn detect_text(&self, image: &[u8]) -> Result<Option<String>> {
        self.images.lock().unwrap().push(image.to_vec());
        Ok(self.text.clone())
    }
}

/// Payment gateway with a fixed verdict
pub struct FixedPayments {
    verdict: Result<bool, String>,
    pub checked: Mutex<Vec<String>>,
}

impl FixedPayments {
    pub fn accepting() -> Self {
        Self { verdict: Ok(true), checked: Mutex::new(Vec::new()) }
    }

    pub fn rejecting() -> Self {
        Self { verdict: Ok(false), checked: Mutex::new(Vec::new()) }
    }

    pub fn unreachable() -> Self {
        Self { verdict: Err("gateway timeout".to_string()), checked: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.checked.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentValidator for FixedPayments {
    async fn verify(&self, subscription_id: &str) -> Result<bool> {
        self.checked.lock().unwrap().push(subscription_id.to_string());
        self.verdict.clone().map_err(|e| anyhow!(e))
    }
}

/// Database that answers reads with "no such user" and fails every write
pub struct DownStore;

impl DownStore {
    fn down<T>() -> sahayak_persist::Result<T> {
        Err(PersistError::Connection("down".to_string()))
    }
}

#[async_trait]
impl PersistenceClient for DownStore {
    async fn get_user(&self, _user_id: &str) -> sahayak_persist::Result<Option<UserRecord>> {
        Ok(None)
    }

    async fn record_request(&self, _user_id: &str, _at_ms: i64) -> sahayak_persist::Result<()> {
        Self::down()
    }

    async fn apply_subscription(
        &self,
        _user_id: &str,
        _update: SubscriptionUpdate,
    ) -> sahayak_persist::Result<()> {
        Self::down()
    }

    async fn reset_free_tier(&self, _tokens: i64) -> sahayak_persist::Result<u64> {
        Self::down()
    }

    async fn save_chat(&self, _chat: ChatRecord) -> sahayak_persist::Result<()> {
        Self::down()
    }

    async fn save_document(&self, _document: DocumentRecord) -> sahayak_persist::Result<()> {
        Self::down()
    }

    async fn ping(&self) -> sahayak_persist::Result<()> {
        Self::down()
    }
}

// ============================================================================
// APP HARNESS
// ============================================================================

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub store: Arc<InMemoryPersistenceClient>,
    pub chat: Arc<ScriptedChat>,
    pub objects: Arc<StaticObjects>,
    pub ocr: Arc<StaticOcr>,
    pub payments: Arc<FixedPayments>,
}

pub struct TestAppBuilder {
    config: Config,
    chat: ScriptedChat,
    objects: StaticObjects,
    ocr: StaticOcr,
    payments: FixedPayments,
    persist: Option<Arc<dyn PersistenceClient>>,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            config: test_config(),
            chat: ScriptedChat::replying("Namaste! Kasto chha?"),
            objects: StaticObjects::serving(b"\x89PNG fake image"),
            ocr: StaticOcr::detecting(Some("बिल रकम: ५००")),
            payments: FixedPayments::accepting(),
            persist: None,
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

impl TestAppBuilder {
    pub fn config(mut self, edit: impl FnOnce(&mut Config)) -> Self {
        edit(&mut self.config);
        self
    }

    pub fn chat(mut self, chat: ScriptedChat) -> Self {
        self.chat = chat;
        self
    }

    pub fn objects(mut self, objects: StaticObjects) -> Self {
        self.objects = objects;
        self
    }

    pub fn ocr(mut self, ocr: StaticOcr) -> Self {
        self.ocr = ocr;
        self
    }

    pub fn payments(mut self, payments: FixedPayments) -> Self {
        self.payments = payments;
        self
    }

    /// Replace the in-memory store handed to the app; `TestApp::store` then
    /// stays empty
    pub fn persist(mut self, persist: Arc<dyn PersistenceClient>) -> Self {
        self.persist = Some(persist);
        self
    }

    pub fn build(self) -> TestApp {
        let store = Arc::new(InMemoryPersistenceClient::new());
        let persist: Arc<dyn PersistenceClient> = self
            .persist
            .unwrap_or_else(|| store.clone() as Arc<dyn PersistenceClient>);
        let chat = Arc::new(self.chat);
        let objects = Arc::new(self.objects);
        let ocr = Arc::new(self.ocr);
        let payments = Arc::new(self.payments);

        let state = Arc::new(AppState::new(
            self.config,
            Collaborators {
                persist,
                llm: chat.clone(),
                objects: objects.clone(),
                ocr: ocr.clone(),
                payments: payments.clone(),
            },
        ));

        TestApp {
            router: build_router(state.clone()),
            state,
            store,
            chat,
            objects,
            ocr,
            payments,
        }
    }
}
