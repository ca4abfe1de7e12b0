use std::sync::Arc;

use sahayak_cloud::{ObjectStore, TextDetector};
use sahayak_llm::ChatClient;
use sahayak_persist::PersistenceClient;

use crate::completion::CompletionOrchestrator;
use crate::config::Config;
use crate::ingestion::DocumentIngestor;
use crate::payment::PaymentValidator;
use crate::quota::QuotaTracker;
use crate::reset::QuotaResetJob;
use crate::subscription::SubscriptionHandler;

/// Handles to every external collaborator, built once at startup
#[derive(Clone)]
pub struct Collaborators {
    pub persist: Arc<dyn PersistenceClient>,
    pub llm: Arc<dyn ChatClient>,
    pub objects: Arc<dyn ObjectStore>,
    pub ocr: Arc<dyn TextDetector>,
    pub payments: Arc<dyn PaymentValidator>,
}

/// Shared application state passed to all handlers
///
/// Services hold `Arc` handles to the collaborators, so the state is
/// wrapped in one more `Arc` and shared across requests.
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: Arc<dyn PersistenceClient>,
    pub completion: CompletionOrchestrator,
    pub subscriptions: SubscriptionHandler,
    pub ingestion: DocumentIngestor,
    pub reset: Arc<QuotaResetJob>,
}

impl AppState {
    pub fn new(config: Config, collaborators: Collaborators) -> Self {
        let Collaborators { persist, llm, objects, ocr, payments } = collaborators;

        let quota = QuotaTracker::new(persist.clone(), config.quota.cooldown_ms);
        let completion =
            CompletionOrchestrator::new(llm, persist.clone(), quota, config.llm.clone());
        let subscriptions =
            SubscriptionHandler::new(persist.clone(), payments, config.quota.clone());
        let ingestion =
            DocumentIngestor::new(persist.clone(), objects, ocr, config.storage.bucket.clone());
        let reset = Arc::new(QuotaResetJob::new(persist.clone(), config.quota.free_tokens));

        Self {
            config: Arc::new(config),
            persist,
            completion,
            subscriptions,
            ingestion,
            reset,
        }
    }
}
