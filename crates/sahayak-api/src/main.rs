use std::sync::Arc;

use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sahayak_api::{
    build_router,
    config::{Config, PersistenceBackend},
    payment::AcceptAllPayments,
    scheduler::{run_reset_schedule, ZonedSchedule},
    AppState, Collaborators,
};
use sahayak_cloud::{GcsClient, VisionClient};
use sahayak_llm::OpenAIClient;
use sahayak_persist::{InMemoryPersistenceClient, MongoPersistenceClient, PersistenceClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Sahayak API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Validate the reset schedule before anything binds
    let schedule = ZonedSchedule::from_config(&config.reset)?;

    let collaborators = connect_collaborators(&config).await?;
    let state = Arc::new(AppState::new(config.clone(), collaborators));

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let scheduler = if config.reset.enabled {
        tracing::info!(
            schedule = %config.reset.schedule,
            timezone = %config.reset.timezone,
            "Free-tier reset scheduler enabled"
        );
        Some(tokio::spawn(run_reset_schedule(
            schedule,
            state.reset.clone(),
            shutdown_tx.subscribe(),
        )))
    } else {
        tracing::info!("Free-tier reset scheduler disabled");
        None
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api-docs/openapi.json", addr);

    let server_shutdown = shutdown_tx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = server_shutdown.send(());
        })
        .await?;

    if let Some(handle) = scheduler {
        let _ = shutdown_tx.send(());
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Reset scheduler task ended abnormally");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn connect_collaborators(config: &Config) -> anyhow::Result<Collaborators> {
    tracing::info!("Initializing LLM client");
    let mut llm = OpenAIClient::new(config.openai_api_key.clone())?;
    if let Some(base_url) = &config.llm.base_url {
        llm = llm.with_base_url(base_url.clone());
    }

    let persist: Arc<dyn PersistenceClient> = match config.persistence.backend {
        PersistenceBackend::Mongodb => {
            tracing::info!("Connecting to MongoDB");
            let client =
                MongoPersistenceClient::connect(&config.mongodb_uri, &config.mongodb.database)
                    .await?;
            tracing::info!("MongoDB connected");
            Arc::new(client)
        }
        PersistenceBackend::Memory => {
            tracing::warn!("Using in-memory persistence; data is lost on restart");
            Arc::new(InMemoryPersistenceClient::new())
        }
    };

    let credentials = config.google_credentials();

    let mut objects = GcsClient::new(credentials.clone())?;
    if let Some(base_url) = &config.storage.base_url {
        objects = objects.with_base_url(base_url.clone());
    }

    let mut ocr = VisionClient::new(credentials)?;
    if let Some(base_url) = &config.vision.base_url {
        ocr = ocr.with_base_url(base_url.clone());
    }

    Ok(Collaborators {
        persist,
        llm: Arc::new(llm),
        objects: Arc::new(objects),
        ocr: Arc::new(ocr),
        payments: Arc::new(AcceptAllPayments),
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
