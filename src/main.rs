use std::sync::Arc;

use tokio::sync::watch;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use intake_agent::adapters::ai::{AnthropicConfig, AnthropicProvider, LlmFieldExtractor, MockAIProvider};
use intake_agent::adapters::chain::{
    HttpNameResolver, JsonRpcMinterConfig, JsonRpcNftMinter, StaticNameResolver,
};
use intake_agent::adapters::events::{DispatchMode, InMemoryEventBus};
use intake_agent::adapters::http::{intake_router, IntakeAppState};
use intake_agent::adapters::storage::{
    InMemoryProgressStore, RedisProgressStore, DEFAULT_SWEEP_INTERVAL,
};
use intake_agent::application::handlers::intake::{
    CompletionSignalProvider, ExtractionEvaluator, IntakeSettings, MessagePipeline,
    StatusProvider,
};
use intake_agent::application::handlers::nft::{MintNftHandler, MintOnCompletion};
use intake_agent::config::AppConfig;
use intake_agent::domain::intake::SubjectRecordCompleted;
use intake_agent::ports::{AIProvider, EventSubscriber, NameResolver, ProgressStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let schema = config.agent.field_schema()?;
    let settings = IntakeSettings::new(config.agent.agent_name()?, schema)
        .with_record_ttl(config.agent.record_ttl());
    info!(
        agent = %settings.agent,
        schema = %settings.schema.tag,
        ttl_secs = settings.record_ttl.as_secs(),
        "Starting intake agent"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let store = progress_store(&config, shutdown_rx).await?;
    let provider = ai_provider(&config)?;
    let extractor = Arc::new(LlmFieldExtractor::new(provider));

    let bus = Arc::new(InMemoryEventBus::new().with_mode(DispatchMode::Spawned));
    if config.chain.is_enabled() {
        let minter = JsonRpcNftMinter::new(JsonRpcMinterConfig {
            rpc_url: config.chain.rpc_url.clone().unwrap_or_default(),
            contract: config.chain.contract_address()?,
            from: config.chain.minter_address()?,
            chain_id: config.chain.chain_id,
            timeout: config.chain.timeout(),
        })?;
        let resolver: Arc<dyn NameResolver> = match &config.chain.resolver_url {
            Some(url) => Arc::new(HttpNameResolver::new(url.clone(), config.chain.timeout())?),
            None => {
                warn!("No name resolver configured; .eth recipients cannot be minted");
                Arc::new(StaticNameResolver::new())
            }
        };
        let mint = Arc::new(MintNftHandler::new(Arc::new(minter), resolver));
        bus.subscribe(
            SubjectRecordCompleted::EVENT_TYPE,
            Arc::new(MintOnCompletion::new(mint)),
        );
        info!("Minting enabled for completed NFT requests");
    }

    let evaluator = ExtractionEvaluator::new(store.clone(), extractor, bus, settings.clone());
    let pipeline = MessagePipeline::new(
        Arc::new(evaluator),
        Arc::new(StatusProvider::new(store.clone(), settings.clone())),
        Arc::new(CompletionSignalProvider::new(store.clone(), settings.clone())),
    );

    let app = intake_router(
        IntakeAppState::new(Arc::new(pipeline), store, settings),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    let _ = shutdown_tx.send(true);
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn progress_store(
    config: &AppConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<Arc<dyn ProgressStore>, BoxError> {
    let Some(url) = config.redis.url.as_deref().filter(|_| config.redis.is_configured()) else {
        warn!("No Redis URL configured; records are kept in process memory");
        let store = InMemoryProgressStore::new();
        let sweeper = store.clone();
        tokio::spawn(async move {
            sweeper
                .run_expiry_sweep(DEFAULT_SWEEP_INTERVAL, shutdown)
                .await
        });
        return Ok(Arc::new(store));
    };

    let client = redis::Client::open(url)?;
    let conn = tokio::time::timeout(
        config.redis.timeout(),
        client.get_multiplexed_tokio_connection(),
    )
    .await??;
    info!("Using Redis progress store");
    Ok(Arc::new(
        RedisProgressStore::new(conn).with_max_merge_attempts(config.redis.max_merge_attempts),
    ))
}

fn ai_provider(config: &AppConfig) -> Result<Arc<dyn AIProvider>, BoxError> {
    match &config.ai.anthropic_api_key {
        Some(key) if config.ai.has_anthropic() => {
            let provider = AnthropicProvider::new(
                AnthropicConfig::from_secret(key.clone())
                    .with_model(config.ai.model.clone())
                    .with_timeout(config.ai.timeout())
                    .with_max_retries(config.ai.max_retries),
            )?;
            Ok(Arc::new(provider))
        }
        _ => {
            warn!("No Anthropic API key configured; extraction will find nothing");
            Ok(Arc::new(MockAIProvider::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
