//! Minting against a fake JSON-RPC node and name resolution service.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use intake_agent::adapters::ai::{LlmFieldExtractor, MockAIProvider};
use intake_agent::adapters::chain::{HttpNameResolver, JsonRpcMinterConfig, JsonRpcNftMinter};
use intake_agent::adapters::events::InMemoryEventBus;
use intake_agent::adapters::storage::InMemoryProgressStore;
use intake_agent::application::handlers::intake::{
    Evaluation, ExtractionEvaluator, InboundMessage, IntakeSettings,
};
use intake_agent::application::handlers::nft::{
    MintNftCommand, MintNftError, MintNftHandler, MintOnCompletion,
};
use intake_agent::domain::foundation::{AgentName, SubjectId};
use intake_agent::domain::intake::{FieldSchema, SubjectRecordCompleted};
use intake_agent::domain::nft::EvmAddress;
use intake_agent::ports::{EventSubscriber, ResolveError};

const CONTRACT: &str = "0xf4e4c96ea0627501c2cbee561b1a877ccd0affd7";
const MINTER: &str = "0x742d35cc6634c0532925a3b844bc454e4438f44e";
const WEVM: &str = "0x66f820a414680b5bcda5eeca5dea238543f42054";

#[derive(Clone, Default)]
struct FakeChain {
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn rpc(State(chain): State<FakeChain>, Json(body): Json<Value>) -> Json<Value> {
    chain.requests.lock().unwrap().push(body.clone());
    Json(json!({
        "jsonrpc": "2.0",
        "id": body["id"],
        "result": format!("0x{}", "ab".repeat(32)),
    }))
}

async fn resolve(Path(name): Path<String>) -> Response {
    if name == "wevm.eth" {
        Json(json!({ "address": WEVM })).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Serves the fake node at `/rpc` and the resolver at `/names/:name`.
async fn spawn_fake_chain() -> (String, FakeChain) {
    let chain = FakeChain::default();
    let app = Router::new()
        .route("/rpc", post(rpc))
        .route("/names/:name", get(resolve))
        .with_state(chain.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), chain)
}

fn mint_handler(base: &str) -> MintNftHandler {
    let minter = JsonRpcNftMinter::new(JsonRpcMinterConfig {
        rpc_url: format!("{}/rpc", base),
        contract: EvmAddress::parse(CONTRACT).unwrap(),
        from: EvmAddress::parse(MINTER).unwrap(),
        chain_id: Some(31_337),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    let resolver =
        HttpNameResolver::new(format!("{}/names", base), Duration::from_secs(5)).unwrap();
    MintNftHandler::new(Arc::new(minter), Arc::new(resolver))
}

fn sent_calldata(chain: &FakeChain) -> Vec<String> {
    chain
        .requests
        .lock()
        .unwrap()
        .iter()
        .filter(|req| req["method"] == "eth_sendTransaction")
        .map(|req| req["params"][0]["data"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn ens_recipient_is_resolved_and_minted() {
    let (base, chain) = spawn_fake_chain().await;

    let result = mint_handler(&base)
        .handle(MintNftCommand {
            recipient: "wevm.eth".to_string(),
            name: "Adidas Campus".to_string(),
            description: "A pair of shoes".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result.recipient.as_str(), WEVM);
    assert_eq!(result.tx_hash.as_str(), format!("0x{}", "ab".repeat(32)));

    let requests = chain.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let tx = &requests[0]["params"][0];
    assert_eq!(tx["to"], CONTRACT);
    assert_eq!(tx["from"], MINTER);
    assert_eq!(tx["chainId"], "0x7a69");

    let data = tx["data"].as_str().unwrap();
    assert!(data.starts_with("0x3d02d0c9"));
    assert!(data.contains(&WEVM[2..]));
}

#[tokio::test]
async fn unknown_name_never_reaches_the_node() {
    let (base, chain) = spawn_fake_chain().await;

    let err = mint_handler(&base)
        .handle(MintNftCommand {
            recipient: "nobody.eth".to_string(),
            name: "Maserati GranTurismo".to_string(),
            description: "A great car".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MintNftError::Resolution(ResolveError::NotFound(_))
    ));
    assert!(chain.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn completed_conversation_mints_exactly_once() {
    let (base, chain) = spawn_fake_chain().await;

    let bus = Arc::new(InMemoryEventBus::new());
    bus.subscribe(
        SubjectRecordCompleted::EVENT_TYPE,
        Arc::new(MintOnCompletion::new(Arc::new(mint_handler(&base)))),
    );

    let settings = IntakeSettings::new(
        AgentName::new("Joe").unwrap(),
        FieldSchema::builtin("nft_request").unwrap(),
    );
    let provider = Arc::new(MockAIProvider::new().with_response(
        r#"{"name": "Adidas Campus", "description": "A pair of shoes", "recipient": "wevm.eth"}"#,
    ));
    let evaluator = ExtractionEvaluator::new(
        Arc::new(InMemoryProgressStore::new()),
        Arc::new(LlmFieldExtractor::new(provider)),
        bus.clone(),
        settings,
    );

    let message = InboundMessage::new(
        SubjectId::new("user-3").unwrap(),
        "Mint my Adidas Campus, a pair of shoes, to wevm.eth",
    );
    let first = evaluator.process(&message).await;
    assert!(matches!(first, Evaluation::Updated { completed: true, .. }));

    assert!(!evaluator.should_run(&message).await);
    assert_eq!(evaluator.process(&message).await, Evaluation::Skipped);

    let calldata = sent_calldata(&chain);
    assert_eq!(calldata.len(), 1);
    assert!(calldata[0].contains(&WEVM[2..]));
}
