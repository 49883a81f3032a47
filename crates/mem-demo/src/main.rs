//! Demo: send a short conversation to the memory service, then retrieve memory
//! for a query. Runs once with the async client and once with the blocking one.

use mem_client::{
    BlockingMemoryClient, ClientConfig, ClientError, ConversationMessage, MemoryApi,
    MemoryClient, RetrieveMemoryQuery,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const QUERY_TEXT: &str = "Recommend places to visit in India.";

struct DemoSettings {
    user_id: String,
    conversation_id: String,
    output_dir: PathBuf,
}

impl DemoSettings {
    fn from_env() -> Self {
        Self {
            user_id: std::env::var("DEMO_USER_ID")
                .unwrap_or_else(|_| "demo.user@example.com".to_string()),
            conversation_id: std::env::var("DEMO_CONVERSATION_ID")
                .unwrap_or_else(|_| "conversation_1".to_string()),
            output_dir: std::env::var("DEMO_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    fn query(&self) -> RetrieveMemoryQuery {
        RetrieveMemoryQuery::new(&self.user_id, QUERY_TEXT)
    }
}

fn sample_messages() -> Vec<ConversationMessage> {
    vec![
        ConversationMessage::human("Hello."),
        ConversationMessage::ai("Hello, how can I help you?"),
        ConversationMessage::human(QUERY_TEXT),
        ConversationMessage::ai(
            "Here are some of the most remarkable places to visit in India:\n\n\
             1. Agra, Uttar Pradesh\n- Home to the Taj Mahal\n- Magnificent Mughal architecture\n\n\
             2. Darjeeling, West Bengal\n- Mountain views and sunrise vistas\n\
             - World-renowned tea plantations\n\n\
             3. Hampi, Karnataka\n- UNESCO World Heritage Site with 500+ ancient monuments\n\n\
             4. Varanasi\n- One of the oldest living cities\n\
             - Famous for its ghats along the Ganges\n\n\
             5. Kerala (Munnar, Alleppey, Kochi)\n- Backwaters, houseboats and tea plantations\n\n\
             6. Ladakh\n- High-altitude desert, Buddhist monasteries and trekking\n\n\
             Best time to visit: October to March is pleasant for most regions; \
             April to June suits high-altitude areas like Ladakh.",
        ),
    ]
}

/// Post every sample message, then retrieve memory for the demo query.
async fn exchange(api: &dyn MemoryApi, demo: &DemoSettings) -> Result<Value, ClientError> {
    for message in sample_messages() {
        let response = api
            .add_message(&demo.user_id, &demo.conversation_id, &message)
            .await?;
        tracing::info!(%response, "add message response");
    }
    let response = api.retrieve_memory(&demo.query()).await?;
    tracing::info!(%response, "retrieve memory response");
    Ok(response)
}

fn exchange_blocking(
    client: &BlockingMemoryClient,
    demo: &DemoSettings,
) -> Result<Value, ClientError> {
    for message in sample_messages() {
        let response = client.add_message(&demo.user_id, &demo.conversation_id, &message)?;
        tracing::info!(%response, "add message response");
    }
    let response = client.retrieve_memory(&demo.query())?;
    tracing::info!(%response, "retrieve memory response");
    Ok(response)
}

fn write_response(path: &Path, response: &Value) -> Result<(), BoxError> {
    std::fs::write(path, serde_json::to_vec(response)?)?;
    tracing::info!(path = %path.display(), "response saved");
    Ok(())
}

async fn run_async(config: ClientConfig, demo: &DemoSettings) -> Result<(), BoxError> {
    let client = MemoryClient::with_config(config)?;
    let result = exchange(&client, demo).await;
    client.close();
    write_response(&demo.output_dir.join("response_asynchronous.json"), &result?)
}

fn run_blocking(config: ClientConfig, demo: &DemoSettings) -> Result<(), BoxError> {
    let client = BlockingMemoryClient::with_config(config)?;
    let result = exchange_blocking(&client, demo);
    client.close();
    write_response(&demo.output_dir.join("response_synchronous.json"), &result?)
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    let demo = DemoSettings::from_env();
    tracing::info!(base_url = %config.base_url, user_id = %demo.user_id, "memory demo starting");

    // The blocking client refuses to run inside a runtime, so the async pass
    // gets its own runtime that is gone before the blocking pass starts.
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_async(config.clone(), &demo))?;
    drop(runtime);

    run_blocking(config, &demo)?;
    Ok(())
}
