use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gqlsub::auth::TokenClient;
use gqlsub::config::AppConfig;
use gqlsub::console::{ConsoleSseHandler, ConsoleSubscriptionObserver};
use gqlsub::graphql::GraphQlClient;
use gqlsub::sse::SseDispatcher;
use gqlsub::subscription::SubscriptionClient;

const DEFAULT_QUERY: &str = "query GetHello { hello }";
const DEFAULT_SUBSCRIPTION: &str = "subscription GetBeanCounter { beanCounter }";

fn usage() -> String {
    format!(
        "Usage: {} <query|sse|ws> [graphql-document]",
        std::env::args().next().unwrap_or_else(|| "gqlsub".to_string())
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mode = std::env::args().nth(1).ok_or_else(|| eyre!(usage()))?;
    let document = std::env::args().nth(2);

    let config = AppConfig::load_default()?;
    info!(endpoint = %config.endpoint, "loaded configuration");

    let mut client = GraphQlClient::new();
    if let Some(token_endpoint) = &config.token_endpoint {
        let application = config.application.as_deref().unwrap_or("gqlsub");
        let token = TokenClient::new(token_endpoint).fetch_token(application).await?;
        client = client.with_bearer_token(token);
    }

    // Ctrl-C flips the shutdown flag; both loops observe it at their next
    // block/message boundary.
    let shutdown = Arc::new(AtomicBool::new(false));
    let ctrlc_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        ctrlc_flag.store(true, Ordering::SeqCst);
    })?;

    match mode.as_str() {
        "query" => {
            let document = document.unwrap_or_else(|| DEFAULT_QUERY.to_string());
            let data = client.query(&config.endpoint, &document).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        "sse" => {
            let document = document.unwrap_or_else(|| DEFAULT_SUBSCRIPTION.to_string());
            let source = client.subscribe_sse(&config.endpoint, &document).await?;
            println!("SSE subscription started. Listening for events...");
            let mut handler = ConsoleSseHandler;
            let outcome = SseDispatcher::with_shutdown(source, shutdown)
                .run(&mut handler)
                .await?;
            info!(?outcome, "SSE dispatch finished");
        }
        "ws" => {
            let document = document.unwrap_or_else(|| DEFAULT_SUBSCRIPTION.to_string());
            let subscription = SubscriptionClient::new()
                .with_ack_timeout(config.ack_timeout())
                .with_shutdown(shutdown);
            let mut observer = ConsoleSubscriptionObserver;
            let reason = subscription
                .subscribe(&config.ws_endpoint(), &document, &mut observer)
                .await?;
            println!("Subscription terminated: {reason:?}");
        }
        other => return Err(eyre!("unknown mode '{other}'\n{}", usage())),
    }

    Ok(())
}
