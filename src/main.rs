use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use virtual_tryon::{router, AppState, Config, GeminiClient, ImageGenerator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if dotenv.is_err() {
        tracing::debug!("No .env file found, using process environment");
    }

    let config = Config::from_env();

    // Startup continues without a key; generation calls fail at the provider.
    if !config.gemini.has_api_key() {
        tracing::error!("Missing GEMINI_API_KEY environment variable.");
    }

    let gemini = GeminiClient::new(config.gemini.clone());
    tracing::info!("Using Gemini model {}", gemini.model());

    // One provider handle for the whole process, shared by every request.
    let generator: Arc<dyn ImageGenerator> = Arc::new(gemini);
    let app = router(AppState::from_arc(generator));

    let listener = TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("🚀 Server running on http://{}", listener.local_addr()?);
    tracing::info!("👕 Open in your browser to start trying on clothes!");

    axum::serve(listener, app).await?;

    Ok(())
}
