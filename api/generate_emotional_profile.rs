use std::sync::Arc;

use nrvenest_profile_api::{
    clients::openai::OpenAiClient,
    config::Config,
    http::handler::{handler, AppState},
    init_tracing,
};
use vercel_runtime::{run, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env()?;
    let client = OpenAiClient::new(&config);
    tracing::info!(
        model = %client.model(),
        base_url = %config.base_url,
        timeout_secs = config.upstream_timeout.as_secs(),
        "emotional profile endpoint starting"
    );

    let state = Arc::new(AppState::new(Arc::new(client), config.cors.clone()));
    run(move |req| {
        let state = Arc::clone(&state);
        async move { handler(&state, req).await }
    })
    .await
}
