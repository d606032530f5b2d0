use std::sync::Arc;

use nrvenest_profile_api::{config::Config, http::handler::health, init_tracing};
use vercel_runtime::{run, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cors = Arc::new(Config::from_env()?.cors);
    run(move |req| {
        let cors = Arc::clone(&cors);
        async move { health(&cors, &req) }
    })
    .await
}
