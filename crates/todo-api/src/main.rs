use lambda_http::{run, service_fn, Error, Request};
use tracing_subscriber::EnvFilter;

use shared::{Config, TokenCodec};
use todo_api::{router, store};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    let codec = TokenCodec::new(&config.token_secret);
    let db = store::DynamoStore::new(&config.table_name).await;

    run(service_fn(move |req: Request| {
        let db = db.clone();
        let codec = codec.clone();
        async move { router::route(req, &db, &codec).await }
    }))
    .await
}
