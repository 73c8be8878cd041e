use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use gallery_backend::{image_storage::S3ObjectStore, server, types::Environment};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // JSON logs for staging/production, plain text for development
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let store = S3ObjectStore::new(s3_client, environment.s3_bucket());

    tracing::info!(
        bucket = store.bucket_name(),
        environment = ?environment,
        "Configured object store"
    );

    server::start(environment, Arc::new(store)).await
}
