use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use gallery::{
    loader::{GalleryLoader, ImageRecord},
    object_store::S3ObjectStore,
    types::Environment,
    Gallery,
};
use gallery_storage::{ExpirationSweep, Favorites, FileStore, LocalStore, SignedUrlCache};
use serde::Serialize;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Serialize)]
struct ListedImage<'a> {
    #[serde(flatten)]
    image: &'a ImageRecord,
    favorite: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    // Configure logging format based on environment
    // Use JSON format for production, regular format for development
    match environment {
        Environment::Production => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        Environment::Development => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await?));
    let object_store = Arc::new(S3ObjectStore::new(s3_client, environment.bucket_name()?));

    let local_store: Arc<dyn LocalStore> = Arc::new(FileStore::new(environment.storage_dir()));
    let cache = Arc::new(SignedUrlCache::load(local_store.clone()));
    let favorites = Arc::new(Favorites::load(local_store));

    let sweep = ExpirationSweep::new(cache.clone());
    let sweep_shutdown = sweep.shutdown_token();
    let sweep_handle = sweep.spawn();

    info!(
        "Loading gallery from bucket {} in {:?} environment",
        object_store.bucket_name(),
        environment
    );

    let gallery = Gallery::new(GalleryLoader::new(object_store, cache), favorites);
    gallery.refresh().await;

    let snapshot = gallery.snapshot();
    let listed: Vec<ListedImage<'_>> = snapshot
        .images
        .iter()
        .map(|image| ListedImage {
            image,
            favorite: gallery.is_favorite(&image.id),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&listed)?);

    sweep_shutdown.cancel();
    sweep_handle.await?;

    Ok(())
}
