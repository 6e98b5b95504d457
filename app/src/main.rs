use adapter::web::WallpaperApi;
use habit::{CacheRefreshJob, HabitCache, WallpaperService};
use settings::Settings;

mod adapter;
mod core;
mod habit;
pub mod port;
mod settings;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings
        .monitoring
        .init()
        .expect("Error initializing monitoring");

    let client = settings
        .habitify
        .new_client()
        .expect("Error initializing Habitify client");

    let store = settings.cache.new_store().expect("Error initializing cache store");
    let cache = HabitCache::new(store);

    tracing::info!(
        "Using {} cache with TTL {}",
        cache.storage_name(),
        settings.cache.ttl_description()
    );

    let tracked = settings.habitify.tracked_habits.clone();
    let api = WallpaperApi::new(
        CacheRefreshJob::new(client.clone(), cache.clone(), tracked.clone()),
        WallpaperService::new(client, cache.clone(), tracked),
        cache,
        settings.wallpaper.clone(),
        settings.cache.ttl_description(),
    );

    settings
        .http_server
        .run_server(move || vec![api.clone().routes()])
        .await
        .expect("Error running HTTP server");
}
