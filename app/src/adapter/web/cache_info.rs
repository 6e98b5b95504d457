use actix_web::{HttpResponse, web};
use infrastructure::meter;
use serde::Serialize;

use crate::core::time::Duration;
use crate::habit::{CacheState, describe_cache_state};
use crate::port::{KeyValueStore, StatusSource};

use super::{UPDATE_URL, WallpaperApi};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheInfoResponse {
    cached: bool,
    last_updated: String,
    last_updated_relative: Option<String>,
    cache_age_minutes: Option<i64>,
    cache_age_formatted: String,
    habits_count: usize,
    habits_data_count: usize,
    total_statuses: usize,
    storage: &'static str,
    ttl: String,
    update_url: &'static str,
}

impl CacheInfoResponse {
    fn new(state: CacheState, storage: &'static str, ttl: String) -> Self {
        Self {
            cached: state.cached,
            last_updated: state
                .last_updated
                .map(|ts| ts.to_iso_string())
                .unwrap_or_else(|| "Never".to_owned()),
            last_updated_relative: state.last_updated.map(|ts| ts.to_human_readable()),
            cache_age_minutes: state.age_minutes,
            cache_age_formatted: state
                .age_minutes
                .map(|minutes| format!("{} ago", Duration::minutes(minutes)))
                .unwrap_or_else(|| "No cache".to_owned()),
            habits_count: state.habits_count,
            habits_data_count: state.habits_data_count,
            total_statuses: state.total_statuses,
            storage,
            ttl,
            update_url: UPDATE_URL,
        }
    }
}

pub async fn cache_info<C, S>(api: web::Data<WallpaperApi<C, S>>) -> HttpResponse
where
    C: StatusSource + 'static,
    S: KeyValueStore + 'static,
{
    match describe_cache_state(&api.cache).await {
        Ok(state) => {
            if let Some(age) = state.age_minutes {
                meter::set("habit_cache_age_minutes", age as f64, &[]);
            }

            HttpResponse::Ok().json(CacheInfoResponse::new(
                state,
                api.cache.storage_name(),
                api.ttl_description.clone(),
            ))
        }
        Err(e) => {
            tracing::error!("Error reading cache state: {:?}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("{:#}", e),
                "cached": false,
            }))
        }
    }
}
