use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::port::{KeyValueStore, StatusSource};

use super::{WallpaperApi, parse_param};

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    days: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    success: bool,
    message: String,
    habits_count: usize,
    days_count: i64,
    total_records: usize,
    updated_at: String,
}

#[derive(Debug, Serialize)]
struct RefreshFailure {
    success: bool,
    error: String,
}

pub async fn update_cache<C, S>(api: web::Data<WallpaperApi<C, S>>, query: web::Query<RefreshQuery>) -> HttpResponse
where
    C: StatusSource + 'static,
    S: KeyValueStore + 'static,
{
    let days = parse_param::<i64>(&query.days).unwrap_or(api.settings.days);

    //an empty window would replace the cached history with nothing
    if days < 1 || days > api.settings.max_refresh_days {
        return HttpResponse::BadRequest().json(RefreshFailure {
            success: false,
            error: format!(
                "Between 1 and {} days can be refreshed",
                api.settings.max_refresh_days
            ),
        });
    }

    match api.refresh_job.refresh(days).await {
        Ok(blob) => HttpResponse::Ok().json(RefreshResponse {
            success: true,
            message: "Cache updated successfully".to_owned(),
            habits_count: blob.habits_data.len(),
            days_count: days,
            total_records: blob.total_records(),
            updated_at: blob.last_updated.to_iso_string(),
        }),
        Err(e) => {
            tracing::error!("Cache refresh failed: {:?}", e);
            HttpResponse::InternalServerError().json(RefreshFailure {
                success: false,
                error: e.to_string(),
            })
        }
    }
}
