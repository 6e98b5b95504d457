mod cache_info;
mod refresh;
mod render;
mod template;

use std::str::FromStr;

use actix_web::web;
use serde::Deserialize;

use crate::habit::{CacheRefreshJob, HabitCache, WallpaperService};
use crate::port::{KeyValueStore, StatusSource};

const UPDATE_URL: &str = "/api/update-cache";

#[derive(Debug, Deserialize, Clone)]
pub struct WallpaperSettings {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default = "default_max_refresh_days")]
    pub max_refresh_days: i64,
}

//iPhone Pro Max lock screen
fn default_width() -> u32 {
    1284
}

fn default_height() -> u32 {
    2778
}

fn default_days() -> i64 {
    30
}

fn default_max_refresh_days() -> i64 {
    366
}

impl Default for WallpaperSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            days: default_days(),
            max_refresh_days: default_max_refresh_days(),
        }
    }
}

#[derive(Clone)]
pub struct WallpaperApi<C, S> {
    refresh_job: CacheRefreshJob<C, S>,
    wallpaper: WallpaperService<C, S>,
    cache: HabitCache<S>,
    settings: WallpaperSettings,
    ttl_description: String,
}

impl<C, S> WallpaperApi<C, S>
where
    C: StatusSource + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(
        refresh_job: CacheRefreshJob<C, S>,
        wallpaper: WallpaperService<C, S>,
        cache: HabitCache<S>,
        settings: WallpaperSettings,
        ttl_description: String,
    ) -> Self {
        Self {
            refresh_job,
            wallpaper,
            cache,
            settings,
            ttl_description,
        }
    }

    pub fn routes(self) -> actix_web::Scope {
        web::scope("/api")
            .route("/update-cache", web::get().to(refresh::update_cache::<C, S>))
            .route("/cache-info", web::get().to(cache_info::cache_info::<C, S>))
            .route("/wall", web::get().to(render::wall_html::<C, S>))
            .route("/wallpaper", web::get().to(render::wallpaper_cached_html::<C, S>))
            .route("/wallpaper-image", web::get().to(render::wallpaper_svg::<C, S>))
            .app_data(web::Data::new(self))
    }
}

//unparsable numbers fall back to the defaults instead of rejecting the request
fn parse_param<T: FromStr>(raw: &Option<String>) -> Option<T> {
    raw.as_deref().and_then(|v| v.trim().parse().ok())
}
