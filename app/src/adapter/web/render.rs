use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, ContentType};
use actix_web::{HttpResponse, ResponseError, web};
use derive_more::derive::{Display, Error, From};
use serde::Deserialize;

use crate::habit::{WallpaperError, WallpaperService};
use crate::port::{KeyValueStore, StatusSource};
use crate::t;

use super::template::{self, Wallpaper};
use super::{UPDATE_URL, WallpaperApi, WallpaperSettings, parse_param};

const NO_STORE: &str = "no-cache, no-store, must-revalidate";

#[derive(Debug, Deserialize)]
pub struct RenderQuery {
    width: Option<String>,
    height: Option<String>,
    days: Option<String>,
    live: Option<String>,
}

struct RenderRequest {
    width: u32,
    height: u32,
    days: i64,
    live: bool,
}

impl RenderRequest {
    fn from_query(query: &RenderQuery, settings: &WallpaperSettings) -> Self {
        Self {
            width: parse_param::<u32>(&query.width)
                .filter(|w| *w > 0)
                .unwrap_or(settings.width),
            height: parse_param::<u32>(&query.height)
                .filter(|h| *h > 0)
                .unwrap_or(settings.height),
            days: parse_param::<i64>(&query.days).unwrap_or(settings.days),
            live: query
                .live
                .as_deref()
                .map(|v| !matches!(v.trim(), "false" | "0"))
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Display, Error, From)]
pub struct RenderError(WallpaperError);

impl ResponseError for RenderError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            WallpaperError::NoCache => StatusCode::SERVICE_UNAVAILABLE,
            WallpaperError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        tracing::warn!("Error rendering wallpaper: {:?}", self);

        let body = match self.0 {
            WallpaperError::NoCache => template::html::no_cache_page(UPDATE_URL),
            WallpaperError::Store(_) => template::html::error_page(&self.to_string()),
        };

        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .insert_header((CACHE_CONTROL, NO_STORE))
            .body(body)
    }
}

pub async fn wall_html<C, S>(
    api: web::Data<WallpaperApi<C, S>>,
    query: web::Query<RenderQuery>,
) -> Result<HttpResponse, RenderError>
where
    C: StatusSource + 'static,
    S: KeyValueStore + 'static,
{
    let request = RenderRequest::from_query(&query, &api.settings);
    let markup = render(&api.wallpaper, &request, template::html::render).await?;
    Ok(respond(ContentType::html(), markup))
}

pub async fn wallpaper_cached_html<C, S>(
    api: web::Data<WallpaperApi<C, S>>,
    query: web::Query<RenderQuery>,
) -> Result<HttpResponse, RenderError>
where
    C: StatusSource + 'static,
    S: KeyValueStore + 'static,
{
    let request = RenderRequest {
        live: false,
        ..RenderRequest::from_query(&query, &api.settings)
    };
    let markup = render(&api.wallpaper, &request, template::html::render).await?;
    Ok(respond(ContentType::html(), markup))
}

pub async fn wallpaper_svg<C, S>(
    api: web::Data<WallpaperApi<C, S>>,
    query: web::Query<RenderQuery>,
) -> Result<HttpResponse, RenderError>
where
    C: StatusSource + 'static,
    S: KeyValueStore + 'static,
{
    let request = RenderRequest::from_query(&query, &api.settings);
    let markup = render(&api.wallpaper, &request, template::svg::render).await?;
    Ok(respond(ContentType(mime::IMAGE_SVG), markup))
}

async fn render<C, S>(
    service: &WallpaperService<C, S>,
    request: &RenderRequest,
    template: fn(&Wallpaper) -> String,
) -> Result<String, WallpaperError>
where
    C: StatusSource,
    S: KeyValueStore,
{
    let habits = service.current_wallpaper(request.days, request.live).await?;
    let wallpaper = Wallpaper::new(&habits, request.width, request.height, t!(today));
    Ok(template(&wallpaper))
}

fn respond(content_type: ContentType, body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((CACHE_CONTROL, NO_STORE))
        .body(body)
}
