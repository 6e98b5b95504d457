use config::{Config, ConfigError, Environment, File};
use infrastructure::{HttpServerConfig, MonitoringConfig};
use serde::Deserialize;

use crate::adapter::habitify::Habitify;
use crate::adapter::store::CacheSettings;
use crate::adapter::web::WallpaperSettings;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub http_server: HttpServerConfig,
    pub monitoring: MonitoringConfig,
    pub habitify: Habitify,
    pub cache: CacheSettings,
    #[serde(default)]
    pub wallpaper: WallpaperSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(File::with_name("config.toml"))
    }

    fn load(file: impl config::Source + Send + Sync + 'static) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(file).add_source(
            //HABIT_WALL_HABITIFY__API_KEY, HABIT_WALL_HABITIFY__TRACKED_HABITS=a,b
            Environment::with_prefix("HABIT_WALL")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("habitify.tracked_habits")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::HabitId;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Settings::load(File::from_str(toml, FileFormat::Toml))
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let settings = from_toml(
            r#"
            [http_server]
            port = 8080

            [monitoring]
            service_name = "habit-wall"

            [habitify]
            api_key = "secret"
            tracked_habits = ["h1", "h2"]

            [cache]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(settings.http_server.port, 8080);
        assert_eq!(settings.http_server.host, "0.0.0.0");
        assert_eq!(settings.habitify.url, "https://api.habitify.me");
        assert_eq!(settings.habitify.timeout_secs, 10);
        assert_eq!(settings.habitify.tracked_habits, vec![HabitId::new("h1"), HabitId::new("h2")]);
        assert!(matches!(settings.cache, CacheSettings::Memory { ttl_hours: 24 }));
        assert_eq!(settings.wallpaper.width, 1284);
        assert_eq!(settings.wallpaper.height, 2778);
        assert_eq!(settings.wallpaper.days, 30);
    }

    #[test]
    fn upstash_backend_is_selected_by_tag() {
        let settings = from_toml(
            r#"
            [http_server]
            port = 8080

            [monitoring]
            service_name = "habit-wall"

            [habitify]
            api_key = "secret"

            [cache]
            backend = "upstash"
            url = "https://example.upstash.io"
            token = "token"
            ttl_hours = 12

            [wallpaper]
            days = 14
            "#,
        )
        .unwrap();

        assert!(settings.habitify.tracked_habits.is_empty());
        assert_eq!(settings.cache.ttl_description(), "12 hours");
        assert_eq!(settings.wallpaper.days, 14);
        assert_eq!(settings.wallpaper.width, 1284);
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let result = from_toml(
            r#"
            [http_server]
            port = 8080

            [monitoring]
            service_name = "habit-wall"

            [habitify]

            [cache]
            backend = "memory"
            "#,
        );

        assert!(result.is_err());
    }
}
