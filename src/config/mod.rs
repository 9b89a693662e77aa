use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::error::ConfigError;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub editor: EditorConfig,
    pub features: FeatureFlags,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

// Настройки базы данных; без URL сервис работает на хранилище в памяти
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub pool_size: u32,
}

// Настройки Redis
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: Option<String>,
    pub layout_ttl_seconds: u64,
}

// Настройки редактора схемы зала
#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    /// Удержание кнопки дольше этого порога превращает нажатие в протягивание.
    pub long_press_ms: u64,
    /// Сколько правок хранит история отмены.
    pub history_limit: usize,
}

// Feature flags для включения/выключения функциональности
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_cache: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            environment: "development".to_string(),
            rust_log: "cinema_seating=debug,tower_http=debug".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: None, pool_size: 20 }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self { url: None, layout_ttl_seconds: 3600 }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { long_press_ms: 300, history_limit: 50 }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self { enable_cache: true }
    }
}

fn var_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();
        Ok(Config {
            app: AppConfig {
                host: var_or("HOST", defaults.app.host)?,
                port: var_or("PORT", defaults.app.port)?,
                environment: var_or("ENVIRONMENT", defaults.app.environment)?,
                rust_log: var_or("RUST_LOG", defaults.app.rust_log)?,
                log_format: var_or("LOG_FORMAT", defaults.app.log_format)?,
            },
            database: DatabaseConfig {
                url: optional_var("DATABASE_URL"),
                pool_size: var_or("DB_POOL_SIZE", defaults.database.pool_size)?,
            },
            redis: RedisConfig {
                url: optional_var("REDIS_URL"),
                layout_ttl_seconds: var_or("LAYOUT_CACHE_TTL_SECONDS", defaults.redis.layout_ttl_seconds)?,
            },
            editor: EditorConfig {
                long_press_ms: var_or("LONG_PRESS_MS", defaults.editor.long_press_ms)?,
                history_limit: var_or("HISTORY_LIMIT", defaults.editor.history_limit)?,
            },
            features: FeatureFlags {
                enable_cache: var_or("ENABLE_CACHE", defaults.features.enable_cache)?,
            },
        })
    }

    /// Кеш включён только при заданном REDIS_URL.
    pub fn cache_enabled(&self) -> bool {
        self.features.enable_cache && self.redis.url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn cache_needs_redis_url() {
        let mut config = Config::default();
        assert!(!config.cache_enabled());
        config.redis.url = Some("redis://localhost".to_string());
        assert!(config.cache_enabled());
        config.features.enable_cache = false;
        assert!(!config.cache_enabled());
    }

    #[test]
    fn unparsable_value_is_reported() {
        // имя переменной уникально для теста, чтобы не мешать остальным
        env::set_var("SEATING_TEST_BAD_NUMBER", "many");
        let result: Result<u32, _> = var_or("SEATING_TEST_BAD_NUMBER", 1);
        assert!(matches!(result, Err(ConfigError::Invalid { name: "SEATING_TEST_BAD_NUMBER", .. })));
        env::remove_var("SEATING_TEST_BAD_NUMBER");
    }
}
