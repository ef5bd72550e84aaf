use serde::{Deserialize, Serialize};

use config::{Config, ConfigError, Environment};

use crate::logging::LoggingConfig;

/// Настройки реестра подписок.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Предел подписчиков на канал или шаблон; `<= 0` означает без ограничений.
    #[serde(default)]
    pub max_subscribers: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Загружает настройки: значения по умолчанию, затем переменные
    /// окружения с префиксом `PUBSUB_` (вложенность через `__`), например
    /// `PUBSUB_REGISTRY__MAX_SUBSCRIBERS=8`.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = LoggingConfig::default();
        let cfg = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("registry.max_subscribers", 0)?
            .set_default("logging.level", defaults.level)?
            .set_default("logging.json", defaults.json)?
            .set_default("logging.ansi", defaults.ansi)?
            // Добавляем переменные окружения с префиксом PUBSUB_
            .add_source(
                Environment::with_prefix("PUBSUB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Десериализуем конфигурацию в нашу структуру
        cfg.try_deserialize()
    }
}
