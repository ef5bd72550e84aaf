use std::env;

use serde::{Deserialize, Serialize};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Настройки логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Уровень для событий этого крейта: `trace` … `error`
    pub level: String,
    /// JSON вместо человекочитаемого формата
    pub json: bool,
    /// Цветной вывод в консоль
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Переменная `PUBSUB_LOG_LEVEL` перекрывает уровень из конфигурации.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("PUBSUB_LOG_LEVEL") {
            self.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let level = self.level.to_ascii_lowercase();
        if LEVELS.contains(&level.as_str()) {
            Ok(())
        } else {
            Err(format!(
                "invalid log level '{}', expected one of: {}",
                self.level,
                LEVELS.join(", ")
            ))
        }
    }

    /// Директива для `EnvFilter`, например `"pubsub_registry=debug"`.
    pub fn build_filter_directive(&self) -> String {
        format!(
            "{}={}",
            env!("CARGO_CRATE_NAME"),
            self.level.to_ascii_lowercase()
        )
    }
}
