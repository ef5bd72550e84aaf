use thiserror::Error;

/// Ошибка регистрации подписки.
///
/// Единственная ошибка, которую может вернуть изменяющая операция реестра.
/// Таблица подписок при этом остаётся без изменений.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    #[error("subscriber limit ({limit}) exceeded for '{key}'")]
    MaxSubscribersExceeded { key: String, limit: usize },
}

/// Ошибка разбора glob-шаблона.
///
/// Реестр такие шаблоны молча игнорирует при публикации; ошибку
/// возвращает только [`crate::validate_pattern`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

// === Преобразования ===

impl From<globset::Error> for PatternError {
    fn from(err: globset::Error) -> Self {
        PatternError::InvalidPattern {
            pattern: err.glob().unwrap_or_default().to_string(),
            reason: err.kind().to_string(),
        }
    }
}
