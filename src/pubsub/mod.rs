//! Подсистема Publish–Subscribe (pub/sub).
//!
//! Этот модуль реализует внутрипроцессный реестр подписок: издатели
//! публикуют сообщения по имени, не зная получателей, а подписчики
//! регистрируют свои точки доставки по точному имени или glob-шаблону.
//!
//! - `endpoint`: трейт точки доставки и реализации для `tokio::sync::mpsc`.
//! - `pattern` (приватный): компиляция и сопоставление glob-шаблонов.
//! - `registry`: таблицы подписок, ограничение подписчиков и доставка.
//!
//! Публичный API переэкспортирует:
//! - `endpoint::*`
//! - `registry::*`
//! - `pattern::{pattern_matches, validate_pattern}`

pub mod endpoint;
mod pattern;
pub mod registry;

pub use endpoint::*;
pub use pattern::{pattern_matches, validate_pattern};
pub use registry::*;
