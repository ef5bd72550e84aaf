use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::{pattern::Pattern, Endpoint};
use crate::{config::RegistryConfig, error::SubscribeError};

/// Реестр с точками доставки на основе ограниченных `mpsc`-каналов.
pub type ChannelRegistry<M> = Registry<mpsc::Sender<M>>;

/// Реестр подписок Publish/Subscribe.
///
/// Поддерживает:
/// - Точные подписки по имени канала
/// - Подписки по шаблонам (glob), в порядке добавления
/// - Ограничение числа подписчиков на ключ
/// - Автоматическое удаление ключей без подписчиков
/// - Неблокирующую доставку: переполненная точка доставки теряет сообщение
///
/// Обе таблицы защищены одной блокировкой чтения/записи: изменения
/// подписок исключают друг друга и публикацию, публикации идут параллельно.
pub struct Registry<E: Endpoint> {
    tables: RwLock<Tables<E>>,
    /// Предел подписчиков на ключ; `None` означает без ограничений
    limit: Option<usize>,
    /// Общее количество вызовов `publish`
    pub publish_count: AtomicUsize,
    /// Количество успешных доставок
    pub delivered_count: AtomicUsize,
    /// Количество отброшенных доставок (буфер заполнен или закрыт)
    pub dropped_count: AtomicUsize,
}

struct Tables<E> {
    /// Точные каналы → точки доставки
    channels: HashMap<String, Vec<E>>,
    /// Шаблоны → точки доставки, в порядке первой подписки
    patterns: Vec<PatternEntry<E>>,
}

struct PatternEntry<E> {
    pattern: Pattern,
    endpoints: Vec<E>,
}

impl<E: Endpoint> Registry<E> {
    /// Создаёт пустой реестр. `max_subscribers <= 0` снимает ограничение.
    pub fn new(max_subscribers: i64) -> Self {
        let limit = usize::try_from(max_subscribers).ok().filter(|&n| n > 0);
        Self {
            tables: RwLock::new(Tables {
                channels: HashMap::new(),
                patterns: Vec::new(),
            }),
            limit,
            publish_count: AtomicUsize::new(0),
            delivered_count: AtomicUsize::new(0),
            dropped_count: AtomicUsize::new(0),
        }
    }

    /// Реестр без ограничения числа подписчиков.
    pub fn unlimited() -> Self {
        Self::new(0)
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.max_subscribers)
    }

    /// Действующий предел подписчиков на ключ.
    pub fn max_subscribers(&self) -> Option<usize> {
        self.limit
    }

    /// Подписка на конкретный канал (точное совпадение).
    ///
    /// Повторная подписка той же точки доставки ничего не меняет.
    /// Nil-дескриптор игнорируется.
    pub fn subscribe(&self, name: &str, endpoint: &E) -> Result<(), SubscribeError> {
        if endpoint.is_nil() {
            return Ok(());
        }
        let mut tables = self.tables.write();
        let count = match tables.channels.get_mut(name) {
            Some(endpoints) => self.attach(name, endpoints, endpoint)?,
            None => {
                tables.channels.insert(name.to_string(), vec![endpoint.clone()]);
                1
            }
        };
        debug!(channel = name, subscribers = count, "subscribed");
        Ok(())
    }

    /// Отписка точки доставки от канала.
    ///
    /// Отсутствующий канал или точка доставки не считается ошибкой. Пустой канал
    /// удаляется.
    pub fn unsubscribe(&self, name: &str, endpoint: &E) {
        if endpoint.is_nil() {
            return;
        }
        let mut tables = self.tables.write();
        let Some(endpoints) = tables.channels.get_mut(name) else {
            return;
        };
        endpoints.retain(|e| !e.same_endpoint(endpoint));
        let remaining = endpoints.len();
        if remaining == 0 {
            tables.channels.remove(name);
        }
        debug!(channel = name, subscribers = remaining, "unsubscribed");
    }

    /// Подписка по шаблону (glob), например `"news.*"` или `"a?c"`.
    ///
    /// Шаблон сохраняется как есть: некорректный шаблон не даёт ошибки,
    /// а просто никогда не совпадает при публикации.
    pub fn psubscribe(&self, pattern: &str, endpoint: &E) -> Result<(), SubscribeError> {
        if endpoint.is_nil() {
            return Ok(());
        }
        let mut tables = self.tables.write();
        let count = match tables
            .patterns
            .iter_mut()
            .find(|entry| entry.pattern.as_str() == pattern)
        {
            Some(entry) => self.attach(pattern, &mut entry.endpoints, endpoint)?,
            None => {
                tables.patterns.push(PatternEntry {
                    pattern: Pattern::new(pattern),
                    endpoints: vec![endpoint.clone()],
                });
                1
            }
        };
        debug!(pattern, subscribers = count, "psubscribed");
        Ok(())
    }

    /// Отписка точки доставки от шаблона. Пустой шаблон удаляется.
    pub fn punsubscribe(&self, pattern: &str, endpoint: &E) {
        if endpoint.is_nil() {
            return;
        }
        let mut tables = self.tables.write();
        let Some(pos) = tables
            .patterns
            .iter()
            .position(|entry| entry.pattern.as_str() == pattern)
        else {
            return;
        };
        let endpoints = &mut tables.patterns[pos].endpoints;
        endpoints.retain(|e| !e.same_endpoint(endpoint));
        let remaining = endpoints.len();
        if remaining == 0 {
            // `remove`, а не `swap_remove`: порядок шаблонов сохраняется
            tables.patterns.remove(pos);
        }
        debug!(pattern, subscribers = remaining, "punsubscribed");
    }

    /// Публикация сообщения в канал.
    ///
    /// Работает в два этапа:
    /// 1. Доставляет подписчикам точного канала (если есть)
    /// 2. Доставляет подписчикам каждого совпавшего шаблона, в порядке
    ///    добавления шаблонов
    ///
    /// Точка доставки, подписанная обоими способами, получает сообщение
    /// несколько раз. Доставка никогда не блокирует: если буфер точки
    /// доставки заполнен, сообщение для неё отбрасывается.
    pub fn publish(&self, name: &str, message: E::Message)
    where
        E::Message: Clone,
    {
        self.publish_count.fetch_add(1, Ordering::Relaxed);
        let tables = self.tables.read();

        // 1) точное совпадение
        if let Some(endpoints) = tables.channels.get(name) {
            self.deliver(name, endpoints, &message);
        }

        // 2) по шаблону
        for entry in &tables.patterns {
            if entry.pattern.is_match(name) {
                self.deliver(name, &entry.endpoints, &message);
            }
        }
    }

    /// Количество подписчиков точного канала.
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.tables.read().channels.get(name).map_or(0, Vec::len)
    }

    /// Количество подписчиков шаблона.
    pub fn pattern_subscriber_count(&self, pattern: &str) -> usize {
        self.tables
            .read()
            .patterns
            .iter()
            .find(|entry| entry.pattern.as_str() == pattern)
            .map_or(0, |entry| entry.endpoints.len())
    }

    pub fn contains_channel(&self, name: &str) -> bool {
        self.tables.read().channels.contains_key(name)
    }

    pub fn contains_pattern(&self, pattern: &str) -> bool {
        self.tables
            .read()
            .patterns
            .iter()
            .any(|entry| entry.pattern.as_str() == pattern)
    }

    pub fn is_subscribed(&self, name: &str, endpoint: &E) -> bool {
        self.tables
            .read()
            .channels
            .get(name)
            .is_some_and(|endpoints| endpoints.iter().any(|e| e.same_endpoint(endpoint)))
    }

    pub fn is_psubscribed(&self, pattern: &str, endpoint: &E) -> bool {
        self.tables
            .read()
            .patterns
            .iter()
            .find(|entry| entry.pattern.as_str() == pattern)
            .is_some_and(|entry| entry.endpoints.iter().any(|e| e.same_endpoint(endpoint)))
    }

    /// Снимок имён точных каналов (порядок не определён).
    pub fn channels(&self) -> Vec<String> {
        self.tables.read().channels.keys().cloned().collect()
    }

    /// Снимок шаблонов в порядке добавления.
    pub fn patterns(&self) -> Vec<String> {
        self.tables
            .read()
            .patterns
            .iter()
            .map(|entry| entry.pattern.as_str().to_string())
            .collect()
    }

    /// Добавляет точку доставки в существующий список ключа.
    ///
    /// Возвращает итоговое число подписчиков. Дубликат не добавляется;
    /// при достижении предела список не меняется.
    fn attach(
        &self,
        key: &str,
        endpoints: &mut Vec<E>,
        endpoint: &E,
    ) -> Result<usize, SubscribeError> {
        if endpoints.iter().any(|e| e.same_endpoint(endpoint)) {
            return Ok(endpoints.len());
        }
        if let Some(limit) = self.limit {
            if endpoints.len() >= limit {
                debug!(key, limit, "subscriber limit reached");
                return Err(SubscribeError::MaxSubscribersExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }
        endpoints.push(endpoint.clone());
        Ok(endpoints.len())
    }

    fn deliver(&self, name: &str, endpoints: &[E], message: &E::Message)
    where
        E::Message: Clone,
    {
        for endpoint in endpoints {
            if endpoint.try_deliver(message.clone()) {
                self.delivered_count.fetch_add(1, Ordering::Relaxed);
            } else {
                self.dropped_count.fetch_add(1, Ordering::Relaxed);
                trace!(channel = name, "endpoint not ready, message dropped");
            }
        }
    }
}

impl<E: Endpoint> Default for Registry<E> {
    fn default() -> Self {
        Self::unlimited()
    }
}
