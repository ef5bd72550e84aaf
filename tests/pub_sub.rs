use std::{
    sync::{atomic::Ordering, Arc},
    time::Duration,
};

use bytes::Bytes;
use tokio::{sync::mpsc, time::timeout};

use pubsub_registry::{ChannelRegistry, Registry, SubscribeError};

/// Тест проверяет сценарий с точными и шаблонными подписчиками:
/// подписчики читают сообщения в отдельных задачах и получают ровно
/// то, что им адресовано.
#[tokio::test]
async fn test_exact_and_pattern_subscribers() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(ChannelRegistry::<Bytes>::unlimited());

    let (abc, mut abc_rx) = mpsc::channel(1);
    let (ab_any, mut ab_any_rx) = mpsc::channel(2);
    let (cde, mut cde_rx) = mpsc::channel(1);
    let (cd_any1, mut cd_any1_rx) = mpsc::channel(2);
    let (cd_any2, mut cd_any2_rx) = mpsc::channel(2);

    registry.subscribe("abc", &abc)?;
    registry.psubscribe("ab*", &ab_any)?;
    registry.subscribe("cde", &cde)?;
    registry.psubscribe("cd?", &cd_any1)?;
    registry.psubscribe("cd[e]", &cd_any2)?;

    let abc_task = tokio::spawn(async move { abc_rx.recv().await });
    let ab_any_task = tokio::spawn(async move {
        let first = ab_any_rx.recv().await;
        let second = ab_any_rx.recv().await;
        (first, second)
    });

    registry.publish("abc", Bytes::from("abc"));
    registry.publish("abd", Bytes::from("abd"));
    registry.publish("cde", Bytes::from("cde"));
    registry.publish("xyz", Bytes::from("xyz"));

    let wait = Duration::from_secs(1);
    assert_eq!(timeout(wait, abc_task).await??, Some(Bytes::from("abc")));
    let (first, second) = timeout(wait, ab_any_task).await??;
    assert_eq!(first, Some(Bytes::from("abc")));
    assert_eq!(second, Some(Bytes::from("abd")));

    assert_eq!(cde_rx.recv().await, Some(Bytes::from("cde")));
    assert_eq!(cd_any1_rx.recv().await, Some(Bytes::from("cde")));
    assert_eq!(cd_any2_rx.recv().await, Some(Bytes::from("cde")));

    // "xyz" не совпал ни с одной подпиской
    assert!(cde_rx.try_recv().is_err());
    assert!(cd_any1_rx.try_recv().is_err());
    assert!(cd_any2_rx.try_recv().is_err());
    assert_eq!(registry.publish_count.load(Ordering::Relaxed), 4);
    assert_eq!(registry.delivered_count.load(Ordering::Relaxed), 6);
    Ok(())
}

/// Тест проверяет, что публикация не ждёт подписчика, который не читает
/// свой буфер, даже когда тот заполнен.
#[tokio::test]
async fn test_publish_never_blocks() {
    let registry = ChannelRegistry::<&'static str>::unlimited();
    let (tx, mut rx) = mpsc::channel(1);
    registry.subscribe("nonblock", &tx).unwrap();

    let publish = async {
        for _ in 0..1000 {
            registry.publish("nonblock", "msg");
        }
    };
    timeout(Duration::from_secs(1), publish)
        .await
        .expect("publish blocked");

    assert_eq!(rx.recv().await, Some("msg"));
    assert!(rx.try_recv().is_err());
    assert_eq!(registry.dropped_count.load(Ordering::Relaxed), 999);
}

/// Тест проверяет, что после отписки сообщения перестают приходить,
/// а другие подписчики продолжают их получать.
#[tokio::test]
async fn test_unsubscribe_behavior() {
    let registry = ChannelRegistry::<Bytes>::new(2);
    let (tx1, mut rx1) = mpsc::channel(4);
    let (tx2, mut rx2) = mpsc::channel(4);
    registry.subscribe("unsub_channel", &tx1).unwrap();
    registry.subscribe("unsub_channel", &tx2).unwrap();

    registry.publish("unsub_channel", Bytes::from("before_unsub"));
    registry.unsubscribe("unsub_channel", &tx1);
    registry.publish("unsub_channel", Bytes::from("after_unsub"));

    assert_eq!(rx1.recv().await, Some(Bytes::from("before_unsub")));
    assert!(rx1.try_recv().is_err());
    assert_eq!(rx2.recv().await, Some(Bytes::from("before_unsub")));
    assert_eq!(rx2.recv().await, Some(Bytes::from("after_unsub")));

    // место освободилось, третий подписчик проходит
    let (tx3, _rx3) = mpsc::channel(4);
    registry.subscribe("unsub_channel", &tx3).unwrap();
    let (tx4, _rx4) = mpsc::channel(4);
    assert!(matches!(
        registry.subscribe("unsub_channel", &tx4),
        Err(SubscribeError::MaxSubscribersExceeded { limit: 2, .. })
    ));
}

/// Тест проверяет, что реестр не управляет жизненным циклом точек
/// доставки: закрытый приёмник остаётся в таблице, а сообщения для него
/// просто отбрасываются.
#[tokio::test]
async fn test_closed_receiver_stays_registered() {
    let registry = ChannelRegistry::<u32>::unlimited();
    let (tx, rx) = mpsc::channel(4);
    registry.psubscribe("metrics.*", &tx).unwrap();
    drop(rx);

    registry.publish("metrics.cpu", 1);
    assert!(registry.is_psubscribed("metrics.*", &tx));
    assert_eq!(registry.dropped_count.load(Ordering::Relaxed), 1);

    registry.punsubscribe("metrics.*", &tx);
    assert!(!registry.contains_pattern("metrics.*"));
}

/// Тест проверяет, что `*` не пересекает `/` в имени канала.
#[tokio::test]
async fn test_pattern_respects_separator() {
    let registry = ChannelRegistry::<&'static str>::unlimited();
    let (tx, mut rx) = mpsc::channel(4);
    registry.psubscribe("sensors/*", &tx).unwrap();

    registry.publish("sensors/temp", "flat");
    registry.publish("sensors/room/temp", "nested");

    assert_eq!(rx.recv().await, Some("flat"));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_unbounded_endpoints() {
    let registry = Registry::<mpsc::UnboundedSender<usize>>::unlimited();
    let (tx, mut rx) = mpsc::unbounded_channel();
    registry.subscribe("firehose", &tx).unwrap();

    for i in 0..100 {
        registry.publish("firehose", i);
    }
    for i in 0..100 {
        assert_eq!(rx.recv().await, Some(i));
    }
    assert_eq!(registry.dropped_count.load(Ordering::Relaxed), 0);
}
