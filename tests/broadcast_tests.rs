mod support;

use std::sync::Arc;

use chrono::Utc;
use lydwatch::application::broadcast::BroadcastHub;
use lydwatch::domain::{CurrencyPair, LiveEvent, ParsedTick, PriceType, TickRecord};
use support::recording::{FailingSubscriber, RecordingSubscriber};

fn tick(price: f64) -> TickRecord {
    let parsed = ParsedTick::try_new(CurrencyPair::usd_lyd(), price, PriceType::Mid).unwrap();
    TickRecord::from_parsed(parsed, Utc::now(), "ewanlibya", "raw", None)
}

#[tokio::test]
async fn dead_subscriber_is_evicted_once() {
    let hub = BroadcastHub::new();
    let a = RecordingSubscriber::new();
    let b = RecordingSubscriber::new();
    let dead = FailingSubscriber::new();
    hub.connect(Arc::new(a.clone()));
    let dead_id = hub.connect(Arc::new(dead.clone()));
    hub.connect(Arc::new(b.clone()));

    let report = hub.publish_price(&tick(7.1)).await.unwrap();
    assert_eq!(report.delivered, 2);
    assert_eq!(report.evicted, 1);
    assert!(!hub.is_connected(dead_id));

    let report = hub.publish_price(&tick(7.2)).await.unwrap();
    assert_eq!(report.delivered, 2);
    assert_eq!(report.evicted, 0);
    assert_eq!(dead.attempts(), 1);

    assert_eq!(a.frames(), b.frames());
    let prices: Vec<f64> = a
        .events()
        .iter()
        .map(|e| e["data"]["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![7.1, 7.2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn membership_changes_during_broadcast_are_safe() {
    let hub = Arc::new(BroadcastHub::new());
    let steady = RecordingSubscriber::new();
    hub.connect(Arc::new(steady.clone()));

    let churn: Vec<_> = (0..4)
        .map(|_| {
            let hub = hub.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    let id = hub.connect(Arc::new(RecordingSubscriber::new()));
                    tokio::task::yield_now().await;
                    hub.disconnect(id);
                }
            })
        })
        .collect();

    let publisher = {
        let hub = hub.clone();
        tokio::spawn(async move {
            for _ in 0..50 {
                hub.broadcast(&LiveEvent::connected(Utc::now())).await.unwrap();
            }
        })
    };

    for task in churn {
        task.await.unwrap();
    }
    publisher.await.unwrap();

    assert_eq!(hub.len(), 1);
    assert_eq!(steady.frames().len(), 50);
}
