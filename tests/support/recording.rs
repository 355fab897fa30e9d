use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use lydwatch::error::{Error, Result};
use lydwatch::port::inbound::Subscriber;
use parking_lot::Mutex;

/// Subscriber that keeps every frame it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingSubscriber {
    frames: Arc<Mutex<Vec<String>>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().clone()
    }

    pub fn events(&self) -> Vec<serde_json::Value> {
        self.frames()
            .iter()
            .map(|f| serde_json::from_str(f).expect("frame is JSON"))
            .collect()
    }
}

#[async_trait]
impl Subscriber for RecordingSubscriber {
    async fn send(&self, text: &str) -> Result<()> {
        self.frames.lock().push(text.to_string());
        Ok(())
    }
}

/// Subscriber whose connection is gone.
#[derive(Debug, Default, Clone)]
pub struct FailingSubscriber {
    attempts: Arc<AtomicUsize>,
}

impl FailingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Subscriber for FailingSubscriber {
    async fn send(&self, _text: &str) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::Send("connection reset".into()))
    }
}
