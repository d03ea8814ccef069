#![allow(dead_code)]

use renovalink_content::{ClientConfig, ContentClient, MemoryCache};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use wiremock::MockServer;

pub const T0: i64 = 1_700_000_000;

/// Test clock shared with the client; advance it to expire cache entries.
#[derive(Clone)]
pub struct TestClock(Arc<AtomicI64>);

impl TestClock {
    pub fn advance(&self, secs: i64) { self.0.fetch_add(secs, Ordering::SeqCst); }
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig { base_url: format!("{}/wp-json", server.uri()), timeout_secs: 5, ..ClientConfig::default() }
}

pub fn client_with(config: ClientConfig) -> (ContentClient, TestClock) {
    let now = Arc::new(AtomicI64::new(T0));
    let clock = TestClock(now.clone());
    let client = ContentClient::new(config, Arc::new(MemoryCache::new()))
        .unwrap()
        .with_clock(Arc::new(move || now.load(Ordering::SeqCst)));
    (client, clock)
}

pub fn client(server: &MockServer) -> ContentClient { client_with(config_for(server)).0 }

pub fn item(id: u64, slug: &str) -> Value {
    json!({
        "id": id,
        "slug": slug,
        "title": {"rendered": format!("Item {id}")},
        "content": {"rendered": "<p>body</p>"},
        "excerpt": {"rendered": "<p>excerpt</p>"},
        "date": "2024-03-01T10:00:00",
        "modified": "2024-03-02T10:00:00",
        "status": "publish",
        "featured_media": 0,
        "acf": []
    })
}

pub fn item_with_acf(id: u64, slug: &str, acf: Value) -> Value {
    let mut v = item(id, slug);
    v["acf"] = acf;
    v
}

pub fn media(id: u64) -> Value {
    json!({
        "id": id,
        "source_url": format!("https://cdn.example.com/{id}.jpg"),
        "alt_text": format!("image {id}"),
        "title": {"rendered": format!("Image {id}")},
        "mime_type": "image/jpeg",
        "media_details": {"width": 800, "height": 600}
    })
}
