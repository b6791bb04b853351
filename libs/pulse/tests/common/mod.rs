//! Common test utilities for monitor integration tests
//!
//! Scripted sources, recording sinks and a minimal HTTP server for the
//! upstream clients.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use pulse::domain::{AlertEvent, AssetSnapshot, LocationSnapshot};
use pulse::infrastructure::client::SourceResult;
use pulse::infrastructure::sink::{SinkError, SinkResult};
use pulse::infrastructure::{AlertRecorder, AlertSink, MonitorConfig, PriceSource, SourceError, WeatherSource};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Config with only the given assets and locations and no live clients
pub fn test_config(assets: &[&str], locations: &[&str]) -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.assets = assets.iter().map(|s| s.to_string()).collect();
    config.locations = locations.iter().map(|s| s.to_string()).collect();
    config.coingecko.enabled = false;
    config
}

pub fn asset(id: &str, price: f64, change: f64) -> AssetSnapshot {
    let mut name = id.to_string();
    name[..1].make_ascii_uppercase();
    AssetSnapshot::new(id, name, id[..3].to_uppercase(), price, change)
}

pub fn reading(location: &str, temp: Option<f64>, code: Option<u16>, description: &str) -> LocationSnapshot {
    LocationSnapshot::new(location, temp, code, description)
}

// =============================================================================
// Sources
// =============================================================================

/// Price source answering from a mutable table, or failing on demand
#[derive(Default)]
pub struct MockPriceSource {
    markets: Mutex<HashMap<String, AssetSnapshot>>,
    failing: AtomicBool,
    delay: Mutex<Duration>,
    pub calls: AtomicUsize,
    pub completed: AtomicUsize,
}

impl MockPriceSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, snapshot: AssetSnapshot) {
        self.markets.lock().insert(snapshot.id.clone(), snapshot);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    fn name(&self) -> &str {
        "mock-prices"
    }

    async fn fetch_markets(&self, ids: &[String]) -> SourceResult<HashMap<String, AssetSnapshot>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Api("503 Service Unavailable".to_string()));
        }

        let markets = self.markets.lock();
        Ok(ids
            .iter()
            .filter_map(|id| markets.get(id).map(|s| (id.clone(), s.clone())))
            .collect())
    }
}

/// Weather source answering from a table; unknown locations fail
#[derive(Default)]
pub struct MockWeatherSource {
    readings: Mutex<HashMap<String, LocationSnapshot>>,
    pub calls: AtomicUsize,
}

impl MockWeatherSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, snapshot: LocationSnapshot) {
        self.readings.lock().insert(snapshot.id.clone(), snapshot);
    }

    pub fn remove(&self, location: &str) {
        self.readings.lock().remove(location);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for MockWeatherSource {
    fn name(&self) -> &str {
        "mock-weather"
    }

    async fn fetch_current(&self, location: &str) -> SourceResult<LocationSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.readings
            .lock()
            .get(location)
            .cloned()
            .ok_or_else(|| SourceError::Api(format!("404 city not found: {}", location)))
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Sink that keeps every notified event; optionally fails every call
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AlertEvent>>,
    failing: AtomicBool,
    pub notify_calls: AtomicUsize,
    pub permission_requests: AtomicUsize,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let sink = Self::default();
        sink.failing.store(true, Ordering::SeqCst);
        Arc::new(sink)
    }

    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().clone()
    }

    pub fn notify_calls(&self) -> usize {
        self.notify_calls.load(Ordering::SeqCst)
    }
}

impl AlertSink for RecordingSink {
    fn notify(&self, event: &AlertEvent) -> SinkResult<()> {
        self.notify_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Rejected("notification permission denied".to_string()));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }

    fn request_permission(&self) -> SinkResult<bool> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(!self.failing.load(Ordering::SeqCst))
    }
}

#[derive(Default)]
pub struct RecordingRecorder {
    events: Mutex<Vec<AlertEvent>>,
}

impl RecordingRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().clone()
    }
}

impl AlertRecorder for RecordingRecorder {
    fn record(&self, event: AlertEvent) -> SinkResult<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// A canned HTTP/1.1 server: every request gets the same response
pub struct MockHttpServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: Arc<Notify>,
}

impl MockHttpServer {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shutdown = Arc::new(Notify::new());
        let body = body.into();

        let requests_clone = Arc::clone(&requests);
        let shutdown_clone = Arc::clone(&shutdown);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        let Ok((mut stream, _)) = result else { break };
                        let requests = Arc::clone(&requests_clone);
                        let body = body.clone();
                        tokio::spawn(async move {
                            let mut buf = Vec::new();
                            let mut chunk = [0u8; 1024];
                            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                match stream.read(&mut chunk).await {
                                    Ok(0) | Err(_) => return,
                                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                                }
                            }
                            let head = String::from_utf8_lossy(&buf);
                            if let Some(line) = head.lines().next() {
                                requests.lock().push(line.to_string());
                            }

                            let response = format!(
                                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                status,
                                reason(status),
                                body.len(),
                                body
                            );
                            let _ = stream.write_all(response.as_bytes()).await;
                            let _ = stream.shutdown().await;
                        });
                    }
                    _ = shutdown_clone.notified() => break,
                }
            }
        });

        Self {
            addr,
            requests,
            shutdown,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request lines seen so far (e.g. "GET /weather?q=London HTTP/1.1")
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl Drop for MockHttpServer {
    fn drop(&mut self) {
        self.shutdown.notify_one();
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
