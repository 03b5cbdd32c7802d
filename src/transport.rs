use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::event::EventRecord;

/// Path appended to the collector base address
pub const LOG_EVENT_PATH: &str = "/log-event";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("collector request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("collector rejected event with status {0}")]
    Status(StatusCode),
}

/// Observes every delivery attempt made by [`HttpTransport`]. Purely
/// diagnostic: it cannot influence delivery.
pub type DeliveryObserver = Arc<dyn Fn(&EventRecord, &Result<(), TransportError>) + Send + Sync>;

/// Outbound channel for event records. `send` must never block the caller
/// and never report failure; delivery is best effort and at most once.
pub trait Transport {
    fn send(&self, record: EventRecord);
}

/// Full endpoint URL for a collector base address
pub fn collector_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), LOG_EVENT_PATH)
}

/// Posts records as JSON from a background worker thread.
///
/// Records are queued on an unbounded channel so the UI thread returns
/// immediately. Failures are logged and handed to the observer, never retried.
pub struct HttpTransport {
    tx: Sender<EventRecord>,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self::with_observer(base_url, timeout, None)
    }

    pub fn with_observer(
        base_url: &str,
        timeout: Duration,
        observer: Option<DeliveryObserver>,
    ) -> Self {
        let endpoint = collector_endpoint(base_url);
        let (tx, rx) = mpsc::channel::<EventRecord>();
        let worker_endpoint = endpoint.clone();

        let spawned = thread::Builder::new()
            .name("telemetry".to_string())
            .spawn(move || {
                let client = match Client::builder().timeout(timeout).build() {
                    Ok(client) => client,
                    Err(e) => {
                        warn!(error = %e, "telemetry disabled: could not build http client");
                        return;
                    }
                };

                for record in rx {
                    let result = post(&client, &worker_endpoint, &record);
                    match &result {
                        Ok(()) => debug!(event = %record.event_type, section = %record.section, "event delivered"),
                        Err(e) => warn!(event = %record.event_type, error = %e, "tracker: collector not available"),
                    }
                    if let Some(observer) = &observer {
                        observer(&record, &result);
                    }
                }
                debug!("telemetry worker stopped");
            });

        match spawned {
            Ok(_) => info!(endpoint = %endpoint, "telemetry enabled"),
            Err(e) => warn!(error = %e, "telemetry disabled: could not start worker"),
        }

        Self { tx, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn post(client: &Client, endpoint: &str, record: &EventRecord) -> Result<(), TransportError> {
    let response = client.post(endpoint).json(record).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status(status));
    }
    Ok(())
}

impl Transport for HttpTransport {
    fn send(&self, record: EventRecord) {
        if self.tx.send(record).is_err() {
            debug!("telemetry worker gone, dropping event");
        }
    }
}

/// Keeps every record in memory. Clones share the same buffer, so a test can
/// hold one handle while the tracker owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingTransport {
    records: Arc<Mutex<Vec<EventRecord>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn take(&self) -> Vec<EventRecord> {
        match self.records.lock() {
            Ok(mut records) => std::mem::take(&mut *records),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Transport for RecordingTransport {
    fn send(&self, record: EventRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

/// Discards everything; used when telemetry is switched off
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&self, record: EventRecord) {
        debug!(event = %record.event_type, "telemetry off, event discarded");
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, record: EventRecord) {
        (**self).send(record)
    }
}
