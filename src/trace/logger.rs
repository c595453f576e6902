use std::{
    fs::OpenOptions,
    io::Write,
    sync::{
        Arc, Mutex,
        mpsc::{self, Receiver, Sender},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, warn};

use crate::trace::trace::TraceEvent;

/// Destination for telemetry records. Delivery failures are the sink's
/// problem: they are logged, never returned to the engine.
pub trait EventSink {
    fn emit(&self, event: &TraceEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: &TraceEvent) {
        (**self).emit(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&self, event: &TraceEvent) {
        (**self).emit(event)
    }
}

/// Drops every record.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &TraceEvent) {}
}

/// Appends one JSON object per line to a file.
pub struct JsonlSink {
    file: Option<Mutex<std::fs::File>>,
}

impl JsonlSink {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                warn!(path, error = %e, "could not open trace file");
                Self { file: None }
            }
        }
    }
}

impl EventSink for JsonlSink {
    fn emit(&self, event: &TraceEvent) {
        let file_mutex = match &self.file {
            Some(f) => f,
            None => return, // tracing disabled
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "failed to serialize trace event");
                return;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, "trace file lock poisoned");
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            warn!(error = %e, "failed to write trace event");
        }
    }
}

/// Upper bound on a single bridge POST.
pub const BRIDGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Posts each record as JSON to a bridge endpoint.
///
/// Records are queued to a `telemetry-bridge` thread, so `emit` never waits
/// on the network. Dropping the sink closes the queue and waits for the
/// records already queued to be delivered or time out.
pub struct HttpSink {
    endpoint: String,
    queue: Option<Sender<TraceEvent>>,
    worker: Option<JoinHandle<()>>,
}

impl HttpSink {
    pub fn new(endpoint: &str) -> Self {
        Self::with_timeout(endpoint, BRIDGE_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let target = endpoint.to_string();
        let spawned = thread::Builder::new()
            .name("telemetry-bridge".into())
            .spawn(move || deliver(&target, timeout, rx));

        match spawned {
            Ok(worker) => Self {
                endpoint: endpoint.to_string(),
                queue: Some(tx),
                worker: Some(worker),
            },
            Err(e) => {
                warn!(endpoint, error = %e, "failed to start bridge worker, bridge disabled");
                Self {
                    endpoint: endpoint.to_string(),
                    queue: None,
                    worker: None,
                }
            }
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn deliver(endpoint: &str, timeout: Duration, queue: Receiver<TraceEvent>) {
    let client = match reqwest::blocking::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!(endpoint, error = %e, "failed to build bridge client, bridge disabled");
            return;
        }
    };

    for event in queue {
        let result = client
            .post(endpoint)
            .json(&event)
            .send()
            .and_then(|r| r.error_for_status());

        if let Err(e) = result {
            warn!(endpoint, event = event.kind(), error = %e, "bridge delivery failed");
        }
    }
}

impl EventSink for HttpSink {
    fn emit(&self, event: &TraceEvent) {
        let Some(queue) = &self.queue else {
            return;
        };
        if queue.send(event.clone()).is_err() {
            debug!(endpoint = %self.endpoint, event = event.kind(), "bridge worker gone, record dropped");
        }
    }
}

impl Drop for HttpSink {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop once it drains.
        self.queue.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(endpoint = %self.endpoint, "bridge worker panicked");
            }
        }
    }
}

/// Keeps records in memory.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<TraceEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// `event` tags in emission order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(TraceEvent::kind).collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &TraceEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Sends every record to each inner sink.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn EventSink + Send>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl EventSink + Send + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: &TraceEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}
