#![allow(dead_code)]

pub mod screens;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use screen_hinting::platform::recorded::{RecordedNode, RecordedOverlay, RecordedPlatform};
use screen_hinting::router::event_router::EventRouter;
use screen_hinting::router::router_model::EngineConfig;
use screen_hinting::trace::logger::MemorySink;

pub type TestRouter = EventRouter<RecordedPlatform, RecordedOverlay>;

pub fn fixture(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    path.display().to_string()
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Default timings with hinting switched on.
pub fn hints_on() -> EngineConfig {
    EngineConfig {
        hints_enabled: true,
        ..EngineConfig::default()
    }
}

pub fn router_with(root: Option<RecordedNode>, config: &EngineConfig) -> (TestRouter, Arc<MemorySink>) {
    let memory = Arc::new(MemorySink::new());
    let router = EventRouter::new(
        screens::platform(root),
        RecordedOverlay::new(),
        Box::new(memory.clone()),
        config,
    );
    (router, memory)
}
