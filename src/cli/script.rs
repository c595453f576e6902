use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{
    command::command_model::Command,
    error::EngineError,
    platform::{
        gesture::DisplayMetrics,
        recorded::{RecordedNode, RecordedScreen},
    },
    router::router_model::UiEventKind,
};

/// Timed replay of what a foreign app and a controller did.
///
/// ```yaml
/// hints_enabled: true
/// screens:
///   home: { class_name: FrameLayout, children: [...] }
/// initial: home
/// steps:
///   - { at_ms: 0, event: window_state_changed }
///   - { at_ms: 100, screen: settings, event: window_content_changed }
///   - { at_ms: 900, command: { method: performScroll, direction: up } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub display: Option<DisplayMetrics>,

    /// Overrides the engine config's `hints_enabled`.
    #[serde(default)]
    pub hints_enabled: Option<bool>,

    #[serde(default)]
    pub screens: BTreeMap<String, RecordedNode>,

    /// Screen active at time zero. No active window when absent.
    #[serde(default)]
    pub initial: Option<String>,

    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

/// Everything present in a step happens at `at_ms`, in field order:
/// screen swap, UI event, command, gesture completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayStep {
    pub at_ms: u64,

    #[serde(default)]
    pub screen: Option<String>,

    /// Remove the active window.
    #[serde(default)]
    pub no_window: bool,

    #[serde(default)]
    pub event: Option<UiEventKind>,

    #[serde(default)]
    pub command: Option<Command>,

    /// Finish pending gestures: `true` completed, `false` cancelled.
    #[serde(default)]
    pub complete_gestures: Option<bool>,
}

impl ReplayScript {
    pub fn screen(&self, name: &str) -> Result<&RecordedNode, EngineError> {
        self.screens
            .get(name)
            .ok_or_else(|| EngineError::UnknownScreen(name.to_string()))
    }
}

fn read(path: &str) -> Result<String, EngineError> {
    std::fs::read_to_string(path).map_err(|e| EngineError::Io {
        path: path.to_string(),
        source: e,
    })
}

/// Load a recorded screen. JSON dumps load too, as YAML is a superset.
pub fn load_screen(path: &str) -> Result<RecordedScreen, EngineError> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|e| EngineError::Yaml {
        path: path.to_string(),
        source: e,
    })
}

pub fn load_script(path: &str) -> Result<ReplayScript, EngineError> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|e| EngineError::Yaml {
        path: path.to_string(),
        source: e,
    })
}
