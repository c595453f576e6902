use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::{
    gesture::gesture_builder::{
        DEFAULT_SCROLL_AMOUNT, DEFAULT_SWIPE_DURATION_MS, DEFAULT_TAP_DURATION_MS,
    },
    hints::hint_model::DEFAULT_HINT_OFFSET,
    platform::{gesture::DisplayMetrics, recorded::DEFAULT_DISPLAY},
    router::router_model::{DEFAULT_DEBOUNCE_MS, EngineConfig},
    trace::logger::{FanoutSink, HttpSink, JsonlSink},
};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "screen-hinting",
    version,
    about = "Drive the UI automation and hinting engine against recorded screens"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: screen-hinting.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append telemetry records to this JSONL file
    #[arg(long, global = true)]
    pub trace_file: Option<String>,

    /// POST telemetry records to this URL
    #[arg(long, global = true)]
    pub bridge_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what the engine sees on a recorded screen
    Inspect {
        /// Recorded screen file (YAML or JSON)
        #[arg(long)]
        screen: String,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run commands against a recorded screen
    Exec {
        /// Recorded screen file (YAML or JSON)
        #[arg(long)]
        screen: String,

        /// Command as JSON, e.g. '{"method":"performScroll","direction":"up"}'
        #[arg(long = "command", required = true)]
        commands: Vec<String>,

        /// Report dispatched gestures as cancelled instead of completed
        #[arg(long, default_value_t = false)]
        cancel_gestures: bool,
    },

    /// Replay a timed script of UI events, screen changes and commands
    Replay {
        /// Replay script file (YAML)
        #[arg(long)]
        script: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `screen-hinting.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_tap_duration_ms")]
    pub tap_duration_ms: u64,

    #[serde(default = "default_swipe_duration_ms")]
    pub swipe_duration_ms: u64,

    #[serde(default = "default_scroll_amount")]
    pub default_scroll_amount: u32,

    #[serde(default = "default_hint_offset")]
    pub hint_offset: i32,

    #[serde(default)]
    pub hints_enabled: bool,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            tap_duration_ms: DEFAULT_TAP_DURATION_MS,
            swipe_duration_ms: DEFAULT_SWIPE_DURATION_MS,
            default_scroll_amount: DEFAULT_SCROLL_AMOUNT,
            hint_offset: DEFAULT_HINT_OFFSET,
            hints_enabled: false,
        }
    }
}

/// Screen size used when a recorded screen does not carry its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            width: DEFAULT_DISPLAY.width,
            height: DEFAULT_DISPLAY.height,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetrySection {
    pub trace_file: Option<String>,
    pub bridge_url: Option<String>,
}

// Serde default helpers
fn default_debounce_ms() -> u64 { DEFAULT_DEBOUNCE_MS }
fn default_tap_duration_ms() -> u64 { DEFAULT_TAP_DURATION_MS }
fn default_swipe_duration_ms() -> u64 { DEFAULT_SWIPE_DURATION_MS }
fn default_scroll_amount() -> u32 { DEFAULT_SCROLL_AMOUNT }
fn default_hint_offset() -> i32 { DEFAULT_HINT_OFFSET }
fn default_width() -> u32 { DEFAULT_DISPLAY.width }
fn default_height() -> u32 { DEFAULT_DISPLAY.height }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("screen-hinting.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "malformed config, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

pub fn build_engine_config(section: &EngineSection) -> EngineConfig {
    EngineConfig {
        debounce: Duration::from_millis(section.debounce_ms),
        tap_duration_ms: section.tap_duration_ms,
        swipe_duration_ms: section.swipe_duration_ms,
        default_scroll_amount: section.default_scroll_amount,
        hint_offset: section.hint_offset,
        hints_enabled: section.hints_enabled,
    }
}

pub fn display_metrics(section: &DisplaySection) -> DisplayMetrics {
    DisplayMetrics {
        width: section.width,
        height: section.height,
    }
}

/// Telemetry sinks from config, with CLI flags taking precedence.
pub fn build_sink(
    telemetry: &TelemetrySection,
    trace_file: Option<&str>,
    bridge_url: Option<&str>,
) -> FanoutSink {
    let mut sink = FanoutSink::new();
    if let Some(path) = trace_file.or(telemetry.trace_file.as_deref()) {
        sink = sink.with(JsonlSink::new(path));
    }
    if let Some(url) = bridge_url.or(telemetry.bridge_url.as_deref()) {
        sink = sink.with(HttpSink::new(url));
    }
    sink
}

/// Install the fmt subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
