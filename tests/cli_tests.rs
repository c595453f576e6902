use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use screen_hinting::cli::commands::{cmd_exec, cmd_inspect, cmd_replay, format_inspect, to_json};
use screen_hinting::cli::config::{
    AppConfig, Cli, Commands, build_engine_config, build_sink, display_metrics, load_config,
};
use screen_hinting::cli::script::{load_screen, load_script};
use screen_hinting::command::command_model::CommandResult;
use screen_hinting::error::EngineError;
use screen_hinting::gesture::dispatcher::ActionOutcome;
use screen_hinting::gesture::gesture_builder::ScrollDirection;
use screen_hinting::platform::gesture::{DisplayMetrics, Point};
use screen_hinting::platform::recorded::PlatformAction;
use screen_hinting::router::router_model::RouterState;
use screen_hinting::trace::logger::{EventSink, FanoutSink, HttpSink, JsonlSink};
use screen_hinting::trace::trace::TraceEvent;
use tempfile::NamedTempFile;

mod common;
use crate::common::{fixture, ms};

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn path_of(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_inspect_minimal() {
    let cli = Cli::parse_from(["screen-hinting", "inspect", "--screen", "home.yaml"]);
    match cli.command {
        Commands::Inspect { screen, format } => {
            assert_eq!(screen, "home.yaml");
            assert_eq!(format, "text");
        }
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn cli_parse_exec_repeated_commands() {
    let cli = Cli::parse_from([
        "screen-hinting",
        "exec",
        "--screen",
        "home.yaml",
        "--command",
        r#"{"method":"performScroll"}"#,
        "--command",
        r#"{"method":"checkAccessibilityServiceStatus"}"#,
        "--cancel-gestures",
    ]);
    match cli.command {
        Commands::Exec {
            screen,
            commands,
            cancel_gestures,
        } => {
            assert_eq!(screen, "home.yaml");
            assert_eq!(commands.len(), 2);
            assert!(cancel_gestures);
        }
        _ => panic!("Expected Exec command"),
    }
}

#[test]
fn cli_exec_requires_a_command() {
    let result = Cli::try_parse_from(["screen-hinting", "exec", "--screen", "home.yaml"]);
    assert!(result.is_err());
}

#[test]
fn cli_parse_global_flags() {
    let cli = Cli::parse_from([
        "screen-hinting",
        "-vv",
        "--trace-file",
        "trace.jsonl",
        "--bridge-url",
        "http://127.0.0.1:5000/events",
        "replay",
        "--script",
        "s.yaml",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.trace_file.as_deref(), Some("trace.jsonl"));
    assert_eq!(cli.bridge_url.as_deref(), Some("http://127.0.0.1:5000/events"));
    assert!(matches!(cli.command, Commands::Replay { .. }));
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_load_missing_file() {
    let config = load_config(Some("nonexistent_file_that_does_not_exist.yaml"));
    assert_eq!(config.engine.debounce_ms, 500);
    assert!(!config.engine.hints_enabled);
    assert_eq!(config.display.width, 1080);
}

#[test]
fn config_default_values() {
    let engine = build_engine_config(&AppConfig::default().engine);
    assert_eq!(engine.debounce, ms(500));
    assert_eq!(engine.tap_duration_ms, 100);
    assert_eq!(engine.swipe_duration_ms, 500);
    assert_eq!(engine.default_scroll_amount, 300);
    assert_eq!(engine.hint_offset, 10);
    assert!(!engine.hints_enabled);
}

#[test]
fn config_partial_yaml_from_file() {
    let file = temp_file(
        r#"
engine:
  debounce_ms: 250
  hints_enabled: true
display:
  height: 1600
"#,
    );
    let config = load_config(Some(path_of(&file)));

    assert_eq!(config.engine.debounce_ms, 250);
    assert!(config.engine.hints_enabled);
    assert_eq!(config.engine.tap_duration_ms, 100, "Unset fields keep defaults");
    assert_eq!(
        display_metrics(&config.display),
        DisplayMetrics {
            width: 1080,
            height: 1600
        }
    );
    assert!(config.telemetry.trace_file.is_none());
}

#[test]
fn config_malformed_file_falls_back_to_defaults() {
    let file = temp_file("engine: [this is not a map");
    let config = load_config(Some(path_of(&file)));
    assert_eq!(config.engine.debounce_ms, 500);
}

#[test]
fn config_yaml_roundtrip() {
    let config = AppConfig::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed.engine.debounce_ms, config.engine.debounce_ms);
    assert_eq!(parsed.display.height, config.display.height);
}

// ============================================================================
// Telemetry sinks
// ============================================================================

#[test]
fn build_sink_prefers_cli_flags() {
    let config = AppConfig::default();
    assert!(build_sink(&config.telemetry, None, None).is_empty());

    let dir = tempfile::tempdir().unwrap();
    let from_flag = dir.path().join("flag.jsonl");
    let from_config = dir.path().join("config.jsonl");

    let mut config = AppConfig::default();
    config.telemetry.trace_file = Some(from_config.display().to_string());

    let sink = build_sink(&config.telemetry, from_flag.to_str(), None);
    sink.emit(&TraceEvent::scroll(ScrollDirection::Down, 300, None));

    assert!(from_flag.exists());
    assert!(!from_config.exists(), "CLI flag wins over config");
}

#[test]
fn jsonl_sink_appends_one_object_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let path_str = path.to_str().unwrap();

    let sink = JsonlSink::new(path_str);
    sink.emit(&TraceEvent::scroll(ScrollDirection::Up, 300, None));
    sink.emit(&TraceEvent::virtual_touch(1.0, 2.0, Some(ActionOutcome::Success)));
    drop(sink);

    // Reopening appends.
    JsonlSink::new(path_str).emit(&TraceEvent::click(None));

    let content = std::fs::read_to_string(&path).unwrap();
    let records: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["event"], "scroll");
    assert_eq!(records[0]["direction"], "up");
    assert_eq!(records[0]["amount"], 300);
    assert_eq!(records[1]["event"], "virtual_touch");
    assert_eq!(records[2]["event"], "click");
    assert!(records[2]["timestamp_ms"].is_number());
}

#[test]
fn jsonl_sink_with_bad_path_is_silent() {
    let sink = JsonlSink::new("/nonexistent-dir/trace.jsonl");
    sink.emit(&TraceEvent::click(None));
}

#[test]
fn http_sink_posts_each_record_as_json() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/events", listener.local_addr().unwrap());

    let bridge = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !String::from_utf8_lossy(&request).contains(r#""event":"click""#) {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
            .unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    let sink = HttpSink::new(&url);
    sink.emit(&TraceEvent::click(None));
    drop(sink);

    let request = bridge.join().unwrap();
    assert!(request.starts_with("POST /events"), "Got {}", request);
    assert!(request.contains(r#""event":"click""#));
}

#[test]
fn http_sink_emit_does_not_wait_for_the_bridge() {
    // Connections queue in the backlog and are never answered.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/events", listener.local_addr().unwrap());
    let sink = HttpSink::with_timeout(&url, ms(200));

    let started = Instant::now();
    for _ in 0..3 {
        sink.emit(&TraceEvent::scroll(ScrollDirection::Down, 300, None));
    }
    assert!(
        started.elapsed() < ms(100),
        "emit returned after {:?}",
        started.elapsed()
    );

    // Each queued POST gives up at the timeout.
    let flushing = Instant::now();
    drop(sink);
    assert!(flushing.elapsed() < Duration::from_secs(5));
    drop(listener);
}

// ============================================================================
// Screens and scripts
// ============================================================================

#[test]
fn load_screen_reads_yaml_and_json() {
    let yaml = load_screen(&fixture("ok_icon_screen.yaml")).unwrap();
    assert_eq!(yaml.display.map(|d| d.height), Some(1000));
    assert_eq!(yaml.root.as_ref().map(|r| r.node_count()), Some(4));

    let json = temp_file(
        r#"{"root": {"class_name": "Frame", "children": [{"text": "Go", "clickable": true, "enabled": true}]}}"#,
    );
    let screen = load_screen(path_of(&json)).unwrap();
    let root = screen.root.unwrap();
    assert!(screen.display.is_none());
    assert!(root.children[0].capabilities.clickable);
    assert!(!root.children[0].capabilities.editable);
}

#[test]
fn load_screen_errors_name_the_file() {
    match load_screen("missing-screen.yaml") {
        Err(EngineError::Io { path, .. }) => assert_eq!(path, "missing-screen.yaml"),
        other => panic!("Expected Io error, got {:?}", other),
    }

    let broken = temp_file("root: [1, 2");
    assert!(matches!(
        load_screen(path_of(&broken)),
        Err(EngineError::Yaml { .. })
    ));
}

#[test]
fn load_script_reads_steps() {
    let script = load_script(&fixture("replay_script.yaml")).unwrap();
    assert_eq!(script.hints_enabled, Some(true));
    assert_eq!(script.screens.len(), 2);
    assert_eq!(script.steps.len(), 7);
    assert_eq!(script.steps[3].screen.as_deref(), Some("settings"));
    assert_eq!(
        script.steps[6].command.as_ref().map(|c| c.method()),
        Some("performTextInput")
    );
}

// ============================================================================
// Subcommands
// ============================================================================

#[test]
fn inspect_reports_clickable_surface_and_hints() {
    let report = cmd_inspect(&fixture("ok_icon_screen.yaml"), &AppConfig::default()).unwrap();

    assert_eq!(report.node_count, 4);
    assert_eq!(report.clickable.len(), 2);
    assert!(report.editable.is_empty());
    assert_eq!(
        report.signature.as_str(),
        "3a7a47b6e5b309583f07f0a7bbfc8e574914fb90"
    );

    let hints: Vec<(i32, i32, &str)> = report
        .hints
        .iter()
        .map(|h| (h.x, h.y, h.text.as_str()))
        .collect();
    assert_eq!(hints, vec![(10, 40, "\"OK\""), (70, 40, "\"icon\"")]);

    let text = format_inspect(&report);
    assert!(text.contains("Clickable (2):"));
    assert!(text.contains("\"OK\" at (10, 40)"));
    assert!(to_json(&report).unwrap().contains("\"signature\""));
}

#[test]
fn exec_runs_commands_against_screen() {
    let commands = vec![
        r#"{"method":"performScroll","direction":"up"}"#.to_string(),
        r#"{"method":"performType","text":"hello"}"#.to_string(),
        r#"{"method":"checkAccessibilityServiceStatus"}"#.to_string(),
        r#"{"method":"setHintEnabled","enabled":true}"#.to_string(),
    ];
    let report = cmd_exec(
        &fixture("ok_icon_screen.yaml"),
        &commands,
        false,
        &AppConfig::default(),
        FanoutSink::new(),
    )
    .unwrap();

    let results: Vec<Option<CommandResult>> = report.results.iter().map(|r| r.result).collect();
    assert_eq!(
        results,
        vec![
            Some(CommandResult::Outcome(ActionOutcome::Success)),
            Some(CommandResult::Outcome(ActionOutcome::NoTarget)),
            Some(CommandResult::Status(true)),
            Some(CommandResult::Ack),
        ]
    );

    // Screen is 400x1000 per the fixture.
    let [PlatformAction::Gesture { gesture }] = report.actions.as_slice() else {
        panic!("Expected only the scroll gesture, got {:?}", report.actions);
    };
    assert_eq!(gesture.strokes[0].path.start(), Some(Point::new(200.0, 750.0)));
    assert_eq!(gesture.strokes[0].path.end(), Some(Point::new(200.0, 250.0)));

    assert_eq!(report.hints, vec!["\"OK\"", "\"icon\""]);
    assert_eq!(report.events, vec!["scroll", "screen_analysis"]);
}

#[test]
fn exec_can_cancel_gestures() {
    let commands = vec![r#"{"method":"performVirtualTouch","x":15,"y":20}"#.to_string()];
    let report = cmd_exec(
        &fixture("ok_icon_screen.yaml"),
        &commands,
        true,
        &AppConfig::default(),
        FanoutSink::new(),
    )
    .unwrap();

    assert_eq!(
        report.results[0].result,
        Some(CommandResult::Outcome(ActionOutcome::Cancelled))
    );
}

#[test]
fn exec_rejects_bad_command_before_running_anything() {
    let commands = vec![
        r#"{"method":"performScroll"}"#.to_string(),
        "{oops".to_string(),
    ];
    let result = cmd_exec(
        &fixture("ok_icon_screen.yaml"),
        &commands,
        false,
        &AppConfig::default(),
        FanoutSink::new(),
    );
    assert!(matches!(result, Err(EngineError::InvalidCommand { .. })));
}

#[test]
fn replay_runs_debounced_cycles_on_virtual_clock() {
    let report = cmd_replay(
        &fixture("replay_script.yaml"),
        &AppConfig::default(),
        FanoutSink::new(),
    )
    .unwrap();

    assert_eq!(report.steps, 7);
    // Three events coalesce into one cycle on "home", then one on "settings".
    assert_eq!(report.refresh_cycles, 2);
    assert_eq!(report.final_state, RouterState::Idle);
    assert_eq!(report.hints, vec!["\"Wi-Fi\"", "\"Bluetooth\""]);
    assert_eq!(report.events, vec!["screen_analysis", "scroll", "screen_analysis"]);

    let results: Vec<(&str, Option<CommandResult>)> =
        report.results.iter().map(|r| (r.method, r.result)).collect();
    assert_eq!(
        results,
        vec![
            ("performScroll", Some(CommandResult::Outcome(ActionOutcome::Success))),
            ("performTextInput", Some(CommandResult::Outcome(ActionOutcome::Success))),
        ]
    );
}

#[test]
fn replay_without_hints_never_refreshes() {
    let file = temp_file(
        r#"
screens:
  home:
    children:
      - { text: OK, clickable: true, enabled: true, bounds: { x: 0, y: 0, width: 10, height: 10 } }
initial: home
steps:
  - { at_ms: 0, event: window_content_changed }
  - { at_ms: 50, event: view_clicked }
"#,
    );
    let report = cmd_replay(path_of(&file), &AppConfig::default(), FanoutSink::new()).unwrap();

    assert_eq!(report.refresh_cycles, 0);
    assert_eq!(report.final_state, RouterState::Disabled);
    assert_eq!(report.events, vec!["click"]);
    assert!(report.hints.is_empty());
}

#[test]
fn replay_unknown_screen_is_an_error() {
    let file = temp_file(
        r#"
screens: {}
steps:
  - { at_ms: 0, screen: nowhere }
"#,
    );
    match cmd_replay(path_of(&file), &AppConfig::default(), FanoutSink::new()) {
        Err(EngineError::UnknownScreen(name)) => assert_eq!(name, "nowhere"),
        other => panic!("Expected UnknownScreen, got {:?}", other.map(|r| r.steps)),
    }
}
