use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::cli::config::{AppConfig, build_engine_config, display_metrics};
use crate::cli::script::{load_screen, load_script};
use crate::command::command_model::{Command, CommandResult};
use crate::command::handler::{CommandReply, handle_command};
use crate::element::element_model::ElementSnapshot;
use crate::element::predicate::ElementPredicate;
use crate::error::EngineError;
use crate::hints::overlay_manager::HintOverlayManager;
use crate::platform::gesture::GestureCompletion;
use crate::platform::overlay::OverlayParams;
use crate::platform::recorded::{PlatformAction, RecordedOverlay, RecordedPlatform};
use crate::router::event_router::EventRouter;
use crate::router::router_model::{EngineConfig, RouterState, UiEvent};
use crate::signature::screen_signature::ScreenSignature;
use crate::trace::logger::{EventSink, FanoutSink, MemorySink};
use crate::walker::tree_walker::{describe_tree, snapshot_elements};

pub type RecordedRouter = EventRouter<RecordedPlatform, RecordedOverlay>;

pub fn build_router(
    platform: RecordedPlatform,
    engine: &EngineConfig,
    sink: impl EventSink + Send + 'static,
) -> RecordedRouter {
    EventRouter::new(platform, RecordedOverlay::new(), Box::new(sink), engine)
}

// ============================================================================
// inspect subcommand
// ============================================================================

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub node_count: usize,
    pub signature: ScreenSignature,
    pub clickable: Vec<ElementSnapshot>,
    pub editable: Vec<ElementSnapshot>,
    pub scrollable: Vec<ElementSnapshot>,
    pub hints: Vec<OverlayParams>,
}

pub fn cmd_inspect(screen_path: &str, config: &AppConfig) -> Result<InspectReport, EngineError> {
    let screen = load_screen(screen_path)?;
    let platform = RecordedPlatform::from_screen(screen, display_metrics(&config.display));

    let clickable = snapshot_elements(&platform, ElementPredicate::ClickableEnabled);
    let signature = ScreenSignature::from_snapshots(&clickable);

    let mut preview = HintOverlayManager::new(RecordedOverlay::new(), config.engine.hint_offset);
    preview.refresh(&clickable);
    let hints = preview
        .surface()
        .views()
        .into_iter()
        .cloned()
        .collect();

    Ok(InspectReport {
        node_count: describe_tree(&platform).len(),
        signature,
        editable: snapshot_elements(&platform, ElementPredicate::Editable),
        scrollable: snapshot_elements(&platform, ElementPredicate::Scrollable),
        clickable,
        hints,
    })
}

pub fn format_inspect(report: &InspectReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Nodes: {}\n", report.node_count));
    out.push_str(&format!("Signature: {}\n", report.signature));

    for (name, elements) in [
        ("Clickable", &report.clickable),
        ("Editable", &report.editable),
        ("Scrollable", &report.scrollable),
    ] {
        out.push_str(&format!("{} ({}):\n", name, elements.len()));
        for el in elements {
            let b = el.bounds;
            out.push_str(&format!(
                "  - [{}] text={:?} desc={:?} @ ({}, {}, {}x{})\n",
                el.class_name, el.text, el.description, b.x, b.y, b.width, b.height
            ));
        }
    }

    out.push_str(&format!("Hints ({}):\n", report.hints.len()));
    for hint in &report.hints {
        out.push_str(&format!("  - {} at ({}, {})\n", hint.text, hint.x, hint.y));
    }
    out
}

// ============================================================================
// exec subcommand
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ExecResult {
    pub method: &'static str,
    /// `None` while a gesture is still pending.
    pub result: Option<CommandResult>,
}

#[derive(Debug, Serialize)]
pub struct ExecReport {
    pub results: Vec<ExecResult>,
    pub actions: Vec<PlatformAction>,
    pub hints: Vec<String>,
    pub events: Vec<&'static str>,
}

pub fn cmd_exec(
    screen_path: &str,
    commands: &[String],
    cancel_gestures: bool,
    config: &AppConfig,
    sink: FanoutSink,
) -> Result<ExecReport, EngineError> {
    let parsed = commands
        .iter()
        .map(|raw| Command::from_json(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let screen = load_screen(screen_path)?;
    let platform = RecordedPlatform::from_screen(screen, display_metrics(&config.display));
    let memory = Arc::new(MemorySink::new());
    let mut router = build_router(
        platform,
        &build_engine_config(&config.engine),
        sink.with(memory.clone()),
    );

    let completion = if cancel_gestures {
        GestureCompletion::Cancelled
    } else {
        GestureCompletion::Completed
    };

    let mut results = Vec::new();
    for command in &parsed {
        let mut reply = handle_command(&mut router, command);
        router.platform().complete_pending(completion);
        results.push(ExecResult {
            method: command.method(),
            result: reply.poll(),
        });
    }

    Ok(ExecReport {
        results,
        actions: router.platform().actions(),
        hints: router.hints().surface().texts(),
        events: memory.kinds(),
    })
}

// ============================================================================
// replay subcommand
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub steps: usize,
    pub refresh_cycles: u64,
    pub final_state: RouterState,
    pub hints: Vec<String>,
    pub events: Vec<&'static str>,
    pub results: Vec<ExecResult>,
}

pub fn cmd_replay(
    script_path: &str,
    config: &AppConfig,
    sink: FanoutSink,
) -> Result<ReplayReport, EngineError> {
    let script = load_script(script_path)?;

    let mut engine = build_engine_config(&config.engine);
    if let Some(enabled) = script.hints_enabled {
        engine.hints_enabled = enabled;
    }

    let initial = match &script.initial {
        Some(name) => Some(script.screen(name)?.clone()),
        None => None,
    };
    let metrics = script
        .display
        .unwrap_or_else(|| display_metrics(&config.display));

    let memory = Arc::new(MemorySink::new());
    let mut router = build_router(
        RecordedPlatform::new(initial, metrics),
        &engine,
        sink.with(memory.clone()),
    );

    // Virtual clock: step times are offsets from `base`.
    let base = Instant::now();
    let mut replies: Vec<(&'static str, CommandReply)> = Vec::new();
    let mut last_at = 0;

    for step in &script.steps {
        let now = base + Duration::from_millis(step.at_ms);
        last_at = last_at.max(step.at_ms);
        router.tick(now);

        if let Some(name) = &step.screen {
            router.platform().set_root(Some(script.screen(name)?.clone()));
        }
        if step.no_window {
            router.platform().set_root(None);
        }
        if let Some(kind) = step.event {
            router.on_event(&UiEvent::new(kind), now);
        }
        if let Some(command) = &step.command {
            replies.push((command.method(), handle_command(&mut router, command)));
        }
        if let Some(completed) = step.complete_gestures {
            router.platform().complete_pending(if completed {
                GestureCompletion::Completed
            } else {
                GestureCompletion::Cancelled
            });
        }
    }

    // Let a refresh scheduled by the last step run.
    router.tick(base + Duration::from_millis(last_at) + engine.debounce);

    let results = replies
        .into_iter()
        .map(|(method, mut reply)| ExecResult {
            method,
            result: reply.poll(),
        })
        .collect();

    Ok(ReplayReport {
        steps: script.steps.len(),
        refresh_cycles: router.refresh_cycles(),
        final_state: router.state(),
        hints: router.hints().surface().texts(),
        events: memory.kinds(),
        results,
    })
}

/// Pretty JSON for the exec and replay reports.
pub fn to_json<T: Serialize>(report: &T) -> Result<String, EngineError> {
    serde_json::to_string_pretty(report).map_err(|e| EngineError::JsonSerialize {
        context: "report".into(),
        source: e,
    })
}
