use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    element::element_model::ElementSnapshot,
    gesture::gesture_builder::{
        DEFAULT_SCROLL_AMOUNT, DEFAULT_SWIPE_DURATION_MS, DEFAULT_TAP_DURATION_MS,
    },
    hints::hint_model::DEFAULT_HINT_OFFSET,
};

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouterState {
    Idle,
    /// A refresh is scheduled but has not run yet.
    PendingRefresh,
    /// Hinting is turned off.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiEventKind {
    WindowContentChanged,
    WindowStateChanged,
    ViewScrolled,
    ViewFocused,
    ViewSelected,
    ViewClicked,
    Other,
}

impl UiEventKind {
    /// Events that may change the clickable surface and so warrant a refresh.
    pub fn is_ui_change(&self) -> bool {
        matches!(
            self,
            UiEventKind::WindowContentChanged
                | UiEventKind::WindowStateChanged
                | UiEventKind::ViewScrolled
                | UiEventKind::ViewFocused
                | UiEventKind::ViewSelected
        )
    }
}

/// Screen-activity notification from the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    pub kind: UiEventKind,
    /// Snapshot of the element that raised the event, when the platform has one.
    pub source: Option<ElementSnapshot>,
}

impl UiEvent {
    pub fn new(kind: UiEventKind) -> Self {
        Self { kind, source: None }
    }

    pub fn clicked(source: ElementSnapshot) -> Self {
        Self {
            kind: UiEventKind::ViewClicked,
            source: Some(source),
        }
    }
}

/// Timing and layout knobs of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub debounce: Duration,
    pub tap_duration_ms: u64,
    pub swipe_duration_ms: u64,
    pub default_scroll_amount: u32,
    pub hint_offset: i32,
    /// Whether hinting is on when the engine starts.
    pub hints_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            tap_duration_ms: DEFAULT_TAP_DURATION_MS,
            swipe_duration_ms: DEFAULT_SWIPE_DURATION_MS,
            default_scroll_amount: DEFAULT_SCROLL_AMOUNT,
            hint_offset: DEFAULT_HINT_OFFSET,
            hints_enabled: false,
        }
    }
}
