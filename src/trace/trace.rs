use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    element::element_model::{Bounds, ElementSnapshot},
    gesture::{dispatcher::ActionOutcome, gesture_builder::ScrollDirection},
    signature::screen_signature::ScreenSignature,
};

/// One telemetry record, serialized as a flat JSON object:
/// `{"timestamp_ms": .., "event": "scroll", "direction": "up", ..}`.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    #[serde(flatten)]
    pub payload: TracePayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TracePayload {
    Click {
        text: String,
        description: String,
        class_name: String,
        bounds: Option<Bounds>,
    },
    Scroll {
        direction: ScrollDirection,
        amount: u32,
        accepted: bool,
    },
    VirtualTouch {
        x: f32,
        y: f32,
        accepted: bool,
    },
    ScreenAnalysis {
        signature: ScreenSignature,
        changed: bool,
        clickable_count: usize,
        hint_count: usize,
        elements: Vec<ElementSummary>,
    },
}

/// What a `screen_analysis` record says about one clickable element.
#[derive(Debug, Clone, Serialize)]
pub struct ElementSummary {
    pub text: String,
    pub description: String,
    pub class_name: String,
    pub bounds: Bounds,
}

impl From<&ElementSnapshot> for ElementSummary {
    fn from(el: &ElementSnapshot) -> Self {
        Self {
            text: el.text.clone(),
            description: el.description.clone(),
            class_name: el.class_name.clone(),
            bounds: el.bounds,
        }
    }
}

impl TraceEvent {
    pub fn now(payload: TracePayload) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            payload,
        }
    }

    pub fn click(source: Option<&ElementSnapshot>) -> Self {
        let payload = match source {
            Some(el) => TracePayload::Click {
                text: el.text.clone(),
                description: el.description.clone(),
                class_name: el.class_name.clone(),
                bounds: Some(el.bounds),
            },
            None => TracePayload::Click {
                text: String::new(),
                description: String::new(),
                class_name: String::new(),
                bounds: None,
            },
        };
        Self::now(payload)
    }

    pub fn scroll(direction: ScrollDirection, amount: u32, outcome: Option<ActionOutcome>) -> Self {
        Self::now(TracePayload::Scroll {
            direction,
            amount,
            accepted: outcome != Some(ActionOutcome::Cancelled),
        })
    }

    pub fn virtual_touch(x: f32, y: f32, outcome: Option<ActionOutcome>) -> Self {
        Self::now(TracePayload::VirtualTouch {
            x,
            y,
            accepted: outcome != Some(ActionOutcome::Cancelled),
        })
    }

    pub fn screen_analysis(
        signature: &ScreenSignature,
        changed: bool,
        clickable: &[ElementSnapshot],
        hint_count: usize,
    ) -> Self {
        Self::now(TracePayload::ScreenAnalysis {
            signature: signature.clone(),
            changed,
            clickable_count: clickable.len(),
            hint_count,
            elements: clickable.iter().map(ElementSummary::from).collect(),
        })
    }

    /// `event` tag of this record.
    pub fn kind(&self) -> &'static str {
        match self.payload {
            TracePayload::Click { .. } => "click",
            TracePayload::Scroll { .. } => "scroll",
            TracePayload::VirtualTouch { .. } => "virtual_touch",
            TracePayload::ScreenAnalysis { .. } => "screen_analysis",
        }
    }
}
