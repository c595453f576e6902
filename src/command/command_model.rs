use serde::{Deserialize, Serialize};

use crate::{error::EngineError, gesture::dispatcher::ActionOutcome};

/// A method-style invocation from the controlling application.
///
/// Wire form is a JSON object tagged by `method`, e.g.
/// `{"method": "performScroll", "direction": "up", "scrollAmount": 300}`.
/// Missing arguments take the same defaults as the host's method channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum Command {
    PerformVirtualTouch {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    PerformScroll {
        #[serde(default = "default_direction")]
        direction: String,
        #[serde(rename = "scrollAmount", default)]
        scroll_amount: Option<u32>,
    },
    #[serde(alias = "performType")]
    PerformTextInput {
        #[serde(default)]
        text: String,
    },
    CheckAccessibilityServiceStatus,
    SetHintEnabled {
        #[serde(default)]
        enabled: bool,
    },
}

fn default_direction() -> String {
    "down".to_string()
}

impl Command {
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        serde_json::from_str(raw).map_err(|e| EngineError::InvalidCommand {
            payload: raw.to_string(),
            source: e,
        })
    }

    pub fn method(&self) -> &'static str {
        match self {
            Command::PerformVirtualTouch { .. } => "performVirtualTouch",
            Command::PerformScroll { .. } => "performScroll",
            Command::PerformTextInput { .. } => "performTextInput",
            Command::CheckAccessibilityServiceStatus => "checkAccessibilityServiceStatus",
            Command::SetHintEnabled { .. } => "setHintEnabled",
        }
    }
}

/// Final, serializable result of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CommandResult {
    Outcome(ActionOutcome),
    Status(bool),
    Ack,
}
