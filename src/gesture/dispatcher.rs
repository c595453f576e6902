use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    element::predicate::ElementPredicate,
    gesture::gesture_builder::{
        DEFAULT_SCROLL_AMOUNT, DEFAULT_SWIPE_DURATION_MS, DEFAULT_TAP_DURATION_MS,
        ScrollDirection, swipe_gesture, tap_gesture,
    },
    platform::{
        gesture::{GestureCompletion, GestureDescription, GestureSink},
        node_tree::NodeTree,
    },
    walker::tree_walker::with_first_match,
};

/// Terminal result of a gesture or text operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Success,
    Cancelled,
    /// Nothing to act on (no editable element). Not an error.
    NoTarget,
}

impl From<GestureCompletion> for ActionOutcome {
    fn from(completion: GestureCompletion) -> Self {
        match completion {
            GestureCompletion::Completed => ActionOutcome::Success,
            GestureCompletion::Cancelled => ActionOutcome::Cancelled,
        }
    }
}

/// Single-shot receiver for an `ActionOutcome`.
///
/// Resolves exactly once. If the platform drops a gesture without ever
/// reporting on it, the outcome is `Cancelled`.
#[derive(Debug)]
pub struct PendingOutcome {
    rx: Receiver<ActionOutcome>,
    resolved: Option<ActionOutcome>,
}

impl PendingOutcome {
    fn channel() -> (mpsc::Sender<ActionOutcome>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx, resolved: None })
    }

    /// Already resolved.
    pub fn ready(outcome: ActionOutcome) -> Self {
        let (_tx, rx) = mpsc::channel();
        Self {
            rx,
            resolved: Some(outcome),
        }
    }

    /// Non-blocking check.
    pub fn poll(&mut self) -> Option<ActionOutcome> {
        if self.resolved.is_none() {
            self.resolved = match self.rx.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Disconnected) => Some(ActionOutcome::Cancelled),
                Err(TryRecvError::Empty) => None,
            };
        }
        self.resolved
    }

    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<ActionOutcome> {
        if self.resolved.is_none() {
            self.resolved = match self.rx.recv_timeout(timeout) {
                Ok(outcome) => Some(outcome),
                Err(RecvTimeoutError::Disconnected) => Some(ActionOutcome::Cancelled),
                Err(RecvTimeoutError::Timeout) => None,
            };
        }
        self.resolved
    }

    /// Block until resolved. Must not be called on the event thread, which is
    /// the thread that delivers gesture completions.
    pub fn wait(self) -> ActionOutcome {
        match self.resolved {
            Some(outcome) => outcome,
            None => self.rx.recv().unwrap_or(ActionOutcome::Cancelled),
        }
    }
}

/// Builds gestures and submits them to the platform.
#[derive(Debug, Clone)]
pub struct GestureDispatcher {
    pub tap_duration_ms: u64,
    pub swipe_duration_ms: u64,
    pub default_scroll_amount: u32,
}

impl Default for GestureDispatcher {
    fn default() -> Self {
        Self {
            tap_duration_ms: DEFAULT_TAP_DURATION_MS,
            swipe_duration_ms: DEFAULT_SWIPE_DURATION_MS,
            default_scroll_amount: DEFAULT_SCROLL_AMOUNT,
        }
    }
}

impl GestureDispatcher {
    pub fn tap<G: GestureSink + ?Sized>(&self, sink: &G, x: f32, y: f32) -> PendingOutcome {
        debug!(x, y, "dispatching tap");
        self.submit(sink, tap_gesture(x, y, self.tap_duration_ms))
    }

    /// Swipe vertically. The path always spans the middle half of the screen;
    /// `magnitude` is the requested scroll distance and defaults to
    /// `default_scroll_amount`.
    pub fn swipe<G: GestureSink + ?Sized>(
        &self,
        sink: &G,
        direction: ScrollDirection,
        magnitude: Option<u32>,
    ) -> PendingOutcome {
        let magnitude = magnitude.unwrap_or(self.default_scroll_amount);
        debug!(direction = direction.as_str(), magnitude, "dispatching swipe");
        let gesture = swipe_gesture(direction, sink.display_metrics(), self.swipe_duration_ms);
        self.submit(sink, gesture)
    }

    /// Replace the text of the first editable element.
    pub fn set_text<T: NodeTree + ?Sized>(&self, tree: &T, text: &str) -> PendingOutcome {
        let accepted = with_first_match(tree, ElementPredicate::Editable, |tree, node| {
            tree.set_text(node.node(), text)
        });

        let outcome = match accepted {
            None => {
                info!("no editable element for text input");
                ActionOutcome::NoTarget
            }
            Some(true) => ActionOutcome::Success,
            Some(false) => ActionOutcome::Cancelled,
        };
        PendingOutcome::ready(outcome)
    }

    fn submit<G: GestureSink + ?Sized>(&self, sink: &G, gesture: GestureDescription) -> PendingOutcome {
        let (tx, pending) = PendingOutcome::channel();
        let callback_tx = tx.clone();

        let accepted = sink.dispatch_gesture(
            gesture,
            Box::new(move |completion| {
                let _ = callback_tx.send(ActionOutcome::from(completion));
            }),
        );

        if !accepted {
            debug!("platform refused gesture");
            let _ = tx.send(ActionOutcome::Cancelled);
        }
        pending
    }
}
