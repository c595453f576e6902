use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{
    element::{element_model::ElementSnapshot, predicate::ElementPredicate},
    gesture::{
        dispatcher::{ActionOutcome, GestureDispatcher, PendingOutcome},
        gesture_builder::ScrollDirection,
    },
    hints::overlay_manager::HintOverlayManager,
    platform::{
        gesture::GestureSink,
        node_tree::{NodeGuard, NodeTree},
        overlay::OverlaySurface,
    },
    router::{
        debounce::Debouncer,
        router_model::{EngineConfig, RouterState, UiEvent, UiEventKind},
    },
    signature::{change_detector::ChangeDetector, screen_signature::ScreenSignature},
    trace::{logger::EventSink, trace::TraceEvent},
    walker::tree_walker::{find_first, scan_window, snapshot_elements},
};

/// Top-level owner of engine state.
///
/// Everything runs on one event thread through `&mut self`; the only deferred
/// work is the single debounced refresh, which the caller drives by calling
/// `tick` once `next_deadline` has passed.
pub struct EventRouter<P, S: OverlaySurface> {
    platform: P,
    hints: HintOverlayManager<S>,
    detector: ChangeDetector,
    debouncer: Debouncer,
    gestures: GestureDispatcher,
    sink: Box<dyn EventSink + Send>,
    state: RouterState,
    active: bool,
    refresh_cycles: u64,
}

impl<P, S> EventRouter<P, S>
where
    P: NodeTree + GestureSink,
    S: OverlaySurface,
{
    pub fn new(
        platform: P,
        surface: S,
        sink: Box<dyn EventSink + Send>,
        config: &EngineConfig,
    ) -> Self {
        let mut hints = HintOverlayManager::new(surface, config.hint_offset);
        hints.set_enabled(config.hints_enabled);

        let state = if config.hints_enabled {
            RouterState::Idle
        } else {
            RouterState::Disabled
        };

        Self {
            platform,
            hints,
            detector: ChangeDetector::new(),
            debouncer: Debouncer::new(config.debounce),
            gestures: GestureDispatcher {
                tap_duration_ms: config.tap_duration_ms,
                swipe_duration_ms: config.swipe_duration_ms,
                default_scroll_amount: config.default_scroll_amount,
            },
            sink,
            state,
            active: true,
            refresh_cycles: 0,
        }
    }

    // ---- Platform notifications ----

    pub fn on_event(&mut self, event: &UiEvent, now: Instant) {
        if !self.active {
            return;
        }

        if event.kind.is_ui_change() {
            if self.state == RouterState::Disabled {
                return;
            }
            self.debouncer.schedule(now);
            self.state = RouterState::PendingRefresh;
            return;
        }

        if event.kind == UiEventKind::ViewClicked {
            // Hints must not cover what the user is tapping.
            self.hints.clear();
            self.sink.emit(&TraceEvent::click(event.source.as_ref()));
        }
    }

    /// Run the scheduled refresh if it is due at `now`. Returns whether it ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.debouncer.fire_if_due(now).is_none() {
            return false;
        }
        self.state = RouterState::Idle;
        self.refresh_cycle();
        true
    }

    /// When the pending refresh is due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Scan, compare, and redraw hints when the clickable surface changed.
    /// Returns whether it changed.
    fn refresh_cycle(&mut self) -> bool {
        self.refresh_cycles += 1;

        let Some(clickable) = self.scan_clickable() else {
            debug!("no active window, skipping refresh");
            return false;
        };

        let signature = ScreenSignature::from_snapshots(&clickable);
        let changed = self.detector.has_changed(&signature);
        if changed {
            self.hints.refresh(&clickable);
        }

        debug!(%signature, changed, clickable = clickable.len(), "refresh cycle");
        self.emit_analysis(&signature, changed, &clickable);
        changed
    }

    fn scan_clickable(&self) -> Option<Vec<ElementSnapshot>> {
        scan_window(&self.platform, ElementPredicate::ClickableEnabled)
    }

    fn emit_analysis(&self, signature: &ScreenSignature, changed: bool, clickable: &[ElementSnapshot]) {
        self.sink.emit(&TraceEvent::screen_analysis(
            signature,
            changed,
            clickable,
            self.hints.hint_count(),
        ));
    }

    // ---- External control ----

    pub fn set_hint_enabled(&mut self, enabled: bool) {
        if !self.active {
            warn!(enabled, "hint toggle on inactive engine");
            return;
        }
        if !enabled {
            self.debouncer.cancel();
            self.hints.set_enabled(false);
            self.state = RouterState::Disabled;
            info!("hints disabled");
            return;
        }

        self.debouncer.cancel();
        self.state = RouterState::Idle;
        info!("hints enabled");

        // Immediate cycle that always redraws, even if the screen is unchanged.
        self.refresh_cycles += 1;
        match self.scan_clickable() {
            Some(clickable) => {
                let signature = ScreenSignature::from_snapshots(&clickable);
                let changed = self.detector.has_changed(&signature);
                self.hints.remember(&clickable);
                self.hints.set_enabled(true);
                self.emit_analysis(&signature, changed, &clickable);
            }
            None => {
                // Nothing to anchor to. Forget the previous screen so its hints
                // are not redrawn, and so its return counts as a change.
                debug!("no active window, enabling without hints");
                self.detector.reset();
                self.hints.remember(&[]);
                self.hints.set_enabled(true);
            }
        }
    }

    /// The platform interrupted feedback: drop hints and pending work.
    pub fn on_interrupt(&mut self) {
        self.hints.clear();
        if self.debouncer.cancel() {
            self.state = RouterState::Idle;
        }
    }

    /// Teardown. Overlays are removed, pending work is dropped, and the engine
    /// reports itself inactive from now on.
    pub fn shutdown(&mut self) {
        self.hints.clear();
        self.debouncer.cancel();
        self.detector.reset();
        self.state = RouterState::Disabled;
        self.active = false;
        info!("engine shut down");
    }

    // ---- Actions ----

    pub fn perform_touch(&mut self, x: f32, y: f32) -> PendingOutcome {
        if !self.active {
            warn!("touch requested on inactive engine");
            return PendingOutcome::ready(ActionOutcome::Cancelled);
        }
        let mut pending = self.gestures.tap(&self.platform, x, y);
        self.sink
            .emit(&TraceEvent::virtual_touch(x, y, pending.poll()));
        pending
    }

    pub fn perform_scroll(&mut self, direction: ScrollDirection, amount: Option<u32>) -> PendingOutcome {
        if !self.active {
            warn!("scroll requested on inactive engine");
            return PendingOutcome::ready(ActionOutcome::Cancelled);
        }
        if NodeGuard::root(&self.platform).is_none() {
            info!(?direction, "no active window, scroll skipped");
            return PendingOutcome::ready(ActionOutcome::NoTarget);
        }
        let amount = amount.unwrap_or(self.gestures.default_scroll_amount);
        let mut pending = self.gestures.swipe(&self.platform, direction, Some(amount));
        self.sink
            .emit(&TraceEvent::scroll(direction, amount, pending.poll()));
        pending
    }

    pub fn perform_text_input(&mut self, text: &str) -> PendingOutcome {
        if !self.active {
            warn!("text input requested on inactive engine");
            return PendingOutcome::ready(ActionOutcome::Cancelled);
        }
        self.gestures.set_text(&self.platform, text)
    }

    // ---- Queries ----

    pub fn elements(&self, predicate: ElementPredicate) -> Vec<ElementSnapshot> {
        snapshot_elements(&self.platform, predicate)
    }

    pub fn find_first(&self, predicate: ElementPredicate) -> Option<ElementSnapshot> {
        find_first(&self.platform, predicate)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    /// Refresh cycles run so far, scheduled or forced.
    pub fn refresh_cycles(&self) -> u64 {
        self.refresh_cycles
    }

    pub fn last_signature(&self) -> Option<&ScreenSignature> {
        self.detector.last()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn hints(&self) -> &HintOverlayManager<S> {
        &self.hints
    }

    pub fn hints_mut(&mut self) -> &mut HintOverlayManager<S> {
        &mut self.hints
    }
}
