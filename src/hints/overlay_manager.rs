use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    element::element_model::ElementSnapshot,
    hints::hint_model::{HintAnchor, HintEntry, render_hint_text},
    platform::overlay::{OverlayParams, OverlaySurface},
};

/// Owns every hint overlay on screen.
///
/// Overlays are added and removed only through this type, and all of them are
/// removed when it is dropped.
pub struct HintOverlayManager<S: OverlaySurface> {
    surface: S,
    entries: Vec<HintEntry>,
    latest: Vec<ElementSnapshot>,
    enabled: bool,
    vertical_offset: i32,
}

impl<S: OverlaySurface> HintOverlayManager<S> {
    pub fn new(surface: S, vertical_offset: i32) -> Self {
        Self {
            surface,
            entries: Vec::new(),
            latest: Vec::new(),
            enabled: true,
            vertical_offset,
        }
    }

    /// Replace all hints with hints for `snapshots`. Returns how many are shown.
    ///
    /// The snapshots are remembered even while disabled, so enabling later
    /// shows hints for the latest screen.
    pub fn refresh(&mut self, snapshots: &[ElementSnapshot]) -> usize {
        self.latest = snapshots.to_vec();
        self.clear();

        if !self.enabled {
            return 0;
        }
        self.show_latest()
    }

    fn show_latest(&mut self) -> usize {
        let mut covered: HashSet<(HintAnchor, String)> = HashSet::new();

        for snapshot in &self.latest {
            let Some(label) = snapshot.display_text() else {
                continue;
            };
            if snapshot.bounds.is_empty() {
                continue;
            }

            let anchor = HintAnchor::below(&snapshot.bounds, self.vertical_offset);
            if !covered.insert((anchor, label.to_string())) {
                continue;
            }

            let params = OverlayParams::annotation(anchor.x, anchor.y, render_hint_text(label));
            match self.surface.add_view(params) {
                Ok(view) => self.entries.push(HintEntry {
                    anchor,
                    label: label.to_string(),
                    view,
                }),
                Err(e) => warn!(label, error = %e, "failed to show hint overlay"),
            }
        }

        debug!(shown = self.entries.len(), "hint overlays refreshed");
        self.entries.len()
    }

    /// Remove every hint. Safe to call when nothing is shown. A view the
    /// surface fails to remove is logged and forgotten.
    pub fn clear(&mut self) {
        for entry in self.entries.drain(..) {
            if let Err(e) = self.surface.remove_view(entry.view) {
                warn!(label = %entry.label, error = %e, "failed to remove hint overlay");
            }
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.clear();
            self.show_latest();
        } else {
            self.clear();
        }
    }

    /// Remember `snapshots` as the latest screen without touching overlays.
    pub fn remember(&mut self, snapshots: &[ElementSnapshot]) {
        self.latest = snapshots.to_vec();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn entries(&self) -> &[HintEntry] {
        &self.entries
    }

    pub fn hint_count(&self) -> usize {
        self.entries.len()
    }

    pub fn latest_snapshots(&self) -> &[ElementSnapshot] {
        &self.latest
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: OverlaySurface> Drop for HintOverlayManager<S> {
    fn drop(&mut self) {
        self.clear();
    }
}
