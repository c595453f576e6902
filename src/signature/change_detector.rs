use crate::signature::screen_signature::ScreenSignature;

/// Remembers the last seen signature and reports when a new one differs.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Option<ScreenSignature>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` (and remember `signature`) when it differs from the last one.
    /// Always `true` when nothing has been seen yet.
    pub fn has_changed(&mut self, signature: &ScreenSignature) -> bool {
        if self.last.as_ref() == Some(signature) {
            return false;
        }
        self.last = Some(signature.clone());
        true
    }

    /// Forget the last signature; the next comparison reports a change.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<&ScreenSignature> {
        self.last.as_ref()
    }
}
