use crate::element::element_model::Capabilities;

/// Node filters used by the tree walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementPredicate {
    /// Every node.
    Any,
    ClickableEnabled,
    Editable,
    Scrollable,
}

impl ElementPredicate {
    pub fn matches(&self, caps: &Capabilities) -> bool {
        match self {
            ElementPredicate::Any => true,
            ElementPredicate::ClickableEnabled => caps.clickable && caps.enabled,
            ElementPredicate::Editable => caps.editable,
            ElementPredicate::Scrollable => caps.scrollable,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementPredicate::Any => "any",
            ElementPredicate::ClickableEnabled => "clickable",
            ElementPredicate::Editable => "editable",
            ElementPredicate::Scrollable => "scrollable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_clickable_does_not_match() {
        let caps = Capabilities {
            clickable: true,
            enabled: false,
            ..Default::default()
        };
        assert!(!ElementPredicate::ClickableEnabled.matches(&caps));
        assert!(ElementPredicate::Any.matches(&caps));
    }
}
