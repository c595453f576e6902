use screen_hinting::element::element_model::{Bounds, Capabilities};
use screen_hinting::element::predicate::ElementPredicate;
use screen_hinting::platform::recorded::{DEFAULT_DISPLAY, RecordedNode, RecordedPlatform};

pub fn platform(root: Option<RecordedNode>) -> RecordedPlatform {
    RecordedPlatform::new(root, DEFAULT_DISPLAY)
}

pub fn container(children: Vec<RecordedNode>) -> RecordedNode {
    RecordedNode {
        class_name: "android.widget.FrameLayout".into(),
        bounds: Bounds::new(0, 0, 1080, 2340),
        capabilities: Capabilities {
            enabled: true,
            ..Default::default()
        },
        children,
        ..Default::default()
    }
}

pub fn button(text: &str, description: &str, bounds: (i32, i32, i32, i32)) -> RecordedNode {
    RecordedNode {
        text: text.into(),
        description: description.into(),
        class_name: "android.widget.Button".into(),
        bounds: Bounds::new(bounds.0, bounds.1, bounds.2, bounds.3),
        capabilities: Capabilities {
            clickable: true,
            enabled: true,
            focusable: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn disabled_button(text: &str, bounds: (i32, i32, i32, i32)) -> RecordedNode {
    let mut node = button(text, "", bounds);
    node.capabilities.enabled = false;
    node
}

pub fn label(text: &str, bounds: (i32, i32, i32, i32)) -> RecordedNode {
    RecordedNode {
        text: text.into(),
        class_name: "android.widget.TextView".into(),
        bounds: Bounds::new(bounds.0, bounds.1, bounds.2, bounds.3),
        capabilities: Capabilities {
            enabled: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn edit_field(text: &str, bounds: (i32, i32, i32, i32)) -> RecordedNode {
    RecordedNode {
        text: text.into(),
        class_name: "android.widget.EditText".into(),
        resource_id: "com.example:id/input".into(),
        bounds: Bounds::new(bounds.0, bounds.1, bounds.2, bounds.3),
        capabilities: Capabilities {
            clickable: true,
            enabled: true,
            focusable: true,
            editable: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn scroll_view(children: Vec<RecordedNode>) -> RecordedNode {
    RecordedNode {
        class_name: "android.widget.ScrollView".into(),
        bounds: Bounds::new(0, 200, 1080, 2000),
        capabilities: Capabilities {
            enabled: true,
            scrollable: true,
            ..Default::default()
        },
        children,
        ..Default::default()
    }
}

/// `OK` button plus an icon button that only has a description.
pub fn ok_icon_screen() -> RecordedNode {
    container(vec![
        button("OK", "", (10, 10, 50, 20)),
        button("", "icon", (70, 10, 20, 20)),
    ])
}

/// A form: title, scrolling list of two fields and a submit button.
pub fn form_screen() -> RecordedNode {
    container(vec![
        label("Sign in", (0, 0, 1080, 120)),
        scroll_view(vec![
            edit_field("", (40, 300, 1000, 100)),
            edit_field("", (40, 450, 1000, 100)),
            container(vec![
                button("Submit", "", (40, 600, 300, 100)),
                disabled_button("Reset", (400, 600, 300, 100)),
            ]),
        ]),
        button("", "Back", (0, 2200, 120, 120)),
    ])
}

/// Single path of `depth` nested containers ending in a button.
pub fn chain(depth: usize) -> RecordedNode {
    let mut node = button("leaf", "", (0, 0, 10, 10));
    for _ in 0..depth {
        node = container(vec![node]);
    }
    node
}

/// Root with `n` buttons side by side.
pub fn row_of_buttons(n: usize) -> RecordedNode {
    container(
        (0..n)
            .map(|i| button(&format!("b{}", i), "", (i as i32 * 20, 0, 20, 20)))
            .collect(),
    )
}

/// Nodes in the subtree that satisfy `predicate`.
pub fn count_matching(node: &RecordedNode, predicate: ElementPredicate) -> usize {
    let own = usize::from(predicate.matches(&node.capabilities));
    own + node
        .children
        .iter()
        .map(|c| count_matching(c, predicate))
        .sum::<usize>()
}
