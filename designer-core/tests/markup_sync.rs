//! Markup Synchronisation Integration Tests
//!
//! Exercises the visual-editor and markup-editor paths together:
//! - Flat and nested round trips
//! - Store mutations that must be no-ops
//! - Tolerant decoding of hand-edited markup
//! - Stacking order across export/import

use designer_core::{
    decode, decode_with, encode, encode_with, props, Command, Document, EditorState, Element,
    ElementId, ElementKind, ElementPatch, GridSnap, MarkupOptions, Nesting, PropertyValue,
};

/// Comparable view of a root element, ignoring id and z-index.
type Shape = (ElementKind, String, [i32; 4], Vec<(String, PropertyValue)>, bool);

fn shapes(doc: &Document) -> Vec<Shape> {
    doc.root_elements()
        .map(|e| {
            let t = e.transform;
            (
                e.kind,
                e.name.clone(),
                [t.x, t.y, t.width, t.height],
                e.properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                e.visible,
            )
        })
        .collect()
}

/// A flat document touching every attribute the markup carries.
fn flat_document() -> Document {
    let mut doc = Document::new();
    let button = doc.spawn(ElementKind::Button, 40, 60);
    doc.update(
        button,
        &ElementPatch::new()
            .name("submit")
            .property(props::BACKGROUND, "#0078d4")
            .property(props::FOREGROUND, "#ffffff")
            .property(props::FONT_SIZE, 16_i64),
    );
    let slider = doc.spawn(ElementKind::Slider, 200, 60);
    doc.update(slider, &ElementPatch::new().property(props::VALUE, 75_i64));
    let label = doc.spawn(ElementKind::TextBlock, 40, 140);
    doc.update(
        label,
        &ElementPatch::new()
            .property(props::CONTENT, "Volume & \"gain\"")
            .visible(false),
    );
    doc.spawn(ElementKind::TabControl, -20, 300);
    doc
}

#[test]
fn test_flat_round_trip_preserves_fields() {
    let original = flat_document();
    let decoded = decode(&encode(&original));

    assert_eq!(shapes(&decoded), shapes(&original));
    assert!(decoded
        .roots()
        .iter()
        .all(|id| !original.contains(*id)));
}

#[test]
fn test_encode_is_deterministic() {
    let doc = flat_document();
    let first = encode(&doc);
    let second = encode(&doc);
    assert_eq!(first, second);
}

#[test]
fn test_empty_document_identity() {
    let decoded = decode("");
    assert!(decoded.is_empty());
    assert!(decoded.roots().is_empty());

    let markup = encode(&Document::new());
    let lines: Vec<_> = markup.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("<Canvas"));
    assert_eq!(lines[1], "</Canvas>");
}

#[test]
fn test_missing_id_operations_are_noops() {
    let mut state = EditorState::new();
    state.apply(Command::Spawn {
        kind: ElementKind::CheckBox,
        x: 0,
        y: 0,
    });
    let before = state.clone();
    let ghost = ElementId::new();

    for command in [
        Command::Update {
            id: ghost,
            patch: ElementPatch::new().name("ghost"),
        },
        Command::Move {
            id: ghost,
            x: 10,
            y: 10,
        },
        Command::Resize {
            id: ghost,
            width: 10,
            height: 10,
        },
        Command::Delete { ids: vec![ghost] },
        Command::Reparent {
            id: ghost,
            parent: None,
        },
        Command::SwapZIndex {
            a: ghost,
            b: before.document.roots()[0],
        },
    ] {
        state.apply(command);
    }

    assert_eq!(state, before);
}

#[test]
fn test_locked_element_keeps_geometry() {
    let mut doc = Document::new();
    let id = doc.spawn(ElementKind::Image, 100, 100);
    doc.update(id, &ElementPatch::new().locked(true));
    let before = doc.get(id).cloned();

    doc.move_element(id, 300, 300, GridSnap::default());
    doc.resize(id, 5, 5);

    assert_eq!(doc.get(id).cloned(), before);
}

#[test]
fn test_resize_floor_and_grid_snap() {
    let mut doc = Document::new();
    let id = doc.spawn(ElementKind::Panel, 0, 0);

    doc.resize(id, 5, -10);
    doc.move_element(id, 27, 33, GridSnap::default());

    let t = doc.get(id).expect("panel").transform;
    assert_eq!((t.width, t.height), (20, 20));
    assert_eq!((t.x, t.y), (20, 40));
}

#[test]
fn test_unknown_tags_are_skipped() {
    let markup = r#"<Canvas xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation">
  <Rectangle Name="r" Width="10" Height="10" />
  <Button Name="ok" Width="80" Height="30" Canvas.Left="5" Canvas.Top="5" Content="OK" />
  <Ellipse Name="e" />
</Canvas>"#;
    let doc = decode(markup);
    let names: Vec<_> = doc.root_elements().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["ok"]);
}

#[test]
fn test_partial_property_merge() {
    let mut doc = Document::new();
    let id = doc.spawn(ElementKind::Button, 0, 0);
    doc.update(
        id,
        &ElementPatch::new()
            .property(props::CONTENT, "Save")
            .property(props::FOREGROUND, "#111111"),
    );
    doc.update(id, &ElementPatch::new().property(props::BACKGROUND, "#eeeeee"));

    let element = doc.get(id).expect("button");
    assert_eq!(element.property(props::CONTENT), Some(&"Save".into()));
    assert_eq!(element.property(props::FOREGROUND), Some(&"#111111".into()));
    assert_eq!(element.property(props::BACKGROUND), Some(&"#eeeeee".into()));
}

#[test]
fn test_nested_round_trip_rebuilds_tree() {
    let mut doc = Document::new();
    let window = doc.spawn(ElementKind::Window, 0, 0);
    let stack = doc.spawn(ElementKind::StackPanel, 10, 10);
    let first = doc.spawn(ElementKind::RadioButton, 20, 20);
    let second = doc.spawn(ElementKind::RadioButton, 20, 60);
    let footer = doc.spawn(ElementKind::TextBlock, 0, 500);
    assert!(doc.reparent(stack, Some(window)));
    assert!(doc.reparent(first, Some(stack)));
    assert!(doc.reparent(second, Some(stack)));

    let decoded = decode(&encode(&doc));
    assert!(decoded.verify().is_ok());
    assert_eq!(decoded.len(), 5);

    let tops: Vec<_> = decoded.root_elements().map(|e| e.name.clone()).collect();
    let expected: Vec<_> = [window, footer]
        .iter()
        .filter_map(|id| doc.get(*id))
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(tops, expected);

    let decoded_window = decoded.root_elements().next().expect("window");
    let decoded_stack = decoded
        .get(decoded_window.children[0])
        .expect("stack panel");
    let radio_names: Vec<_> = decoded_stack
        .children
        .iter()
        .filter_map(|id| decoded.get(*id))
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(radio_names, vec!["RadioButton_3", "RadioButton_4"]);

    // Re-encoding the decoded tree gives the same text.
    assert_eq!(encode(&decoded), encode(&doc));
}

#[test]
fn test_flatten_mode_matches_flat_import() {
    let mut doc = Document::new();
    let panel = doc.spawn(ElementKind::Panel, 0, 0);
    let button = doc.spawn(ElementKind::Button, 0, 0);
    doc.reparent(button, Some(panel));

    let options = MarkupOptions {
        nesting: Nesting::Flatten,
        ..MarkupOptions::default()
    };
    let decoded = decode_with(&encode(&doc), &options).expect("tolerant decode");
    assert_eq!(decoded.roots().len(), 2);
    assert!(decoded.elements().all(|e| e.children.is_empty()));
}

#[test]
fn test_z_index_survives_round_trip_when_emitted() {
    let mut doc = Document::new();
    let back = doc.spawn(ElementKind::Panel, 0, 0);
    let front = doc.spawn(ElementKind::Panel, 0, 0);
    doc.swap_z_index(back, front);

    let options = MarkupOptions {
        emit_z_index: true,
        ..MarkupOptions::default()
    };
    let decoded = decode(&encode_with(&doc, &options));
    let order: Vec<_> = decoded
        .stacking_order()
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(order, vec!["Panel_2", "Panel_1"]);

    // Without the attribute, document order becomes stacking order.
    let lossy = decode(&encode(&doc));
    let order: Vec<_> = lossy
        .stacking_order()
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(order, vec!["Panel_1", "Panel_2"]);
}

#[test]
fn test_hand_edited_markup_is_tolerated() {
    let markup = r#"<?xml version="1.0" encoding="utf-8"?>
<!-- exported by hand -->
<Canvas xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation"
        xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml">
  <Button x:Name='primary' Width="wide" Canvas.Left="15.7" Content="Go" >
  <TextBox Name="query" Height="3" Visibility="Hidden"/>
  stray text < here
</Canvas>"#;
    let doc = decode(markup);
    assert!(doc.verify().is_ok());

    let button = doc.root_elements().next().expect("button");
    assert_eq!(button.name, "primary");
    assert_eq!(button.transform.width, 120);
    assert_eq!(button.transform.x, 15);
    assert_eq!(button.property(props::CONTENT), Some(&"Go".into()));

    let text_box = doc.get(button.children[0]).expect("text box nested in open button");
    assert_eq!(text_box.transform.height, 20);
    assert!(!text_box.visible);
}

#[test]
fn test_add_with_parent_then_encode() {
    let mut doc = Document::new();
    let grid = doc.spawn(ElementKind::Grid, 0, 0);
    doc.add(
        Element::new(ElementKind::ComboBox)
            .with_name("choice")
            .with_parent(grid),
    );
    let markup = encode(&doc);
    assert!(markup.contains("  <Grid Name=\"Grid_1\""));
    assert!(markup.contains("    <ComboBox Name=\"choice\""));
    assert!(markup.contains("  </Grid>"));
}
