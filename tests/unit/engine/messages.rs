use super::*;
use crate::style::color::Rgb;
use crate::style::paint::SolidPaint;
use serde_json::json;

#[test]
fn create_carries_config_inline() {
    let msg: PanelMessage = serde_json::from_value(json!({
        "type": "create",
        "iterations": 3,
        "x": 10,
        "fillColor": "#ff0000",
    }))
    .unwrap();

    let PanelMessage::Create(config) = msg else {
        panic!("expected create");
    };
    assert_eq!(config.iterations, 3);
    assert_eq!(config.dx, Some(10.0));
    assert_eq!(config.dy, None);
    assert_eq!(
        config.fill_color,
        Some(SolidPaint::opaque(Rgb::new(1.0, 0.0, 0.0)))
    );
}

#[test]
fn revert_is_an_alias_for_delete() {
    for tag in ["delete", "revert"] {
        let msg: PanelMessage = serde_json::from_value(json!({ "type": tag })).unwrap();
        assert_eq!(msg, PanelMessage::Delete);
    }
    let msg: PanelMessage = serde_json::from_value(json!({ "type": "cancel" })).unwrap();
    assert_eq!(msg.kind(), "cancel");
}

#[test]
fn unknown_tag_is_rejected() {
    assert!(serde_json::from_value::<PanelMessage>(json!({ "type": "explode" })).is_err());
}

#[test]
fn engine_messages_use_kebab_tags() {
    let v = serde_json::to_value(EngineMessage::SelectionChange { selection: true }).unwrap();
    assert_eq!(v, json!({ "type": "selection-change", "selection": true }));

    let v = serde_json::to_value(EngineMessage::LooperConfig { config: None }).unwrap();
    assert_eq!(v, json!({ "type": "looper-config", "config": null }));
}
