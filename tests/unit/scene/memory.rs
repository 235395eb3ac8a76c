use super::*;
use crate::scene::graph::reparent_keeping_absolute;
use crate::style::color::Rgb;
use crate::style::paint::SolidPaint;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn rect_close(a: Rect, b: Rect) -> bool {
    close(a.x0, b.x0) && close(a.y0, b.y0) && close(a.x1, b.x1) && close(a.y1, b.y1)
}

fn square(scene: &mut MemoryScene, name: &str, x: f64, y: f64) -> NodeId {
    let root = scene.root();
    scene
        .add_shape(
            root,
            name,
            ShapeKind::Rectangle,
            Point::new(x, y),
            Size::new(10.0, 10.0),
        )
        .unwrap()
}

#[test]
fn shapes_report_position_and_bounds() {
    let mut scene = MemoryScene::new();
    let a = square(&mut scene, "a", 5.0, 7.0);
    assert_eq!(scene.position(a).unwrap(), Point::new(5.0, 7.0));
    assert_eq!(
        scene.absolute_bounds(a).unwrap(),
        Rect::new(5.0, 7.0, 15.0, 17.0)
    );
    assert_eq!(scene.index_in_parent(a).unwrap(), Some(0));
}

#[test]
fn group_frame_is_derived_from_children() {
    let mut scene = MemoryScene::new();
    let a = square(&mut scene, "a", 0.0, 0.0);
    let b = square(&mut scene, "b", 20.0, 5.0);
    let root = scene.root();
    let g = scene.group_nodes(&[a, b], root, 0).unwrap();

    assert_eq!(scene.position(g).unwrap(), Point::new(0.0, 0.0));
    assert_eq!(scene.size(g).unwrap(), Size::new(30.0, 15.0));
    assert_eq!(scene.children(g).unwrap(), vec![a, b]);
    assert_eq!(scene.children(root).unwrap(), vec![g]);

    scene.set_position(g, Point::new(100.0, 50.0)).unwrap();
    assert_eq!(scene.position(a).unwrap(), Point::new(100.0, 50.0));
    assert_eq!(scene.position(b).unwrap(), Point::new(120.0, 55.0));
}

#[test]
fn insert_child_keeps_relative_transform() {
    let mut scene = MemoryScene::new();
    let root = scene.root();
    let frame = scene
        .add_container(root, "frame", Point::new(100.0, 0.0), Size::new(50.0, 50.0))
        .unwrap();
    let a = square(&mut scene, "a", 5.0, 5.0);

    scene.insert_child(frame, 0, a).unwrap();
    assert_eq!(scene.position(a).unwrap(), Point::new(5.0, 5.0));
    assert_eq!(
        scene.absolute_bounds(a).unwrap(),
        Rect::new(105.0, 5.0, 115.0, 15.0)
    );
}

#[test]
fn reparent_keeping_absolute_compensates_for_rotated_space() {
    let mut scene = MemoryScene::new();
    let root = scene.root();
    let frame = scene
        .add_container(root, "frame", Point::new(40.0, 40.0), Size::new(50.0, 50.0))
        .unwrap();
    scene.set_rotation(frame, 30.0).unwrap();
    let a = square(&mut scene, "a", 5.0, 5.0);
    let before = scene.absolute_transform(a).unwrap();

    reparent_keeping_absolute(&mut scene, a, frame, 0).unwrap();
    assert_eq!(scene.parent(a).unwrap(), Some(frame));
    assert!(math::affine_approx_eq(
        scene.absolute_transform(a).unwrap(),
        before,
        1e-9
    ));
    assert!(close(scene.rotation(a).unwrap(), -30.0));
}

#[test]
fn grouping_across_coordinate_spaces_keeps_placement() {
    let mut scene = MemoryScene::new();
    let root = scene.root();
    let frame = scene
        .add_container(root, "frame", Point::new(100.0, 100.0), Size::new(50.0, 50.0))
        .unwrap();
    let a = scene
        .add_shape(
            frame,
            "a",
            ShapeKind::Ellipse,
            Point::new(10.0, 10.0),
            Size::new(5.0, 5.0),
        )
        .unwrap();
    let before = scene.absolute_bounds(a).unwrap();

    let g = scene.group_nodes(&[a], root, 0).unwrap();
    assert_eq!(scene.parent(g).unwrap(), Some(root));
    assert!(rect_close(scene.absolute_bounds(a).unwrap(), before));
    assert_eq!(scene.position(a).unwrap(), Point::new(110.0, 110.0));
}

#[test]
fn set_rotation_turns_about_local_origin() {
    let mut scene = MemoryScene::new();
    let a = square(&mut scene, "a", 10.0, 10.0);
    scene.set_rotation(a, 90.0).unwrap();
    assert!(close(scene.rotation(a).unwrap(), 90.0));
    assert_eq!(scene.position(a).unwrap(), Point::new(10.0, 10.0));
    // Counter-clockwise quarter turn on a y-down canvas swings the box above the origin.
    assert!(rect_close(
        scene.absolute_bounds(a).unwrap(),
        Rect::new(10.0, 0.0, 20.0, 10.0)
    ));
}

#[test]
fn resize_rejects_sizes_below_minimum() {
    let mut scene = MemoryScene::new();
    let a = square(&mut scene, "a", 0.0, 0.0);
    let err = scene.resize(a, Size::new(0.0, 10.0)).unwrap_err();
    assert!(matches!(err, LooperError::SceneMutation(_)));
    scene.resize(a, Size::new(MIN_SIZE, 3.0)).unwrap();
    assert_eq!(scene.size(a).unwrap(), Size::new(MIN_SIZE, 3.0));
}

#[test]
fn resizing_a_group_scales_its_children() {
    let mut scene = MemoryScene::new();
    let a = square(&mut scene, "a", 0.0, 0.0);
    let b = square(&mut scene, "b", 10.0, 0.0);
    let root = scene.root();
    let g = scene.group_nodes(&[a, b], root, 0).unwrap();

    scene.resize(g, Size::new(40.0, 20.0)).unwrap();
    assert!(rect_close(
        scene.absolute_bounds(g).unwrap(),
        Rect::new(0.0, 0.0, 40.0, 20.0)
    ));
    assert!(rect_close(
        scene.absolute_bounds(b).unwrap(),
        Rect::new(20.0, 0.0, 40.0, 20.0)
    ));
}

#[test]
fn clone_lands_directly_above_original() {
    let mut scene = MemoryScene::new();
    let a = square(&mut scene, "a", 0.0, 0.0);
    let b = square(&mut scene, "b", 50.0, 0.0);
    let mut style = scene.style(a).unwrap();
    style.fill = Some(SolidPaint::opaque(Rgb::new(1.0, 0.0, 0.0)));
    scene.set_style(a, style).unwrap();

    let c = scene.clone_node(a).unwrap();
    assert_eq!(scene.children(scene.root()).unwrap(), vec![a, c, b]);
    assert_eq!(scene.style(c).unwrap(), style);
    assert_eq!(scene.name(c).unwrap(), "a");
    assert_eq!(scene.absolute_bounds(c).unwrap(), scene.absolute_bounds(a).unwrap());
}

#[test]
fn cloning_a_group_copies_the_subtree() {
    let mut scene = MemoryScene::new();
    let a = square(&mut scene, "a", 0.0, 0.0);
    let b = square(&mut scene, "b", 20.0, 0.0);
    let root = scene.root();
    let g = scene.group_nodes(&[a, b], root, 0).unwrap();

    let copy = scene.clone_node(g).unwrap();
    let copied = scene.children(copy).unwrap();
    assert_eq!(copied.len(), 2);
    assert!(!copied.contains(&a) && !copied.contains(&b));
    assert_eq!(scene.size(copy).unwrap(), scene.size(g).unwrap());
}

#[test]
fn remove_drops_subtree_and_selection() {
    let mut scene = MemoryScene::new();
    let a = square(&mut scene, "a", 0.0, 0.0);
    let b = square(&mut scene, "b", 20.0, 0.0);
    let root = scene.root();
    let g = scene.group_nodes(&[a, b], root, 0).unwrap();
    scene.set_selection(vec![a, g]);

    scene.remove_node(g).unwrap();
    assert!(!scene.is_alive(g));
    assert!(!scene.is_alive(a));
    assert!(scene.selection().is_empty());
    assert!(scene.children(root).unwrap().is_empty());
    assert!(matches!(
        scene.remove_node(a),
        Err(LooperError::UnknownNode(_))
    ));
}

#[test]
fn moves_into_own_descendant_are_rejected() {
    let mut scene = MemoryScene::new();
    let root = scene.root();
    let outer = scene
        .add_container(root, "outer", Point::ORIGIN, Size::new(10.0, 10.0))
        .unwrap();
    let inner = scene
        .add_container(outer, "inner", Point::ORIGIN, Size::new(5.0, 5.0))
        .unwrap();
    assert!(scene.insert_child(inner, 0, outer).is_err());
    assert!(scene.group_nodes(&[outer], inner, 0).is_err());
    assert!(scene.insert_child(root, 0, root).is_err());
}

#[test]
fn insert_index_is_clamped_to_child_count() {
    let mut scene = MemoryScene::new();
    let a = square(&mut scene, "a", 0.0, 0.0);
    let b = square(&mut scene, "b", 0.0, 0.0);
    let root = scene.root();
    scene.insert_child(root, 99, a).unwrap();
    assert_eq!(scene.children(root).unwrap(), vec![b, a]);
}

#[test]
fn document_roundtrip_preserves_tree_and_selection() {
    let json = serde_json::json!({
        "children": [
            {
                "name": "frame",
                "kind": {"type": "container"},
                "x": 10.0, "y": 10.0, "width": 100.0, "height": 100.0,
                "children": [
                    {
                        "name": "star",
                        "kind": {"type": "shape", "shape": "star"},
                        "x": 5.0, "y": 5.0, "width": 20.0, "height": 20.0,
                        "rotation": 45.0,
                        "style": {"opacity": 0.5, "fill": {"color": {"r": 1.0, "g": 0.0, "b": 0.0}}}
                    }
                ]
            }
        ],
        "selection": ["star"]
    });
    let doc: SceneDoc = serde_json::from_value(json).unwrap();
    let scene = MemoryScene::from_doc(&doc).unwrap();

    let star = scene.find_by_name("star").unwrap();
    assert_eq!(scene.selection(), vec![star]);
    assert!(close(scene.rotation(star).unwrap(), 45.0));
    assert_eq!(scene.style(star).unwrap().opacity, 0.5);

    let exported = scene.to_doc().unwrap();
    assert_eq!(exported.selection, vec!["star".to_owned()]);
    let star_doc = &exported.children[0].children[0];
    assert_eq!(star_doc.name, "star");
    assert!(close(star_doc.rotation, 45.0));
    assert!(star_doc.transform.is_none());

    let again = MemoryScene::from_doc(&exported).unwrap();
    let star_again = again.find_by_name("star").unwrap();
    assert!(math::affine_approx_eq(
        again.absolute_transform(star_again).unwrap(),
        scene.absolute_transform(star).unwrap(),
        1e-9
    ));
}

#[test]
fn unknown_selection_name_is_rejected() {
    let doc = SceneDoc {
        children: vec![],
        selection: vec!["ghost".to_owned()],
    };
    assert!(MemoryScene::from_doc(&doc).is_err());
}
