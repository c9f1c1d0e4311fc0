use egui::{Pos2, Vec2};

use super::{ContainerConfig, DragItem, DragReorder, NodeId, ReorderHost, ReorderOptions, Scene};

/// A 200x200 scrollable column holding ten 200x50 cards, scrolled down by `offset`.
fn scrolling_column(
    offset: f32,
    options: ReorderOptions,
) -> (Scene, DragReorder, NodeId, Vec<NodeId>) {
    let mut scene = Scene::new(Vec2::new(400.0, 400.0));
    let col = scene.add(scene.root(), Vec2::new(200.0, 200.0), "col");
    scene.set_scrollable(col, true);
    let items: Vec<NodeId> = (0..10)
        .map(|i| scene.add(col, Vec2::new(200.0, 50.0), format!("i{i}")))
        .collect();
    scene.set_scroll_offset(col, Vec2::new(0.0, offset));

    let mut engine = DragReorder::new_with_options(options);
    engine.register(&scene, ContainerConfig::new("col", col).accept("card"));
    (scene, engine, col, items)
}

/// Runs `frames` animation frames, the way a host's frame loop would.
fn run_frames(scene: &mut Scene, engine: &mut DragReorder, frames: usize) -> Vec<f32> {
    let col = scene.children(scene.root())[0];
    (0..frames)
        .map(|_| {
            assert!(scene.take_frame_request(), "no frame was requested");
            engine.on_animation_frame(scene);
            scene.scroll_offset(col).y
        })
        .collect()
}

#[test]
fn scrolls_towards_the_top_edge_until_clamped() {
    let (mut scene, mut engine, _col, items) = scrolling_column(100.0, ReorderOptions::default());

    // i3 sits at 150..200 in content, 50..100 on screen.
    assert!(engine.pointer_down(
        &mut scene,
        Pos2::new(100.0, 75.0),
        DragItem::new("i3", "card", items[3])
    ));
    assert!(scene.frame_requested());

    let pointer = Pos2::new(100.0, 20.0);
    engine.pointer_move(&mut scene, pointer);
    let offsets = run_frames(&mut scene, &mut engine, 12);
    assert_eq!(
        offsets,
        [86.0, 72.0, 58.0, 44.0, 30.0, 16.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    );

    // The target followed the content without any pointer movement.
    let target = engine.current_target().cloned();
    assert_eq!(target.as_ref().map(|t| t.index), Some(1));
    assert_eq!(target, engine.resolve_drop_target(&scene, pointer));

    engine.pointer_up(&mut scene, pointer);
    assert!(!scene.frame_requested());
}

#[test]
fn scrolls_towards_the_bottom_edge() {
    let (mut scene, mut engine, _col, items) = scrolling_column(0.0, ReorderOptions::default());
    assert!(engine.pointer_down(
        &mut scene,
        Pos2::new(100.0, 25.0),
        DragItem::new("i0", "card", items[0])
    ));

    engine.pointer_move(&mut scene, Pos2::new(100.0, 190.0));
    let offsets = run_frames(&mut scene, &mut engine, 3);
    assert_eq!(offsets, [14.0, 28.0, 42.0]);
    engine.pointer_up(&mut scene, Pos2::new(100.0, 190.0));
}

#[test]
fn middle_of_the_container_keeps_frames_but_does_not_scroll() {
    let (mut scene, mut engine, _col, items) = scrolling_column(100.0, ReorderOptions::default());
    assert!(engine.pointer_down(
        &mut scene,
        Pos2::new(100.0, 75.0),
        DragItem::new("i3", "card", items[3])
    ));
    engine.pointer_move(&mut scene, Pos2::new(100.0, 100.0));

    let offsets = run_frames(&mut scene, &mut engine, 4);
    assert_eq!(offsets, [100.0; 4]);
    assert!(scene.frame_requested());

    engine.pointer_up(&mut scene, Pos2::new(100.0, 100.0));
    assert!(!scene.frame_requested());
}

#[test]
fn disabled_auto_scroll_never_scrolls() {
    let options = ReorderOptions {
        auto_scroll: false,
        ..Default::default()
    };
    let (mut scene, mut engine, _col, items) = scrolling_column(100.0, options);
    assert!(engine.pointer_down(
        &mut scene,
        Pos2::new(100.0, 75.0),
        DragItem::new("i3", "card", items[3])
    ));
    engine.pointer_move(&mut scene, Pos2::new(100.0, 5.0));

    let offsets = run_frames(&mut scene, &mut engine, 3);
    assert_eq!(offsets, [100.0; 3]);
    engine.pointer_up(&mut scene, Pos2::new(100.0, 5.0));
}

#[test]
fn no_frames_once_the_drag_is_over() {
    let (mut scene, mut engine, col, items) = scrolling_column(100.0, ReorderOptions::default());
    assert!(engine.pointer_down(
        &mut scene,
        Pos2::new(100.0, 75.0),
        DragItem::new("i3", "card", items[3])
    ));
    engine.pointer_move(&mut scene, Pos2::new(100.0, 20.0));
    engine.pointer_up(&mut scene, Pos2::new(100.0, 20.0));
    assert!(!scene.take_frame_request());

    // A stray frame after release does nothing and schedules nothing.
    engine.on_animation_frame(&mut scene);
    assert!(!scene.frame_requested());
    assert_eq!(scene.scroll_offset(col), Vec2::new(0.0, 100.0));
}

#[test]
fn outer_scroller_takes_over_when_inner_has_nothing_to_do() {
    let mut scene = Scene::new(Vec2::new(400.0, 400.0));
    let panel = scene.add(scene.root(), Vec2::new(250.0, 200.0), "panel");
    scene.set_scrollable(panel, true);
    let col = scene.add(panel, Vec2::new(200.0, 400.0), "col");
    scene.set_scrollable(col, true);
    let items: Vec<NodeId> = (0..10)
        .map(|i| scene.add(col, Vec2::new(200.0, 50.0), format!("i{i}")))
        .collect();

    let mut engine = DragReorder::new();
    engine.register(&scene, ContainerConfig::new("col", col).accept("card"));
    assert!(engine.pointer_down(
        &mut scene,
        Pos2::new(100.0, 75.0),
        DragItem::new("i1", "card", items[1])
    ));

    // Near the panel's bottom edge, but in the middle of the column.
    engine.pointer_move(&mut scene, Pos2::new(100.0, 190.0));
    assert!(scene.take_frame_request());
    engine.on_animation_frame(&mut scene);
    assert_eq!(scene.scroll_offset(panel), Vec2::new(0.0, 14.0));
    assert_eq!(scene.scroll_offset(col), Vec2::ZERO);

    engine.pointer_up(&mut scene, Pos2::new(100.0, 190.0));
}
