//! Pointer-driven drag-to-reorder for retained UI trees.
//!
//! [`DragReorder`] is the engine: register drop containers, forward pointer events and animation
//! frames, and get back exactly one [`DropOutcome`] per completed gesture. It talks to the UI
//! through the [`ReorderHost`] trait; [`Scene`] is a small in-memory host that is handy both for
//! tests and for painting with egui.
//!
//! ```
//! use egui::{Pos2, Vec2};
//! use egui_reorder::{ContainerConfig, DragItem, DragReorder, DropOutcome, Scene};
//!
//! let mut scene = Scene::new(Vec2::new(400.0, 400.0));
//! let column = scene.add(scene.root(), Vec2::new(200.0, 400.0), "column");
//! let a = scene.add(column, Vec2::new(200.0, 50.0), "a");
//! scene.add(column, Vec2::new(200.0, 50.0), "b");
//!
//! let mut engine = DragReorder::new();
//! engine.register(&scene, ContainerConfig::new("column", column).accept("card"));
//!
//! engine.pointer_down(&mut scene, Pos2::new(100.0, 25.0), DragItem::new("a", "card", a));
//! engine.pointer_move(&mut scene, Pos2::new(100.0, 80.0));
//! let outcome = engine.pointer_up(&mut scene, Pos2::new(100.0, 80.0));
//! assert!(matches!(outcome, Some(DropOutcome::Reorder(ref ev)) if ev.to_index == 1));
//! ```

#![forbid(unsafe_code)]

pub mod reorder;

pub use reorder::{
    Axis, ContainerConfig, ContainerId, ContainerRegistry, DragItem, DragReorder, DragSession,
    DropOutcome, DropTarget, HitTestMode, ItemId, ItemMoveCallback, ItemMoveEvent, NodeId,
    NodeKind, PreviewStrategy, Registration, ReorderCallback, ReorderEvent, ReorderHost,
    ReorderOptions, Scene, ScenePaint, SceneRole, ScrollMetrics, Spacing, Visibility,
};
