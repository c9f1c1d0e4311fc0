use std::collections::VecDeque;

use egui::Pos2;

mod auto_scroll;
mod debug;
mod displacement;
mod drag;
mod geometry;
mod host;
mod options;
mod placeholder;
mod preview;
mod registry;
mod scene;
mod session;
mod types;

#[cfg(test)]
mod scroll_tests;

pub use host::{NodeId, NodeKind, ReorderHost, ScrollMetrics, Spacing, Visibility};
pub use options::{HitTestMode, PreviewStrategy, ReorderOptions};
pub use registry::{
    ContainerConfig, ContainerRegistry, ItemMoveCallback, Registration, ReorderCallback,
};
pub use scene::{Scene, ScenePaint, SceneRole};
pub use types::{
    Axis, ContainerId, DragItem, DragSession, DropOutcome, DropTarget, ItemId, ItemMoveEvent,
    ReorderEvent,
};

use auto_scroll::AutoScroll;
use displacement::Displacement;
use placeholder::Placeholder;
use session::SessionLog;

/// Everything that only exists while the pointer is down.
#[derive(Debug)]
struct ActiveDrag {
    session: DragSession,
    item_margin: Spacing,
    ghost: Option<NodeId>,
    pointer: Pos2,

    /// Last resolved target, used to skip redundant preview writes.
    target: Option<DropTarget>,
    highlighted: Option<NodeId>,
}

/// Pointer-driven drag-to-reorder engine.
///
/// The host forwards pointer-down/move/up and animation frames; the engine resolves where the
/// dragged item would land, keeps a placeholder (or FLIP displacement) preview in sync, scrolls
/// containers near their edges, and on release reports exactly one structural change (or none).
///
/// The engine never owns item order. Callers apply [`DropOutcome`]s to their own lists, either
/// from the container callbacks or from the return value of [`Self::pointer_up`].
#[derive(Debug)]
pub struct DragReorder {
    pub options: ReorderOptions,

    registry: ContainerRegistry,
    active: Option<ActiveDrag>,

    placeholder: Placeholder,
    displacement: Displacement,
    auto_scroll: AutoScroll,

    session_log: SessionLog,
    debug_log: VecDeque<String>,
    debug_frame: u64,
}

impl Default for DragReorder {
    fn default() -> Self {
        Self::new()
    }
}

impl DragReorder {
    pub fn new() -> Self {
        Self::new_with_options(ReorderOptions::default())
    }

    pub fn new_with_options(options: ReorderOptions) -> Self {
        Self {
            options,
            registry: ContainerRegistry::default(),
            active: None,
            placeholder: Placeholder::default(),
            displacement: Displacement::default(),
            auto_scroll: AutoScroll::default(),
            session_log: SessionLog::default(),
            debug_log: VecDeque::new(),
            debug_frame: 0,
        }
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    /// Registers (or updates) a container. Call on mount and whenever its config changes.
    pub fn register(&mut self, host: &dyn ReorderHost, config: ContainerConfig) -> Registration {
        let id = config.id.clone();
        let node = config.node;
        let registration = self.registry.register(config, |n| host.is_attached(n));
        if self.options.debug_event_log {
            self.debug_log_event(format!(
                "register id={id} node={node:?} -> {registration:?}"
            ));
        }
        registration
    }

    /// Removes a container on unmount. Passing the node guards against a stale unmount
    /// removing a newer registration under the same id.
    ///
    /// Safe mid-drag: the container simply stops being a drop candidate.
    pub fn unregister(&mut self, id: &str, node: Option<NodeId>) -> bool {
        let removed = self.registry.unregister(id, node);
        if self.options.debug_event_log {
            self.debug_log_event(format!("unregister id={id} node={node:?} -> {removed}"));
        }
        removed
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.active.as_ref().map(|a| &a.session)
    }

    /// The target the preview currently shows, if any.
    pub fn current_target(&self) -> Option<&DropTarget> {
        self.active.as_ref().and_then(|a| a.target.as_ref())
    }

    /// Where the active drag would land with the pointer at `pointer`. Pure: changes nothing.
    pub fn resolve_drop_target(&self, host: &dyn ReorderHost, pointer: Pos2) -> Option<DropTarget> {
        let active = self.active.as_ref()?;
        self.resolve_at(host, active, pointer).map(|r| r.target)
    }
}
