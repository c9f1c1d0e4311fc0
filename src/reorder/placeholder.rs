use egui::Vec2;

use super::host::{NodeId, NodeKind, ReorderHost, Spacing};
use super::types::Axis;

/// The single in-flow node marking where the dragged item would land.
#[derive(Debug, Default)]
pub(super) struct Placeholder {
    node: Option<NodeId>,
    parent: Option<NodeId>,
    axis: Axis,
}

impl Placeholder {
    pub(super) fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub(super) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Builds a detached placeholder shaped like the dragged item, replacing any previous one.
    ///
    /// Vertical containers get a full-width placeholder; other axes keep the item's width.
    pub(super) fn create(
        &mut self,
        host: &mut dyn ReorderHost,
        item_size: Vec2,
        margin: Spacing,
        axis: Axis,
    ) -> NodeId {
        self.remove(host);
        let node = host.create_node(NodeKind::Placeholder {
            size: item_size,
            fill_cross_axis: axis == Axis::Vertical,
            margin,
        });
        self.node = Some(node);
        self.axis = axis;
        node
    }

    /// Recreates the placeholder when the target container stacks along a different axis.
    pub(super) fn ensure_axis(
        &mut self,
        host: &mut dyn ReorderHost,
        item_size: Vec2,
        margin: Spacing,
        axis: Axis,
    ) {
        if self.node.is_none() || self.axis != axis {
            self.create(host, item_size, margin, axis);
        }
    }

    /// Puts the placeholder right before `siblings[index]`, or last when `index == siblings.len()`.
    ///
    /// `skip` (the collapsed dragged node) is ignored when checking whether the placeholder is
    /// already in place. Returns `false` if nothing had to move.
    pub(super) fn move_to(
        &mut self,
        host: &mut dyn ReorderHost,
        container: NodeId,
        index: usize,
        siblings: &[NodeId],
        skip: NodeId,
    ) -> bool {
        let Some(node) = self.node else {
            return false;
        };
        let before = siblings.get(index).copied();

        if self.parent == Some(container) && host.is_attached(node) {
            let children = host.children(container);
            let next = children
                .iter()
                .skip_while(|&&c| c != node)
                .skip(1)
                .copied()
                .find(|&c| c != skip);
            if children.contains(&node) && next == before {
                return false;
            }
        }

        host.insert_before(container, node, before);
        self.parent = Some(container);
        true
    }

    /// Detaches and forgets the placeholder. Safe to call repeatedly.
    pub(super) fn remove(&mut self, host: &mut dyn ReorderHost) {
        if let Some(node) = self.node.take() {
            host.remove_node(node);
        }
        self.parent = None;
    }
}
