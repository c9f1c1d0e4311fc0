use egui::{Pos2, Rect, Vec2};
use itertools::Itertools as _;

use super::host::{NodeId, ReorderHost};
use super::options::HitTestMode;
use super::registry::{ContainerConfig, ContainerRegistry};
use super::types::{Axis, DropTarget};

/// Per-node visual offset the engine itself applied (FLIP translations).
///
/// Subtracting it from the host rect gives the layout slot, which keeps the resolver from
/// chasing siblings that are only animating towards where the resolver already put them.
pub(super) type OffsetOf<'a> = &'a dyn Fn(NodeId) -> Vec2;

pub(super) struct ResolveInput<'a> {
    pub(super) pointer: Pos2,
    pub(super) item_type: &'a str,
    pub(super) pointer_offset: Vec2,
    pub(super) item_size: Vec2,
    pub(super) dragged: NodeId,

    /// Nodes that are never items (placeholder).
    pub(super) excluded: &'a [NodeId],
    pub(super) hit_test: HitTestMode,
}

impl ResolveInput<'_> {
    pub(super) fn ghost_rect(&self) -> Rect {
        Rect::from_min_size(self.pointer - self.pointer_offset, self.item_size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct Resolution {
    pub(super) target: DropTarget,
    pub(super) container_node: NodeId,
    pub(super) axis: Axis,

    /// The container's non-dragged items in on-screen order; `target.index` indexes this.
    pub(super) siblings: Vec<NodeId>,
}

/// Is `node` equal to `ancestor` or nested inside it?
pub(super) fn is_within(host: &dyn ReorderHost, node: NodeId, ancestor: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if n == ancestor {
            return true;
        }
        current = host.parent(n);
    }
    false
}

/// The innermost container under `pointer` that accepts `item_type`.
///
/// Containers that are the dragged node or live inside it never qualify.
pub(super) fn container_under_pointer<'r>(
    registry: &'r ContainerRegistry,
    host: &dyn ReorderHost,
    pointer: Pos2,
    item_type: &str,
    dragged: NodeId,
    mode: HitTestMode,
) -> Option<&'r ContainerConfig> {
    let eligible = |config: &ContainerConfig| {
        config.accepts(item_type) && !is_within(host, config.node, dragged)
    };

    match mode {
        HitTestMode::Rect => registry
            .iter()
            .filter(|config| eligible(config))
            .filter_map(|config| {
                let rect = host.rect(config.node)?;
                rect.contains(pointer).then_some((config, rect.area()))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)))
            .map(|(config, _area)| config),
        HitTestMode::TopmostNode => {
            let mut current = host.node_at(pointer);
            while let Some(node) = current {
                if let Some(config) = registry.by_node(node)
                    && eligible(config)
                {
                    return Some(config);
                }
                current = host.parent(node);
            }
            None
        }
    }
}

pub(super) fn layout_rect(
    host: &dyn ReorderHost,
    node: NodeId,
    offset_of: OffsetOf<'_>,
) -> Option<Rect> {
    host.rect(node).map(|r| r.translate(-offset_of(node)))
}

/// Sort key for on-screen order along `axis`.
fn order_key(axis: Axis, rect: Rect) -> (f32, f32) {
    match axis {
        Axis::Horizontal => (rect.min.x, rect.min.y),
        Axis::Free | Axis::Vertical => (rect.min.y, rect.min.x),
    }
}

/// Laid-out children of `container`, minus `excluded`, in on-screen order.
///
/// Collapsed children have no rect and are not items.
pub(super) fn ordered_items(
    host: &dyn ReorderHost,
    container: NodeId,
    axis: Axis,
    excluded: &[NodeId],
    offset_of: OffsetOf<'_>,
) -> Vec<(NodeId, Rect)> {
    host.children(container)
        .into_iter()
        .filter(|child| !excluded.contains(child))
        .filter_map(|child| Some((child, layout_rect(host, child, offset_of)?)))
        .sorted_by(|a, b| {
            let (ka, kb) = (order_key(axis, a.1), order_key(axis, b.1));
            ka.0.total_cmp(&kb.0).then(ka.1.total_cmp(&kb.1))
        })
        .collect()
}

/// Has the dragged item's trailing edge moved past `item`'s midpoint?
fn trailing_edge_passed(axis: Axis, ghost: Rect, item: Rect) -> bool {
    match axis {
        Axis::Horizontal | Axis::Vertical => {
            axis.main(ghost.max.to_vec2()) > axis.main(item.center().to_vec2())
        }
        // Rows are matched by the ghost centre, columns within a row by the trailing edge.
        Axis::Free => {
            let center = ghost.center();
            center.y > item.max.y || (center.y >= item.min.y && ghost.max.x > item.center().x)
        }
    }
}

/// 50% rule: index of the first item whose midpoint the ghost's trailing edge has not passed,
/// or `items.len()` if it passed them all.
pub(super) fn insertion_index(axis: Axis, items: &[Rect], ghost: Rect) -> usize {
    items
        .iter()
        .position(|&item| !trailing_edge_passed(axis, ghost, item))
        .unwrap_or(items.len())
}

/// Full resolution from scratch: container under the pointer and insertion index within it.
pub(super) fn resolve(
    registry: &ContainerRegistry,
    host: &dyn ReorderHost,
    input: &ResolveInput<'_>,
    offset_of: OffsetOf<'_>,
) -> Option<Resolution> {
    let config = container_under_pointer(
        registry,
        host,
        input.pointer,
        input.item_type,
        input.dragged,
        input.hit_test,
    )?;

    let mut excluded = Vec::with_capacity(input.excluded.len() + 1);
    excluded.push(input.dragged);
    excluded.extend_from_slice(input.excluded);

    let items = ordered_items(host, config.node, config.axis, &excluded, offset_of);
    let rects: Vec<Rect> = items.iter().map(|(_, r)| *r).collect();
    let index = insertion_index(config.axis, &rects, input.ghost_rect());

    Some(Resolution {
        target: DropTarget {
            container_id: config.id.clone(),
            index,
        },
        container_node: config.node,
        axis: config.axis,
        siblings: items.into_iter().map(|(node, _)| node).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(n: usize, h: f32) -> Vec<Rect> {
        (0..n)
            .map(|i| Rect::from_min_size(Pos2::new(0.0, i as f32 * h), Vec2::new(100.0, h)))
            .collect()
    }

    fn ghost_centered_at(center: Pos2, size: Vec2) -> Rect {
        Rect::from_center_size(center, size)
    }

    #[test]
    fn empty_container_yields_zero() {
        let ghost = ghost_centered_at(Pos2::new(50.0, 500.0), Vec2::new(100.0, 50.0));
        assert_eq!(insertion_index(Axis::Vertical, &[], ghost), 0);
        assert_eq!(insertion_index(Axis::Free, &[], ghost), 0);
    }

    #[test]
    fn trailing_edge_not_pointer_decides() {
        // Items at y 0..50 and 50..100 (midpoints 25, 75).
        let items = column(2, 50.0);
        let size = Vec2::new(100.0, 50.0);

        // Centre at 40: trailing edge 65 is past the first midpoint but not the second.
        let ghost = ghost_centered_at(Pos2::new(50.0, 40.0), size);
        assert_eq!(insertion_index(Axis::Vertical, &items, ghost), 1);

        // Centre at 0: trailing edge 25 is not *past* 25.
        let ghost = ghost_centered_at(Pos2::new(50.0, 0.0), size);
        assert_eq!(insertion_index(Axis::Vertical, &items, ghost), 0);

        let ghost = ghost_centered_at(Pos2::new(50.0, 900.0), size);
        assert_eq!(insertion_index(Axis::Vertical, &items, ghost), 2);
    }

    #[test]
    fn horizontal_uses_x_only() {
        let items: Vec<Rect> = (0..3)
            .map(|i| Rect::from_min_size(Pos2::new(i as f32 * 80.0, 0.0), Vec2::new(80.0, 30.0)))
            .collect();
        let ghost = ghost_centered_at(Pos2::new(95.0, 999.0), Vec2::new(80.0, 30.0));
        // Trailing edge at 135: passes midpoints 40 and 120, not 200.
        assert_eq!(insertion_index(Axis::Horizontal, &items, ghost), 2);
    }

    #[test]
    fn free_axis_is_row_major() {
        // 2x2 grid of 50x50 cells.
        let items = vec![
            Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::splat(50.0)),
            Rect::from_min_size(Pos2::new(50.0, 0.0), Vec2::splat(50.0)),
            Rect::from_min_size(Pos2::new(0.0, 50.0), Vec2::splat(50.0)),
            Rect::from_min_size(Pos2::new(50.0, 50.0), Vec2::splat(50.0)),
        ];
        let size = Vec2::splat(50.0);

        // Second row, left cell: first row passed, (0,50) not.
        let ghost = ghost_centered_at(Pos2::new(-10.0, 75.0), size);
        assert_eq!(insertion_index(Axis::Free, &items, ghost), 2);

        // Second row, over the right cell's midpoint.
        let ghost = ghost_centered_at(Pos2::new(60.0, 75.0), size);
        assert_eq!(insertion_index(Axis::Free, &items, ghost), 4);

        // First row, left of everything.
        let ghost = ghost_centered_at(Pos2::new(-20.0, 25.0), size);
        assert_eq!(insertion_index(Axis::Free, &items, ghost), 0);
    }

    #[test]
    fn index_is_always_within_bounds() {
        let size = Vec2::new(100.0, 37.0);
        for n in 0..6 {
            let items = column(n, 37.0);
            for step in -20..60 {
                let ghost = ghost_centered_at(Pos2::new(50.0, step as f32 * 7.0), size);
                for axis in [Axis::Vertical, Axis::Horizontal, Axis::Free] {
                    let index = insertion_index(axis, &items, ghost);
                    assert!(index <= n, "index {index} out of [0, {n}] for {axis:?}");
                }
            }
        }
    }
}
