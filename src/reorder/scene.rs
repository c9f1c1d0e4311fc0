use std::collections::BTreeMap;
use std::time::Duration;

use egui::{Pos2, Rect, Vec2};

use super::host::{NodeId, NodeKind, ReorderHost, ScrollMetrics, Spacing, Visibility};
use super::types::Axis;

/// What a [`Scene`] node is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneRole {
    /// Added by the caller: containers, items, panels.
    Element,
    Placeholder,
    Ghost,
}

#[derive(Clone, Debug)]
struct SceneNode {
    role: SceneRole,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    label: String,

    size: Vec2,
    fill_cross_axis: bool,
    margin: Spacing,

    /// How this node lays out its own children.
    axis: Axis,
    scrollable: bool,
    scroll_offset: Vec2,

    translation: Vec2,
    transition: Option<Duration>,
    opacity: f32,
    visibility: Visibility,
    highlighted: bool,

    /// Top-left corner of out-of-flow nodes.
    position: Pos2,
}

impl SceneNode {
    fn new(role: SceneRole, size: Vec2) -> Self {
        Self {
            role,
            parent: None,
            children: Vec::new(),
            label: String::new(),
            size,
            fill_cross_axis: false,
            margin: Spacing::ZERO,
            axis: Axis::Vertical,
            scrollable: false,
            scroll_offset: Vec2::ZERO,
            translation: Vec2::ZERO,
            transition: None,
            opacity: 1.0,
            visibility: Visibility::Visible,
            highlighted: false,
            position: Pos2::ZERO,
        }
    }
}

/// One visible node, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenePaint {
    pub node: NodeId,
    pub role: SceneRole,
    pub rect: Rect,

    /// Intersection of all scrolling ancestors' rects.
    pub clip: Rect,
    pub label: String,
    pub opacity: f32,
    pub highlighted: bool,
    pub depth: usize,
}

/// A small retained node tree implementing [`ReorderHost`].
///
/// Nodes have fixed sizes and stack their children along their [`Axis`] (wrapping into rows
/// for [`Axis::Free`]). Scrolling shifts children and clips them; translations shift a node
/// and its subtree visually. Ghost nodes float above everything and never hit-test.
///
/// Good enough to drive an egui painter, and deterministic enough for tests.
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: BTreeMap<NodeId, SceneNode>,
    root: NodeId,
    overlays: Vec<NodeId>,
    next_id: u64,
    frame_requested: bool,
}

impl Scene {
    /// An empty scene whose root covers `size` at the origin.
    pub fn new(size: Vec2) -> Self {
        let root = NodeId(0);
        let mut nodes = BTreeMap::new();
        let mut node = SceneNode::new(SceneRole::Element, size);
        node.label = "root".to_owned();
        nodes.insert(root, node);
        Self {
            nodes,
            root,
            overlays: Vec::new(),
            next_id: 1,
            frame_requested: false,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    /// Appends a new element of `size` under `parent`.
    pub fn add(&mut self, parent: NodeId, size: Vec2, label: impl Into<String>) -> NodeId {
        let mut node = SceneNode::new(SceneRole::Element, size);
        node.label = label.into();
        let id = self.alloc(node);
        self.insert_before(parent, id, None);
        id
    }

    pub fn set_axis(&mut self, node: NodeId, axis: Axis) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.axis = axis;
        }
    }

    pub fn set_margin(&mut self, node: NodeId, margin: Spacing) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.margin = margin;
        }
    }

    pub fn set_scrollable(&mut self, node: NodeId, scrollable: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.scrollable = scrollable;
        }
    }

    pub fn set_size(&mut self, node: NodeId, size: Vec2) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.size = size;
        }
    }

    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.label.as_str())
    }

    pub fn role(&self, node: NodeId) -> Option<SceneRole> {
        self.nodes.get(&node).map(|n| n.role)
    }

    pub fn scroll_offset(&self, node: NodeId) -> Vec2 {
        self.nodes
            .get(&node)
            .map(|n| n.scroll_offset)
            .unwrap_or(Vec2::ZERO)
    }

    pub fn translation(&self, node: NodeId) -> Vec2 {
        self.nodes
            .get(&node)
            .map(|n| n.translation)
            .unwrap_or(Vec2::ZERO)
    }

    /// Transition requested with the most recent translation of `node`.
    pub fn last_transition(&self, node: NodeId) -> Option<Duration> {
        self.nodes.get(&node).and_then(|n| n.transition)
    }

    pub fn opacity(&self, node: NodeId) -> f32 {
        self.nodes.get(&node).map(|n| n.opacity).unwrap_or(0.0)
    }

    pub fn visibility(&self, node: NodeId) -> Visibility {
        self.nodes
            .get(&node)
            .map(|n| n.visibility)
            .unwrap_or(Visibility::Collapsed)
    }

    pub fn is_highlighted(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.highlighted)
    }

    /// Every live node with `role`, in creation order.
    pub fn nodes_with_role(&self, role: SceneRole) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.role == role)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Labels of `node`'s children in document order.
    pub fn child_labels(&self, node: NodeId) -> Vec<String> {
        self.children(node)
            .iter()
            .filter_map(|c| self.label(*c).map(str::to_owned))
            .collect()
    }

    /// Moves `node` to position `index` among `parent`'s other children.
    pub fn move_to_index(&mut self, node: NodeId, parent: NodeId, index: usize) {
        self.detach(node);
        let before = self
            .nodes
            .get(&parent)
            .and_then(|p| p.children.get(index).copied());
        self.insert_before(parent, node, before);
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Consumes a pending frame request, as a host's frame loop would.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.nodes.get_mut(&node).and_then(|n| n.parent.take());
        if let Some(parent) = parent
            && let Some(p) = self.nodes.get_mut(&parent)
        {
            p.children.retain(|&c| c != node);
        }
    }

    /// Untranslated rects of the laid-out children of `parent`, whose own rect is `parent_rect`.
    fn layout_children(&self, parent: NodeId, parent_rect: Rect) -> Vec<(NodeId, Rect)> {
        let Some(p) = self.nodes.get(&parent) else {
            return Vec::new();
        };
        let origin = parent_rect.min - p.scroll_offset;
        let width = parent_rect.width();

        let mut cursor = Vec2::ZERO;
        let mut row_height = 0.0_f32;
        let mut out = Vec::with_capacity(p.children.len());

        for &child in &p.children {
            let Some(c) = self.nodes.get(&child) else {
                continue;
            };
            if c.visibility == Visibility::Collapsed {
                continue;
            }
            let mut size = c.size;
            if c.fill_cross_axis && p.axis == Axis::Vertical {
                size.x = (width - c.margin.left - c.margin.right).max(0.0);
            }
            let outer = size + c.margin.sum();

            let slot = match p.axis {
                Axis::Vertical => {
                    let slot = Vec2::new(0.0, cursor.y);
                    cursor.y += outer.y;
                    slot
                }
                Axis::Horizontal => {
                    let slot = Vec2::new(cursor.x, 0.0);
                    cursor.x += outer.x;
                    slot
                }
                Axis::Free => {
                    if cursor.x > 0.0 && cursor.x + outer.x > width {
                        cursor.x = 0.0;
                        cursor.y += row_height;
                        row_height = 0.0;
                    }
                    let slot = cursor;
                    cursor.x += outer.x;
                    row_height = row_height.max(outer.y);
                    slot
                }
            };
            let min = origin + slot + c.margin.left_top();
            out.push((child, Rect::from_min_size(min, size)));
        }
        out
    }

    fn rect_of(&self, node: NodeId) -> Option<Rect> {
        let n = self.nodes.get(&node)?;
        if n.role == SceneRole::Ghost {
            return self
                .overlays
                .contains(&node)
                .then(|| Rect::from_min_size(n.position, n.size));
        }
        if n.visibility == Visibility::Collapsed {
            return None;
        }
        if node == self.root {
            return Some(Rect::from_min_size(Pos2::ZERO, n.size).translate(n.translation));
        }
        let parent_rect = self.rect_of(n.parent?)?;
        self.layout_children(n.parent?, parent_rect)
            .into_iter()
            .find(|(child, _)| *child == node)
            .map(|(_, rect)| rect.translate(n.translation))
    }

    fn content_size(&self, node: NodeId) -> Vec2 {
        let Some(n) = self.nodes.get(&node) else {
            return Vec2::ZERO;
        };
        let frame = Rect::from_min_size(Pos2::ZERO, n.size);
        let origin = frame.min - n.scroll_offset;
        self.layout_children(node, frame)
            .into_iter()
            .fold(Vec2::ZERO, |acc, (child, rect)| {
                let margin = self.margin(child);
                let far = rect.max - origin + Vec2::new(margin.right, margin.bottom);
                acc.max(far)
            })
    }

    fn hit(&self, node: NodeId, rect: Rect, pos: Pos2) -> Option<NodeId> {
        if !rect.contains(pos) {
            return None;
        }
        for (child, child_rect) in self.layout_children(node, rect).into_iter().rev() {
            let Some(c) = self.nodes.get(&child) else {
                continue;
            };
            if c.visibility == Visibility::Hidden {
                continue;
            }
            if let Some(hit) = self.hit(child, child_rect.translate(c.translation), pos) {
                return Some(hit);
            }
        }
        Some(node)
    }

    /// Every visible node with its rect and clip, parents before children, ghosts last.
    pub fn paint_list(&self) -> Vec<ScenePaint> {
        let mut out = Vec::new();
        if let Some(rect) = self.rect_of(self.root) {
            self.collect_paint(self.root, rect, Rect::EVERYTHING, 0, &mut out);
        }
        for &ghost in &self.overlays {
            if let (Some(n), Some(rect)) = (self.nodes.get(&ghost), self.rect_of(ghost)) {
                out.push(ScenePaint {
                    node: ghost,
                    role: n.role,
                    rect,
                    clip: Rect::EVERYTHING,
                    label: n.label.clone(),
                    opacity: n.opacity,
                    highlighted: false,
                    depth: 0,
                });
            }
        }
        out
    }

    fn collect_paint(
        &self,
        node: NodeId,
        rect: Rect,
        clip: Rect,
        depth: usize,
        out: &mut Vec<ScenePaint>,
    ) {
        let Some(n) = self.nodes.get(&node) else {
            return;
        };
        if n.visibility == Visibility::Visible {
            out.push(ScenePaint {
                node,
                role: n.role,
                rect,
                clip,
                label: n.label.clone(),
                opacity: n.opacity,
                highlighted: n.highlighted,
                depth,
            });
        }
        let child_clip = if n.scrollable {
            clip.intersect(rect)
        } else {
            clip
        };
        for (child, child_rect) in self.layout_children(node, rect) {
            let translated = child_rect.translate(self.translation(child));
            self.collect_paint(child, translated, child_clip, depth + 1, out);
        }
    }
}

impl ReorderHost for Scene {
    fn rect(&self, node: NodeId) -> Option<Rect> {
        self.rect_of(node)
    }

    fn scroll_metrics(&self, node: NodeId) -> Option<ScrollMetrics> {
        let n = self.nodes.get(&node)?;
        n.scrollable.then(|| ScrollMetrics {
            offset: n.scroll_offset,
            content_size: self.content_size(node),
            client_size: n.size,
        })
    }

    fn node_at(&self, pos: Pos2) -> Option<NodeId> {
        let rect = self.rect_of(self.root)?;
        self.hit(self.root, rect, pos)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn is_attached(&self, node: NodeId) -> bool {
        if self.overlays.contains(&node) {
            return true;
        }
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.root {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    fn margin(&self, node: NodeId) -> Spacing {
        self.nodes
            .get(&node)
            .map(|n| n.margin)
            .unwrap_or(Spacing::ZERO)
    }

    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        match kind {
            NodeKind::Placeholder {
                size,
                fill_cross_axis,
                margin,
            } => {
                let mut node = SceneNode::new(SceneRole::Placeholder, size);
                node.label = "placeholder".to_owned();
                node.fill_cross_axis = fill_cross_axis;
                node.margin = margin;
                self.alloc(node)
            }
            NodeKind::Ghost { source, size } => {
                let mut node = SceneNode::new(SceneRole::Ghost, size);
                node.label = self.label(source).unwrap_or_default().to_owned();
                let id = self.alloc(node);
                self.overlays.push(id);
                id
            }
        }
    }

    fn insert_before(&mut self, parent: NodeId, node: NodeId, before: Option<NodeId>) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&node) {
            return;
        }
        self.detach(node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            let at = before
                .and_then(|b| p.children.iter().position(|&c| c == b))
                .unwrap_or(p.children.len());
            p.children.insert(at, node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = Some(parent);
        }
    }

    fn remove_node(&mut self, node: NodeId) {
        self.detach(node);
        self.overlays.retain(|&n| n != node);
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&n) {
                stack.extend(removed.children);
            }
        }
    }

    fn set_scroll_offset(&mut self, node: NodeId, offset: Vec2) {
        let Some(metrics) = self.scroll_metrics(node) else {
            return;
        };
        let clamped = offset.clamp(Vec2::ZERO, metrics.max_offset());
        if let Some(n) = self.nodes.get_mut(&node) {
            n.scroll_offset = clamped;
        }
    }

    fn set_translation(&mut self, node: NodeId, offset: Vec2, transition: Option<Duration>) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.translation = offset;
            n.transition = transition;
        }
    }

    fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.opacity = opacity;
        }
    }

    fn set_visibility(&mut self, node: NodeId, visibility: Visibility) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.visibility = visibility;
        }
    }

    fn set_position(&mut self, node: NodeId, pos: Pos2) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.position = pos;
        }
    }

    fn set_highlighted(&mut self, node: NodeId, highlighted: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.highlighted = highlighted;
        }
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    fn cancel_frame(&mut self) {
        self.frame_requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> (Scene, NodeId, Vec<NodeId>) {
        let mut scene = Scene::new(Vec2::new(400.0, 300.0));
        let col = scene.add(scene.root(), Vec2::new(200.0, 300.0), "col");
        let items = ["a", "b", "c"]
            .into_iter()
            .map(|label| scene.add(col, Vec2::new(200.0, 50.0), label))
            .collect();
        (scene, col, items)
    }

    #[test]
    fn vertical_stacking_with_margins() {
        let (mut scene, _col, items) = column();
        scene.set_margin(items[1], Spacing::same(5.0));

        assert_eq!(
            scene.rect(items[0]),
            Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(200.0, 50.0)))
        );
        assert_eq!(
            scene.rect(items[1]),
            Some(Rect::from_min_size(Pos2::new(5.0, 55.0), Vec2::new(200.0, 50.0)))
        );
        assert_eq!(scene.rect(items[2]).map(|r| r.min.y), Some(110.0));
    }

    #[test]
    fn collapsed_nodes_leave_layout_and_hidden_ones_keep_their_slot() {
        let (mut scene, _col, items) = column();

        scene.set_visibility(items[0], Visibility::Hidden);
        assert_eq!(scene.rect(items[1]).map(|r| r.min.y), Some(50.0));
        assert_eq!(scene.node_at(Pos2::new(10.0, 10.0)), scene.parent(items[0]));

        scene.set_visibility(items[0], Visibility::Collapsed);
        assert_eq!(scene.rect(items[0]), None);
        assert_eq!(scene.rect(items[1]).map(|r| r.min.y), Some(0.0));
    }

    #[test]
    fn scrolling_shifts_children_and_clamps() {
        let (mut scene, col, items) = column();
        scene.set_size(col, Vec2::new(200.0, 100.0));
        scene.set_scrollable(col, true);

        let metrics = scene.scroll_metrics(col).expect("scrollable");
        assert_eq!(metrics.content_size, Vec2::new(200.0, 150.0));

        scene.set_scroll_offset(col, Vec2::new(0.0, 500.0));
        assert_eq!(scene.scroll_offset(col), Vec2::new(0.0, 50.0));
        assert_eq!(scene.rect(items[0]).map(|r| r.min.y), Some(-50.0));
    }

    #[test]
    fn free_axis_wraps_into_rows() {
        let mut scene = Scene::new(Vec2::new(400.0, 400.0));
        let grid = scene.add(scene.root(), Vec2::new(100.0, 400.0), "grid");
        scene.set_axis(grid, Axis::Free);
        let cells: Vec<NodeId> = (0..3)
            .map(|i| scene.add(grid, Vec2::splat(50.0), format!("{i}")))
            .collect();

        assert_eq!(scene.rect(cells[1]).map(|r| r.min), Some(Pos2::new(50.0, 0.0)));
        assert_eq!(scene.rect(cells[2]).map(|r| r.min), Some(Pos2::new(0.0, 50.0)));
    }

    #[test]
    fn placeholder_fills_vertical_parent_and_ghost_never_hits() {
        let (mut scene, col, items) = column();
        let placeholder = scene.create_node(NodeKind::Placeholder {
            size: Vec2::new(120.0, 30.0),
            fill_cross_axis: true,
            margin: Spacing::ZERO,
        });
        scene.insert_before(col, placeholder, Some(items[1]));
        assert_eq!(scene.rect(placeholder).map(|r| r.width()), Some(200.0));
        assert_eq!(scene.rect(items[1]).map(|r| r.min.y), Some(80.0));

        let ghost = scene.create_node(NodeKind::Ghost {
            source: items[0],
            size: Vec2::new(200.0, 50.0),
        });
        scene.set_position(ghost, Pos2::new(0.0, 200.0));
        assert!(scene.is_attached(ghost));
        assert_eq!(scene.label(ghost), Some("a"));
        assert_eq!(scene.node_at(Pos2::new(10.0, 210.0)), Some(col));

        scene.remove_node(ghost);
        scene.remove_node(placeholder);
        assert!(!scene.is_attached(ghost));
        assert_eq!(scene.child_labels(col), ["a", "b", "c"]);
    }

    #[test]
    fn move_to_index_reorders_children() {
        let (mut scene, col, items) = column();
        scene.move_to_index(items[0], col, 2);
        assert_eq!(scene.child_labels(col), ["b", "c", "a"]);
        scene.move_to_index(items[0], col, 0);
        assert_eq!(scene.child_labels(col), ["a", "b", "c"]);
    }
}
