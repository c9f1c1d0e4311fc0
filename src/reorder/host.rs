use std::time::Duration;

use egui::{Pos2, Rect, Vec2};

/// Opaque handle to a visual node owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct NodeId(pub u64);

/// Scroll state of a node, in the same units as its rect.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub offset: Vec2,

    /// Full extent of the scrolled content.
    pub content_size: Vec2,

    /// Visible extent.
    pub client_size: Vec2,
}

impl ScrollMetrics {
    pub fn max_offset(&self) -> Vec2 {
        (self.content_size - self.client_size).max(Vec2::ZERO)
    }

    pub fn scrollable_x(&self) -> bool {
        self.content_size.x > self.client_size.x
    }

    pub fn scrollable_y(&self) -> bool {
        self.content_size.y > self.client_size.y
    }
}

/// Outer spacing around a node (CSS-style margin).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Spacing {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Spacing {
    pub const ZERO: Self = Self::same(0.0);

    pub const fn same(v: f32) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }

    pub fn sum(&self) -> Vec2 {
        Vec2::new(self.left + self.right, self.top + self.bottom)
    }

    pub fn left_top(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,

    /// Invisible, but still takes up its layout slot.
    Hidden,

    /// Invisible and removed from layout.
    Collapsed,
}

/// Transient nodes the engine asks the host to create.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    /// In-flow stand-in for the dragged item. Starts detached; the engine inserts it.
    Placeholder {
        size: Vec2,

        /// Stretch across the container's cross axis instead of using `size`'s width.
        fill_cross_axis: bool,
        margin: Spacing,
    },

    /// Out-of-flow copy of `source` that follows the pointer. It must not take part in layout
    /// or in [`ReorderHost::node_at`] hit-testing.
    Ghost { source: NodeId, size: Vec2 },
}

/// Everything the engine needs from the UI host.
///
/// Rects are in one shared coordinate space (the one pointer positions are reported in) and
/// include any translation applied through [`Self::set_translation`], like a DOM bounding rect.
/// The engine re-queries on every resolution and never caches answers across calls.
pub trait ReorderHost {
    // Geometry queries:

    /// `None` for detached or collapsed nodes.
    fn rect(&self, node: NodeId) -> Option<Rect>;

    /// `None` for nodes that cannot scroll at all.
    fn scroll_metrics(&self, node: NodeId) -> Option<ScrollMetrics>;

    /// Topmost node under `pos`, ignoring ghost nodes.
    fn node_at(&self, pos: Pos2) -> Option<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn is_attached(&self, node: NodeId) -> bool;

    fn margin(&self, node: NodeId) -> Spacing;

    // Mutation:

    fn create_node(&mut self, kind: NodeKind) -> NodeId;

    /// Moves `node` under `parent`, before `before` or at the end when `before` is `None`.
    fn insert_before(&mut self, parent: NodeId, node: NodeId, before: Option<NodeId>);

    /// Detaches and forgets a node previously returned by [`Self::create_node`].
    fn remove_node(&mut self, node: NodeId);

    fn set_scroll_offset(&mut self, node: NodeId, offset: Vec2);

    /// Visual-only offset. `transition` asks for an eased animation towards `offset`.
    fn set_translation(&mut self, node: NodeId, offset: Vec2, transition: Option<Duration>);

    fn set_opacity(&mut self, node: NodeId, opacity: f32);

    fn set_visibility(&mut self, node: NodeId, visibility: Visibility);

    /// Places an out-of-flow node (the ghost) with its top-left corner at `pos`.
    fn set_position(&mut self, node: NodeId, pos: Pos2);

    fn set_highlighted(&mut self, node: NodeId, highlighted: bool);

    // Frame scheduling:

    /// Ask for one call to [`super::DragReorder::on_animation_frame`] on the next display frame.
    fn request_frame(&mut self);

    fn cancel_frame(&mut self);
}
