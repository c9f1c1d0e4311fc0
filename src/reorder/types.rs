use egui::Vec2;

use super::host::NodeId;

/// Caller-chosen id of a registered container.
pub type ContainerId = String;

/// Caller-chosen id of a draggable item.
pub type ItemId = String;

/// Which on-screen dimension governs ordering inside a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Axis {
    /// Row-major: top-then-left, for wrapping grids.
    Free,
    Horizontal,
    #[default]
    Vertical,
}

impl Axis {
    /// Component of `v` along this axis. `Free` containers stack rows vertically.
    pub fn main(self, v: Vec2) -> f32 {
        match self {
            Self::Horizontal => v.x,
            Self::Free | Self::Vertical => v.y,
        }
    }
}

/// What the host hands the engine on pointer-down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragItem {
    pub id: ItemId,

    /// Type tag matched against [`super::ContainerConfig::accepted_types`].
    pub item_type: String,

    /// The item's visual node. Its parent must be a registered container.
    pub node: NodeId,
}

impl DragItem {
    pub fn new(id: impl Into<ItemId>, item_type: impl Into<String>, node: NodeId) -> Self {
        Self {
            id: id.into(),
            item_type: item_type.into(),
            node,
        }
    }
}

/// Snapshot taken when a drag starts. Never mutated while the drag runs.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub item_id: ItemId,
    pub item_type: String,
    pub item_node: NodeId,
    pub source_container_id: ContainerId,

    /// The item's own position in source order at grab time.
    pub source_index: usize,

    /// Pointer position relative to the item's top-left corner at grab time.
    pub pointer_offset: Vec2,

    /// Item width/height at grab time.
    pub item_size: Vec2,
}

/// Where the dragged item would land if released now.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DropTarget {
    pub container_id: ContainerId,

    /// Insertion index into the container's items, not counting the dragged item.
    pub index: usize,
}

/// An item changed position inside its own container.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ReorderEvent {
    pub item_id: ItemId,
    pub from_index: usize,
    pub to_index: usize,
}

impl ReorderEvent {
    /// Performs the reorder on a caller-owned list.
    ///
    /// `to_index` counts positions after the item was taken out, so this is remove-then-insert.
    pub fn apply<T>(&self, list: &mut Vec<T>) {
        if self.from_index >= list.len() {
            return;
        }
        let item = list.remove(self.from_index);
        let to = self.to_index.min(list.len());
        list.insert(to, item);
    }
}

/// An item left one container for another.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ItemMoveEvent {
    pub item_id: ItemId,
    pub from_container_id: ContainerId,
    pub to_container_id: ContainerId,
    pub from_index: usize,
    pub to_index: usize,
}

impl ItemMoveEvent {
    /// Moves the entry at `from_index` in `from` to `to_index` in `to`.
    pub fn apply<T>(&self, from: &mut Vec<T>, to: &mut Vec<T>) {
        if self.from_index >= from.len() {
            return;
        }
        let item = from.remove(self.from_index);
        let at = self.to_index.min(to.len());
        to.insert(at, item);
    }
}

/// The structural result of a completed gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DropOutcome {
    Reorder(ReorderEvent),
    Move(ItemMoveEvent),
}

impl DropOutcome {
    pub fn item_id(&self) -> &str {
        match self {
            Self::Reorder(ev) => &ev.item_id,
            Self::Move(ev) => &ev.item_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_apply_is_remove_then_insert() {
        let mut list = vec!["a", "b", "c"];
        ReorderEvent {
            item_id: "a".to_owned(),
            from_index: 0,
            to_index: 1,
        }
        .apply(&mut list);
        assert_eq!(list, ["b", "a", "c"]);

        ReorderEvent {
            item_id: "c".to_owned(),
            from_index: 2,
            to_index: 0,
        }
        .apply(&mut list);
        assert_eq!(list, ["c", "b", "a"]);
    }

    #[test]
    fn move_apply_clamps_to_destination_length() {
        let mut src = vec!["x", "y"];
        let mut dst: Vec<&str> = Vec::new();
        ItemMoveEvent {
            item_id: "y".to_owned(),
            from_container_id: "src".to_owned(),
            to_container_id: "dst".to_owned(),
            from_index: 1,
            to_index: 5,
        }
        .apply(&mut src, &mut dst);
        assert_eq!(src, ["x"]);
        assert_eq!(dst, ["y"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn outcome_serializes_with_variant_tag() {
        let outcome = DropOutcome::Move(ItemMoveEvent {
            item_id: "x".to_owned(),
            from_container_id: "src".to_owned(),
            to_container_id: "dst".to_owned(),
            from_index: 0,
            to_index: 0,
        });
        let json = serde_json::to_value(&outcome).expect("outcome must serialize");
        assert_eq!(json["Move"]["to_container_id"], "dst");
    }
}
