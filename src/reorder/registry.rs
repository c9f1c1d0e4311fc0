use std::collections::BTreeMap;

use super::host::NodeId;
use super::types::{Axis, ContainerId, ItemMoveEvent, ReorderEvent};

pub type ReorderCallback = Box<dyn FnMut(&ReorderEvent)>;
pub type ItemMoveCallback = Box<dyn FnMut(&ItemMoveEvent)>;

/// A drop region: which item types it takes, how it orders them, and who to tell.
pub struct ContainerConfig {
    pub id: ContainerId,
    pub accepted_types: ahash::HashSet<String>,
    pub axis: Axis,

    /// Visual root whose children are the container's items. Owned by the caller.
    pub node: NodeId,

    /// Called when an item is dropped back into this container at a different index.
    pub on_reorder: Option<ReorderCallback>,

    /// Called when an item from another container is dropped into this one.
    pub on_item_move: Option<ItemMoveCallback>,
}

impl ContainerConfig {
    pub fn new(id: impl Into<ContainerId>, node: NodeId) -> Self {
        Self {
            id: id.into(),
            accepted_types: Default::default(),
            axis: Axis::default(),
            node,
            on_reorder: None,
            on_item_move: None,
        }
    }

    #[must_use]
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn accept(mut self, item_type: impl Into<String>) -> Self {
        self.accepted_types.insert(item_type.into());
        self
    }

    #[must_use]
    pub fn with_reorder_callback(mut self, callback: impl FnMut(&ReorderEvent) + 'static) -> Self {
        self.on_reorder = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn with_move_callback(mut self, callback: impl FnMut(&ItemMoveEvent) + 'static) -> Self {
        self.on_item_move = Some(Box::new(callback));
        self
    }

    pub fn accepts(&self, item_type: &str) -> bool {
        self.accepted_types.contains(item_type)
    }
}

impl std::fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut accepted: Vec<&str> = self.accepted_types.iter().map(String::as_str).collect();
        accepted.sort_unstable();
        f.debug_struct("ContainerConfig")
            .field("id", &self.id)
            .field("accepted_types", &accepted)
            .field("axis", &self.axis)
            .field("node", &self.node)
            .field("on_reorder", &self.on_reorder.is_some())
            .field("on_item_move", &self.on_item_move.is_some())
            .finish()
    }
}

/// Result of [`ContainerRegistry::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    Replaced,

    /// Another node is still attached under the same id; nothing changed.
    Rejected,
}

/// Live container configurations, at most one per id.
#[derive(Debug, Default)]
pub struct ContainerRegistry {
    containers: BTreeMap<ContainerId, ContainerConfig>,
}

impl ContainerRegistry {
    /// Upserts `config` by id.
    ///
    /// A config backed by a different node is refused while the currently registered node is
    /// still attached (a transient duplicate, e.g. a portal copy, must not steal the id).
    pub fn register(
        &mut self,
        config: ContainerConfig,
        is_attached: impl Fn(NodeId) -> bool,
    ) -> Registration {
        match self.containers.get(&config.id) {
            Some(existing) if existing.node != config.node && is_attached(existing.node) => {
                log::warn!(
                    "container {:?}: rejected registration of {:?}, {:?} is still attached",
                    config.id,
                    config.node,
                    existing.node
                );
                Registration::Rejected
            }
            Some(_) => {
                self.containers.insert(config.id.clone(), config);
                Registration::Replaced
            }
            None => {
                self.containers.insert(config.id.clone(), config);
                Registration::Inserted
            }
        }
    }

    /// Removes `id`, but only if `node` is `None` or matches the registered node.
    pub fn unregister(&mut self, id: &str, node: Option<NodeId>) -> bool {
        let matches = self
            .containers
            .get(id)
            .is_some_and(|existing| node.is_none_or(|node| node == existing.node));
        if matches {
            self.containers.remove(id);
        }
        matches
    }

    pub fn lookup(&self, id: &str) -> Option<&ContainerConfig> {
        self.containers.get(id)
    }

    pub(super) fn lookup_mut(&mut self, id: &str) -> Option<&mut ContainerConfig> {
        self.containers.get_mut(id)
    }

    pub fn by_node(&self, node: NodeId) -> Option<&ContainerConfig> {
        self.containers.values().find(|c| c.node == node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContainerConfig> {
        self.containers.values()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached(_: NodeId) -> bool {
        true
    }

    fn detached(_: NodeId) -> bool {
        false
    }

    #[test]
    fn register_is_an_upsert_for_the_same_node() {
        let mut registry = ContainerRegistry::default();
        let node = NodeId(1);
        assert_eq!(
            registry.register(ContainerConfig::new("col", node), attached),
            Registration::Inserted
        );
        assert_eq!(
            registry.register(
                ContainerConfig::new("col", node).with_axis(Axis::Horizontal),
                attached
            ),
            Registration::Replaced
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.lookup("col").map(|c| c.axis),
            Some(Axis::Horizontal)
        );
    }

    #[test]
    fn duplicate_node_is_rejected_while_previous_is_attached() {
        let mut registry = ContainerRegistry::default();
        registry.register(ContainerConfig::new("col", NodeId(1)), attached);

        let outcome = registry.register(ContainerConfig::new("col", NodeId(2)), attached);
        assert_eq!(outcome, Registration::Rejected);
        assert_eq!(registry.lookup("col").map(|c| c.node), Some(NodeId(1)));

        let outcome = registry.register(ContainerConfig::new("col", NodeId(2)), detached);
        assert_eq!(outcome, Registration::Replaced);
        assert_eq!(registry.lookup("col").map(|c| c.node), Some(NodeId(2)));
    }

    #[test]
    fn stale_unregister_does_not_remove_fresh_registration() {
        let mut registry = ContainerRegistry::default();
        registry.register(ContainerConfig::new("col", NodeId(1)), attached);
        registry.register(ContainerConfig::new("col", NodeId(2)), detached);

        assert!(!registry.unregister("col", Some(NodeId(1))));
        assert!(registry.lookup("col").is_some());

        assert!(registry.unregister("col", Some(NodeId(2))));
        assert!(registry.lookup("col").is_none());
        assert!(!registry.unregister("col", None));
    }

    #[test]
    fn unregister_without_node_always_removes() {
        let mut registry = ContainerRegistry::default();
        registry.register(ContainerConfig::new("a", NodeId(7)), attached);
        assert!(registry.unregister("a", None));
        assert!(registry.is_empty());
    }

    #[test]
    fn by_node_and_accepts() {
        let mut registry = ContainerRegistry::default();
        registry.register(
            ContainerConfig::new("a", NodeId(7)).accept("card"),
            attached,
        );
        let config = registry.by_node(NodeId(7)).expect("registered by node");
        assert!(config.accepts("card"));
        assert!(!config.accepts("column"));
        assert!(registry.by_node(NodeId(8)).is_none());
    }
}
