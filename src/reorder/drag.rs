use egui::{Pos2, Vec2};

use super::geometry;
use super::host::{NodeId, NodeKind, ReorderHost, Visibility};
use super::options::PreviewStrategy;
use super::types::{DragItem, DragSession, DropOutcome, DropTarget, ItemMoveEvent, ReorderEvent};
use super::{ActiveDrag, DragReorder};

impl DragReorder {
    /// Starts a drag of `item` grabbed at `pointer`.
    ///
    /// Returns `false` (and changes nothing) when a drag is already running, or when the item's
    /// parent is not a registered container.
    pub fn pointer_down(
        &mut self,
        host: &mut dyn ReorderHost,
        pointer: Pos2,
        item: DragItem,
    ) -> bool {
        if let Some(active) = &self.active {
            let message = format!(
                "pointer_down ignored: item={} while dragging {}",
                item.id, active.session.item_id
            );
            log::debug!("{message}");
            self.debug_log_event(message);
            return false;
        }

        let Some(container_node) = host.parent(item.node) else {
            log::debug!("pointer_down ignored: item {} is detached", item.id);
            return false;
        };
        let Some(config) = self.registry.by_node(container_node) else {
            log::debug!(
                "pointer_down ignored: parent {container_node:?} of item {} is not a registered container",
                item.id
            );
            return false;
        };
        let (container_id, axis) = (config.id.clone(), config.axis);
        let Some(item_rect) = host.rect(item.node) else {
            log::debug!("pointer_down ignored: item {} has no layout", item.id);
            return false;
        };

        let source_index =
            geometry::ordered_items(&*host, container_node, axis, &[], &|_| Vec2::ZERO)
                .iter()
                .position(|(node, _)| *node == item.node)
                .unwrap_or(0);

        let session = DragSession {
            item_id: item.id,
            item_type: item.item_type,
            item_node: item.node,
            source_container_id: container_id,
            source_index,
            pointer_offset: pointer - item_rect.min,
            item_size: item_rect.size(),
        };
        let item_margin = host.margin(item.node);

        match self.options.preview {
            PreviewStrategy::Placeholder => {
                let siblings: Vec<NodeId> = geometry::ordered_items(
                    &*host,
                    container_node,
                    axis,
                    &[item.node],
                    &|_| Vec2::ZERO,
                )
                .into_iter()
                .map(|(node, _)| node)
                .collect();
                self.placeholder
                    .create(host, session.item_size, item_margin, axis);
                self.placeholder.move_to(
                    host,
                    container_node,
                    source_index.min(siblings.len()),
                    &siblings,
                    item.node,
                );
                host.set_visibility(item.node, Visibility::Collapsed);
            }
            PreviewStrategy::Flip => host.set_visibility(item.node, Visibility::Hidden),
        }

        let ghost = host.create_node(NodeKind::Ghost {
            source: item.node,
            size: session.item_size,
        });
        host.set_position(ghost, item_rect.min);
        host.set_opacity(ghost, self.options.ghost_opacity);

        let line = self.session_log.start(self.debug_frame, &session);
        log::debug!("{line}");
        self.debug_log_event(line);

        self.active = Some(ActiveDrag {
            session,
            item_margin,
            ghost: Some(ghost),
            pointer,
            target: None,
            highlighted: None,
        });

        // Usually lands on the source slot, but only if the source accepts its own item type.
        self.refresh(host);
        self.auto_scroll.start(host, pointer);
        true
    }

    /// Follows the pointer: moves the ghost and re-resolves the drop target.
    pub fn pointer_move(&mut self, host: &mut dyn ReorderHost, pointer: Pos2) {
        let Some(active) = &mut self.active else {
            return;
        };
        active.pointer = pointer;
        if let Some(ghost) = active.ghost {
            host.set_position(ghost, pointer - active.session.pointer_offset);
        }
        self.auto_scroll.set_pointer(pointer);
        self.session_log.observe_move();
        self.refresh(host);
    }

    /// Ends the drag at `pointer`.
    ///
    /// The preview is brought up to date at `pointer` and the target it shows is committed:
    /// every transient node and style is torn down, and then at most one callback fires. The
    /// same outcome is returned so callers without callbacks can apply it themselves.
    pub fn pointer_up(&mut self, host: &mut dyn ReorderHost, pointer: Pos2) -> Option<DropOutcome> {
        let active = self.active.as_mut()?;
        active.pointer = pointer;
        self.refresh(host);
        let active = self.active.take()?;

        self.teardown(host, &active);

        let outcome = self.outcome_for(&active.session, active.target.clone());
        let kind = match &outcome {
            None => "cancel",
            Some(DropOutcome::Reorder(_)) => "reorder",
            Some(DropOutcome::Move(_)) => "move",
        };
        if let Some(outcome) = &outcome {
            self.dispatch(&active.session, outcome);
        }

        if let Some(line) = self.session_log.end(self.debug_frame, kind) {
            log::debug!("{line}");
            self.debug_log_event(line);
        }
        outcome
    }

    /// Restores everything the drag touched. Runs on every exit path, before any callback.
    fn teardown(&mut self, host: &mut dyn ReorderHost, active: &ActiveDrag) {
        self.placeholder.remove(host);
        self.displacement.clear(host);
        if host.is_attached(active.session.item_node) {
            host.set_visibility(active.session.item_node, Visibility::Visible);
        }
        if let Some(ghost) = active.ghost {
            host.remove_node(ghost);
        }
        if let Some(container) = active.highlighted {
            host.set_highlighted(container, false);
        }
        self.auto_scroll.stop(host);
    }

    fn outcome_for(&self, session: &DragSession, target: Option<DropTarget>) -> Option<DropOutcome> {
        let target = target?;
        self.registry.lookup(&target.container_id)?;

        if target.container_id == session.source_container_id {
            (target.index != session.source_index).then(|| {
                DropOutcome::Reorder(ReorderEvent {
                    item_id: session.item_id.clone(),
                    from_index: session.source_index,
                    to_index: target.index,
                })
            })
        } else {
            Some(DropOutcome::Move(ItemMoveEvent {
                item_id: session.item_id.clone(),
                from_container_id: session.source_container_id.clone(),
                to_container_id: target.container_id,
                from_index: session.source_index,
                to_index: target.index,
            }))
        }
    }

    /// Reorders go to the source container, moves to the receiving one.
    fn dispatch(&mut self, session: &DragSession, outcome: &DropOutcome) {
        match outcome {
            DropOutcome::Reorder(event) => {
                if let Some(callback) = self
                    .registry
                    .lookup_mut(&session.source_container_id)
                    .and_then(|config| config.on_reorder.as_mut())
                {
                    callback(event);
                }
            }
            DropOutcome::Move(event) => {
                if let Some(callback) = self
                    .registry
                    .lookup_mut(&event.to_container_id)
                    .and_then(|config| config.on_item_move.as_mut())
                {
                    callback(event);
                }
            }
        }
    }
}
