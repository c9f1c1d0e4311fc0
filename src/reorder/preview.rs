use egui::{Pos2, Rect, Vec2};

use super::displacement::{next_free_slot, plan_closing_gap, plan_opening_gap, plan_within};
use super::geometry::{self, Resolution, ResolveInput};
use super::host::{NodeId, ReorderHost};
use super::options::PreviewStrategy;
use super::types::{Axis, DropTarget};
use super::{ActiveDrag, DragReorder};

/// Upper bound on resolve-and-show rounds in one [`DragReorder::refresh`].
const SETTLE_PASSES: usize = 16;

impl DragReorder {
    /// Resolves `active` as if the pointer were at `pointer`.
    pub(super) fn resolve_at(
        &self,
        host: &dyn ReorderHost,
        active: &ActiveDrag,
        pointer: Pos2,
    ) -> Option<Resolution> {
        let excluded: Vec<NodeId> = self
            .placeholder
            .node()
            .into_iter()
            .chain(active.ghost)
            .collect();
        let input = ResolveInput {
            pointer,
            item_type: &active.session.item_type,
            pointer_offset: active.session.pointer_offset,
            item_size: active.session.item_size,
            dragged: active.session.item_node,
            excluded: &excluded,
            hit_test: self.options.hit_test,
        };
        geometry::resolve(&self.registry, host, &input, &|node| {
            self.displacement.offset(node)
        })
    }

    /// Re-resolves at the current pointer and brings the preview in line with the result.
    ///
    /// Showing a target can reflow the container (a wrapping row re-wraps around the
    /// placeholder), after which the same pointer resolves elsewhere. The preview is applied
    /// again until the answer stops changing or comes back to a target already shown during
    /// this call; either way the shown target is the one [`Self::pointer_up`] commits.
    pub(super) fn refresh(&mut self, host: &mut dyn ReorderHost) {
        let Some(initial) = self.active.as_ref().map(|active| active.target.clone()) else {
            return;
        };

        let mut shown: Vec<Option<DropTarget>> = Vec::new();
        for _ in 0..SETTLE_PASSES {
            let Some(active) = &self.active else {
                return;
            };
            let resolution = self.resolve_at(&*host, active, active.pointer);
            let target = resolution.as_ref().map(|r| r.target.clone());
            if target == active.target {
                break;
            }
            let cycle = shown.contains(&target);
            shown.push(active.target.clone());
            self.show_target(host, resolution.as_ref());
            if cycle {
                break;
            }
        }

        let Some(active) = &self.active else {
            return;
        };
        if active.target != initial {
            let line = format!("target -> {:?}", active.target);
            log::trace!("drop {line}");
            if self.options.debug_event_log {
                self.debug_log_event(line);
            }
        }
    }

    fn show_target(&mut self, host: &mut dyn ReorderHost, resolution: Option<&Resolution>) {
        match self.options.preview {
            PreviewStrategy::Placeholder => self.show_placeholder(host, resolution),
            PreviewStrategy::Flip => self.show_displacement(host, resolution),
        }
        self.set_highlight(host, resolution.map(|r| r.container_node));
        if let Some(active) = &mut self.active {
            active.target = resolution.map(|r| r.target.clone());
        }
    }

    fn show_placeholder(&mut self, host: &mut dyn ReorderHost, resolution: Option<&Resolution>) {
        let Some(active) = &self.active else {
            return;
        };
        let item_node = active.session.item_node;
        let item_size = active.session.item_size;
        let margin = active.item_margin;

        let Some(resolution) = resolution else {
            self.restore_placeholder(host);
            return;
        };
        self.placeholder
            .ensure_axis(host, item_size, margin, resolution.axis);
        self.placeholder.move_to(
            host,
            resolution.container_node,
            resolution.target.index,
            &resolution.siblings,
            item_node,
        );
    }

    /// No target: the placeholder goes back to the source slot, so letting go visibly changes
    /// nothing. If the source container is gone, there is nowhere to show it.
    fn restore_placeholder(&mut self, host: &mut dyn ReorderHost) {
        let Some(active) = &self.active else {
            return;
        };
        let Some(source) = self.registry.lookup(&active.session.source_container_id) else {
            self.placeholder.remove(host);
            return;
        };
        if !host.is_attached(source.node) {
            self.placeholder.remove(host);
            return;
        }
        let (source_node, axis) = (source.node, source.axis);
        let item_node = active.session.item_node;
        let item_size = active.session.item_size;
        let margin = active.item_margin;
        let source_index = active.session.source_index;

        let excluded: Vec<NodeId> = std::iter::once(item_node)
            .chain(self.placeholder.node())
            .collect();
        let siblings: Vec<NodeId> =
            geometry::ordered_items(&*host, source_node, axis, &excluded, &|_| Vec2::ZERO)
                .into_iter()
                .map(|(node, _)| node)
                .collect();

        self.placeholder.ensure_axis(host, item_size, margin, axis);
        self.placeholder.move_to(
            host,
            source_node,
            source_index.min(siblings.len()),
            &siblings,
            item_node,
        );
    }

    /// FLIP: compute where every affected sibling belongs and translate it there.
    /// No target means every sibling returns home.
    fn show_displacement(&mut self, host: &mut dyn ReorderHost, resolution: Option<&Resolution>) {
        let Some(active) = &self.active else {
            return;
        };
        let transition = self.options.displacement_transition();
        let item_node = active.session.item_node;
        let source_index = active.session.source_index;
        let extent = active.session.item_size + active.item_margin.sum();
        let source = self
            .registry
            .lookup(&active.session.source_container_id)
            .map(|config| (config.id.clone(), config.node, config.axis));

        let mut plan: Vec<(NodeId, Vec2)> = Vec::new();
        if let Some(resolution) = resolution {
            let offset_of = |node: NodeId| self.displacement.offset(node);

            // Full source sequence, the hidden dragged item included.
            let source_slots = source.as_ref().map(|(_, node, axis)| {
                let full = geometry::ordered_items(&*host, *node, *axis, &[], &offset_of);
                let index = full
                    .iter()
                    .position(|(n, _)| *n == item_node)
                    .unwrap_or(source_index);
                (full, index, *axis)
            });

            let same_container = source
                .as_ref()
                .is_some_and(|(id, _, _)| *id == resolution.target.container_id);

            if same_container && let Some((full, index, axis)) = &source_slots {
                let slots: Vec<Rect> = full.iter().map(|(_, r)| *r).collect();
                plan = plan_within(
                    *axis,
                    &resolution.siblings,
                    &slots,
                    *index,
                    resolution.target.index,
                    extent,
                );
            } else {
                if let Some((full, index, axis)) = &source_slots {
                    let slots: Vec<Rect> = full.iter().map(|(_, r)| *r).collect();
                    let siblings: Vec<NodeId> = full
                        .iter()
                        .map(|(n, _)| *n)
                        .filter(|n| *n != item_node)
                        .collect();
                    plan = plan_closing_gap(*axis, &siblings, &slots, *index, extent);
                }

                let mut target_slots: Vec<Rect> = resolution
                    .siblings
                    .iter()
                    .filter_map(|&n| geometry::layout_rect(&*host, n, &offset_of))
                    .collect();
                // The last sibling is pushed into a slot no item occupies yet.
                if resolution.axis == Axis::Free
                    && let Some(bounds) = host.rect(resolution.container_node)
                    && let Some(next) = next_free_slot(&target_slots, bounds)
                {
                    target_slots.push(next);
                }
                plan.extend(plan_opening_gap(
                    resolution.axis,
                    &resolution.siblings,
                    &target_slots,
                    resolution.target.index,
                    extent,
                ));
            }
        }

        self.displacement.apply(host, &plan, transition);
    }

    /// Moves the drop highlight to `container`, if highlighting is on.
    pub(super) fn set_highlight(&mut self, host: &mut dyn ReorderHost, container: Option<NodeId>) {
        if !self.options.highlight_target {
            return;
        }
        let Some(active) = &mut self.active else {
            return;
        };
        if active.highlighted == container {
            return;
        }
        if let Some(old) = active.highlighted.take() {
            host.set_highlighted(old, false);
        }
        if let Some(new) = container {
            host.set_highlighted(new, true);
        }
        active.highlighted = container;
    }
}
