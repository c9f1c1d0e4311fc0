use egui::{Pos2, Rect, Vec2};

use super::DragReorder;
use super::host::{NodeId, ReorderHost, ScrollMetrics};

/// Edge auto-scroll while a drag is active.
///
/// Runs off host animation frames: at most one frame is pending at any time, and none once the
/// drag ends.
#[derive(Debug, Default)]
pub(super) struct AutoScroll {
    pointer: Option<Pos2>,
    frame_pending: bool,
}

impl AutoScroll {
    pub(super) fn start(&mut self, host: &mut dyn ReorderHost, pointer: Pos2) {
        self.pointer = Some(pointer);
        self.schedule(host);
    }

    pub(super) fn set_pointer(&mut self, pointer: Pos2) {
        self.pointer = Some(pointer);
    }

    pub(super) fn schedule(&mut self, host: &mut dyn ReorderHost) {
        if !self.frame_pending {
            host.request_frame();
            self.frame_pending = true;
        }
    }

    pub(super) fn frame_fired(&mut self) {
        self.frame_pending = false;
    }

    pub(super) fn stop(&mut self, host: &mut dyn ReorderHost) {
        if self.frame_pending {
            host.cancel_frame();
            self.frame_pending = false;
        }
        self.pointer = None;
    }

    /// Scrolls the innermost scrollable ancestor of the node under the pointer that still has
    /// room to scroll towards the edge the pointer is near. At most one node scrolls per step.
    pub(super) fn step(
        &self,
        host: &mut dyn ReorderHost,
        threshold: f32,
        step: f32,
    ) -> Option<(NodeId, Vec2)> {
        let pointer = self.pointer?;
        let mut current = host.node_at(pointer);
        while let Some(node) = current {
            if let Some(metrics) = host.scroll_metrics(node)
                && let Some(rect) = host.rect(node)
            {
                let delta = edge_scroll_delta(rect, &metrics, pointer, threshold, step);
                if delta != Vec2::ZERO {
                    host.set_scroll_offset(node, metrics.offset + delta);
                    return Some((node, delta));
                }
            }
            current = host.parent(node);
        }
        None
    }
}

/// Scroll delta for one axis: towards the start inside the leading band, towards the end inside
/// the trailing band, clamped so the offset stays within `[0, max]`.
fn axis_delta(
    pos: f32,
    min: f32,
    max: f32,
    offset: f32,
    max_offset: f32,
    threshold: f32,
    step: f32,
) -> f32 {
    if pos < min || pos > max {
        0.0
    } else if pos < min + threshold && offset > 0.0 {
        -step.min(offset)
    } else if pos > max - threshold && offset < max_offset {
        step.min(max_offset - offset)
    } else {
        0.0
    }
}

pub(super) fn edge_scroll_delta(
    rect: Rect,
    metrics: &ScrollMetrics,
    pointer: Pos2,
    threshold: f32,
    step: f32,
) -> Vec2 {
    let max_offset = metrics.max_offset();
    let x = if metrics.scrollable_x() {
        axis_delta(
            pointer.x,
            rect.min.x,
            rect.max.x,
            metrics.offset.x,
            max_offset.x,
            threshold,
            step,
        )
    } else {
        0.0
    };
    let y = if metrics.scrollable_y() {
        axis_delta(
            pointer.y,
            rect.min.y,
            rect.max.y,
            metrics.offset.y,
            max_offset.y,
            threshold,
            step,
        )
    } else {
        0.0
    };
    Vec2::new(x, y)
}

impl DragReorder {
    /// Call once per display frame after [`ReorderHost::request_frame`] was honoured.
    ///
    /// Scrolls near container edges while dragging, then re-resolves the target because content
    /// moved under a stationary pointer. Schedules the next frame until the drag ends.
    pub fn on_animation_frame(&mut self, host: &mut dyn ReorderHost) {
        self.debug_frame = self.debug_frame.wrapping_add(1);
        self.auto_scroll.frame_fired();
        if self.active.is_none() {
            return;
        }

        if self.options.auto_scroll
            && let Some((node, delta)) = self.auto_scroll.step(
                host,
                self.options.edge_threshold,
                self.options.scroll_step,
            )
        {
            log::trace!("auto-scroll {node:?} by ({:.1},{:.1})", delta.x, delta.y);
            if self.options.debug_event_log {
                self.debug_log_event(format!(
                    "auto-scroll node={node:?} delta=({:.1},{:.1})",
                    delta.x, delta.y
                ));
            }
            self.refresh(host);
        }

        self.auto_scroll.schedule(host);
    }
}
