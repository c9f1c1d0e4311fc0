use std::collections::BTreeMap;
use std::time::Duration;

use egui::{Pos2, Rect, Vec2};

use super::host::{NodeId, ReorderHost};
use super::types::Axis;

/// FLIP preview: siblings are translated towards the slot they would occupy after the drop,
/// while the dragged node stays hidden in its own slot.
///
/// "First" is the sibling's layout slot (host rect minus what we applied), "Last" is the slot
/// implied by the resolved index; the difference is played as an eased translation.
#[derive(Debug, Default)]
pub(super) struct Displacement {
    applied: BTreeMap<NodeId, Vec2>,
}

impl Displacement {
    pub(super) fn offset(&self, node: NodeId) -> Vec2 {
        self.applied.get(&node).copied().unwrap_or(Vec2::ZERO)
    }

    /// Number of nodes currently translated.
    pub(super) fn len(&self) -> usize {
        self.applied.len()
    }

    /// Makes `plan` the complete set of translations: nodes missing from it are reset.
    pub(super) fn apply(
        &mut self,
        host: &mut dyn ReorderHost,
        plan: &[(NodeId, Vec2)],
        transition: Option<Duration>,
    ) {
        let stale: Vec<NodeId> = self
            .applied
            .keys()
            .copied()
            .filter(|node| !plan.iter().any(|(n, _)| n == node))
            .collect();
        for node in stale {
            self.applied.remove(&node);
            host.set_translation(node, Vec2::ZERO, transition);
        }

        for &(node, offset) in plan {
            if offset == Vec2::ZERO {
                if self.applied.remove(&node).is_some() {
                    host.set_translation(node, Vec2::ZERO, transition);
                }
                continue;
            }
            if self.applied.get(&node) != Some(&offset) {
                self.applied.insert(node, offset);
                host.set_translation(node, offset, transition);
            }
        }
    }

    /// Resets every translation immediately.
    pub(super) fn clear(&mut self, host: &mut dyn ReorderHost) {
        for (node, _) in std::mem::take(&mut self.applied) {
            host.set_translation(node, Vec2::ZERO, None);
        }
    }
}

/// Translation carrying a sibling from slot `from` to slot `to` (adjacent slots only).
///
/// Stacking axes shift by the dragged item's outer extent; free (wrapping) containers jump to
/// the neighbouring slot's position.
fn slot_shift(axis: Axis, slots: &[Rect], from: usize, to: usize, extent: Vec2) -> Vec2 {
    if from == to {
        return Vec2::ZERO;
    }
    let dir = if to > from { 1.0 } else { -1.0 };
    match axis {
        Axis::Vertical => Vec2::new(0.0, extent.y * dir),
        Axis::Horizontal => Vec2::new(extent.x * dir, 0.0),
        Axis::Free => match (slots.get(from), slots.get(to)) {
            (Some(a), Some(b)) => b.min - a.min,
            _ => Vec2::new(extent.x * dir, 0.0),
        },
    }
}

/// Siblings of the source container while the target is the source container itself.
///
/// `slots` is the full sequence including the dragged item's (hidden) slot at `source_index`;
/// `siblings` excludes it.
pub(super) fn plan_within(
    axis: Axis,
    siblings: &[NodeId],
    slots: &[Rect],
    source_index: usize,
    target_index: usize,
    extent: Vec2,
) -> Vec<(NodeId, Vec2)> {
    siblings
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let from = if i < source_index { i } else { i + 1 };
            let to = if i < target_index { i } else { i + 1 };
            (node, slot_shift(axis, slots, from, to, extent))
        })
        .collect()
}

/// Source siblings close the gap left by the dragged item.
pub(super) fn plan_closing_gap(
    axis: Axis,
    siblings: &[NodeId],
    slots: &[Rect],
    source_index: usize,
    extent: Vec2,
) -> Vec<(NodeId, Vec2)> {
    siblings
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let from = if i < source_index { i } else { i + 1 };
            (node, slot_shift(axis, slots, from, i, extent))
        })
        .collect()
}

/// Target siblings at or after `target_index` make room for the incoming item.
pub(super) fn plan_opening_gap(
    axis: Axis,
    siblings: &[NodeId],
    slots: &[Rect],
    target_index: usize,
    extent: Vec2,
) -> Vec<(NodeId, Vec2)> {
    siblings
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let to = if i < target_index { i } else { i + 1 };
            (node, slot_shift(axis, slots, i, to, extent))
        })
        .collect()
}

/// The slot after the last of `slots` in a wrapping container whose rect is `bounds`.
///
/// Continues the last row when a cell as wide as the last one still fits, otherwise starts a new
/// row under it. Gaps between cells are taken from the existing layout.
pub(super) fn next_free_slot(slots: &[Rect], bounds: Rect) -> Option<Rect> {
    let last = *slots.last()?;
    let gap = slots
        .windows(2)
        .find(|pair| pair[0].min.y == pair[1].min.y)
        .map_or(0.0, |pair| pair[1].min.x - pair[0].max.x);

    let along = last.translate(Vec2::new(last.width() + gap, 0.0));
    if along.max.x + gap * 0.5 <= bounds.max.x {
        return Some(along);
    }

    let row_bottom = slots
        .iter()
        .filter(|r| r.min.y == last.min.y)
        .map(|r| r.max.y)
        .fold(last.max.y, f32::max);
    let row_gap = slots
        .iter()
        .filter(|r| r.max.y <= last.min.y)
        .map(|r| last.min.y - r.max.y)
        .reduce(f32::min)
        .unwrap_or(gap);
    let x = slots.iter().map(|r| r.min.x).fold(last.min.x, f32::min);
    Some(Rect::from_min_size(Pos2::new(x, row_bottom + row_gap), last.size()))
}
