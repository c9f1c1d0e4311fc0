use std::time::Duration;

/// How the insertion point is shown while dragging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PreviewStrategy {
    /// Insert a placeholder node at the insertion point and let the host reflow siblings.
    #[default]
    Placeholder,

    /// Keep the dragged node hidden in its slot and translate displaced siblings (FLIP).
    Flip,
}

/// How the container under the pointer is found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HitTestMode {
    /// Every accepting container whose rect holds the pointer; the smallest area wins.
    #[default]
    Rect,

    /// Walk up from [`super::ReorderHost::node_at`]; the nearest accepting ancestor wins.
    ///
    /// Respects clipping and overlap, at the cost of one host hit-test per resolution.
    TopmostNode,
}

/// Options for [`super::DragReorder`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReorderOptions {
    pub preview: PreviewStrategy,

    pub hit_test: HitTestMode,

    /// Scroll containers while the pointer rests near their edges.
    pub auto_scroll: bool,

    /// Distance (in points) from a scroll container's edge that starts auto-scroll.
    pub edge_threshold: f32,

    /// Distance scrolled per display frame.
    pub scroll_step: f32,

    /// Easing duration for sibling translations in [`PreviewStrategy::Flip`]. Zero snaps.
    pub displacement_transition_ms: u64,

    /// Opacity of the ghost following the pointer.
    pub ghost_opacity: f32,

    /// Highlight the container that would receive the drop.
    pub highlight_target: bool,

    /// If true, record session and targeting events in a small ring buffer
    /// (see [`super::DragReorder::debug_log_text`]).
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep.
    pub debug_event_log_capacity: usize,
}

impl Default for ReorderOptions {
    fn default() -> Self {
        Self {
            preview: PreviewStrategy::default(),
            hit_test: HitTestMode::default(),
            auto_scroll: true,
            edge_threshold: 60.0,
            scroll_step: 14.0,
            displacement_transition_ms: 150,
            ghost_opacity: 0.8,
            highlight_target: true,
            debug_event_log: false,
            debug_event_log_capacity: 200,
        }
    }
}

impl ReorderOptions {
    pub(crate) fn displacement_transition(&self) -> Option<Duration> {
        (self.displacement_transition_ms > 0)
            .then(|| Duration::from_millis(self.displacement_transition_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_transition_snaps() {
        let opt = ReorderOptions {
            displacement_transition_ms: 0,
            ..Default::default()
        };
        assert_eq!(opt.displacement_transition(), None);
        assert_eq!(
            ReorderOptions::default().displacement_transition(),
            Some(Duration::from_millis(150))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_ron_falls_back_to_defaults() {
        let opt: ReorderOptions =
            ron::from_str("(preview: Flip, hit_test: TopmostNode, edge_threshold: 40.0)")
                .expect("options must parse from RON");
        assert_eq!(opt.preview, PreviewStrategy::Flip);
        assert_eq!(opt.hit_test, HitTestMode::TopmostNode);
        assert_eq!(opt.edge_threshold, 40.0);
        assert_eq!(opt.scroll_step, ReorderOptions::default().scroll_step);
        assert!(opt.auto_scroll);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_config_overrides_scroll_tuning() {
        let opt: ReorderOptions =
            serde_json::from_str(r#"{ "auto_scroll": false, "scroll_step": 8.0 }"#)
                .expect("options must parse from JSON");
        assert!(!opt.auto_scroll);
        assert_eq!(opt.scroll_step, 8.0);
        assert_eq!(opt.preview, PreviewStrategy::Placeholder);
    }
}
