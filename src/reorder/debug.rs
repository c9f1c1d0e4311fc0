use egui::Context;

use super::DragReorder;

impl DragReorder {
    pub(super) fn debug_log_event(&mut self, message: impl Into<String>) {
        if !self.options.debug_event_log {
            return;
        }
        self.push_debug_log_line(message.into());
    }

    fn push_debug_log_line(&mut self, message: String) {
        let cap = self.options.debug_event_log_capacity.max(1).min(10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_log
            .push_back(format!("[frame {}] {}", self.debug_frame, message));
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// The event log, oldest line first. Empty unless `debug_event_log` is on.
    pub fn debug_log_text(&self) -> String {
        self.debug_log
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One line per registered container plus the state of the running drag, if any.
    pub fn debug_summary(&self) -> String {
        let mut lines: Vec<String> = self
            .registry
            .iter()
            .map(|config| {
                let mut accepted: Vec<&str> =
                    config.accepted_types.iter().map(String::as_str).collect();
                accepted.sort_unstable();
                format!(
                    "container {} node={:?} axis={:?} accepts={accepted:?}",
                    config.id, config.node, config.axis
                )
            })
            .collect();

        match &self.active {
            None => lines.push("idle".to_owned()),
            Some(active) => {
                let session = &active.session;
                lines.push(format!(
                    "dragging item={} from={}[{}] pointer=({:.1},{:.1}) target={:?}",
                    session.item_id,
                    session.source_container_id,
                    session.source_index,
                    active.pointer.x,
                    active.pointer.y,
                    active.target,
                ));
                lines.push(format!(
                    "placeholder={:?} in {:?} displaced={} session={:?}",
                    self.placeholder.node(),
                    self.placeholder.parent(),
                    self.displacement.len(),
                    self.session_log.active_id(),
                ));
            }
        }
        lines.join("\n")
    }

    /// Floating window with the summary and the event log.
    pub fn ui_debug_window(&mut self, ctx: &Context) {
        let summary = self.debug_summary();
        let log_text = self.debug_log_text();
        let mut clear = false;

        egui::Window::new("Reorder Debug")
            .id(egui::Id::new("egui_reorder_debug_window"))
            .default_pos(egui::Pos2::new(12.0, 12.0))
            .resizable(true)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Copy summary").clicked() {
                        ctx.copy_text(summary.clone());
                    }
                    if ui.button("Copy event log").clicked() {
                        ctx.copy_text(log_text.clone());
                    }
                    clear = ui.button("Clear event log").clicked();
                });

                ui.separator();
                ui.label(summary);

                if self.options.debug_event_log {
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .id_salt("event_log")
                        .max_height(240.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            ui.label(log_text);
                        });
                }
            });

        if clear {
            self.debug_log_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::ReorderOptions;
    use super::*;

    #[test]
    fn log_is_capped_and_frame_prefixed() {
        let mut engine = DragReorder::new_with_options(ReorderOptions {
            debug_event_log: true,
            debug_event_log_capacity: 2,
            ..Default::default()
        });
        engine.debug_frame = 7;
        engine.debug_log_event("one");
        engine.debug_log_event("two");
        engine.debug_log_event("three");
        assert_eq!(engine.debug_log_text(), "[frame 7] two\n[frame 7] three");

        engine.debug_log_clear();
        assert!(engine.debug_log_text().is_empty());
    }

    #[test]
    fn disabled_log_stays_empty() {
        let mut engine = DragReorder::new();
        engine.debug_log_event("ignored");
        assert!(engine.debug_log_text().is_empty());
        assert_eq!(engine.debug_summary(), "idle");
    }
}
