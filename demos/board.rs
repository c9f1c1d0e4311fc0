#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use eframe::egui;
use egui_reorder::{
    Axis, ContainerConfig, DragItem, DragReorder, DropOutcome, HitTestMode, NodeId,
    PreviewStrategy, ReorderHost, ReorderOptions, Scene, SceneRole, Spacing,
};

const CARD: egui::Vec2 = egui::Vec2::new(200.0, 44.0);
const TAG: egui::Vec2 = egui::Vec2::new(72.0, 28.0);

struct Lane {
    id: String,
    node: NodeId,
    items: Vec<String>,
}

struct App {
    scene: Scene,
    engine: DragReorder,
    lanes: Vec<Lane>,
    nodes: BTreeMap<String, NodeId>,
    item_types: BTreeMap<String, &'static str>,
    events: Rc<RefCell<Vec<String>>>,
    show_debug: bool,
}

impl App {
    fn new() -> Self {
        let mut scene = Scene::new(egui::vec2(1000.0, 600.0));
        scene.set_axis(scene.root(), Axis::Horizontal);

        let mut app = Self {
            scene,
            engine: DragReorder::new(),
            lanes: Vec::new(),
            nodes: BTreeMap::new(),
            item_types: BTreeMap::new(),
            events: Rc::default(),
            show_debug: false,
        };

        let cards = |prefix: &str, n: usize| -> Vec<String> {
            (1..=n).map(|i| format!("{prefix} {i}")).collect()
        };
        app.add_lane("Todo", Axis::Vertical, "card", cards("Task", 12));
        app.add_lane("Doing", Axis::Vertical, "card", cards("Bug", 3));
        app.add_lane("Done", Axis::Vertical, "card", Vec::new());
        app.add_lane("Tags", Axis::Free, "tag", cards("#", 9));
        app
    }

    fn add_lane(&mut self, id: &str, axis: Axis, item_type: &'static str, items: Vec<String>) {
        let width = if axis == Axis::Free { 250.0 } else { 220.0 };
        let root = self.scene.root();
        let node = self.scene.add(root, egui::vec2(width, 520.0), id);
        self.scene.set_axis(node, axis);
        self.scene.set_scrollable(node, true);
        self.scene.set_margin(node, Spacing::same(8.0));

        let size = if item_type == "tag" { TAG } else { CARD };
        for label in &items {
            let item = self.scene.add(node, size, label.clone());
            self.scene.set_margin(item, Spacing::same(4.0));
            self.nodes.insert(label.clone(), item);
            self.item_types.insert(label.clone(), item_type);
        }

        let (reorders, moves) = (Rc::clone(&self.events), Rc::clone(&self.events));
        let lane = id.to_owned();
        self.engine.register(
            &self.scene,
            ContainerConfig::new(id, node)
                .with_axis(axis)
                .accept(item_type)
                .with_reorder_callback(move |ev| {
                    reorders.borrow_mut().push(format!(
                        "{lane}: {} {} -> {}",
                        ev.item_id, ev.from_index, ev.to_index
                    ));
                })
                .with_move_callback(move |ev| {
                    moves.borrow_mut().push(format!(
                        "{} moved {}[{}] -> {}[{}]",
                        ev.item_id,
                        ev.from_container_id,
                        ev.from_index,
                        ev.to_container_id,
                        ev.to_index
                    ));
                }),
        );

        self.lanes.push(Lane {
            id: id.to_owned(),
            node,
            items,
        });
    }

    /// The draggable item at `pos`: the node whose parent is a registered container.
    fn item_at(&self, pos: egui::Pos2) -> Option<(String, NodeId)> {
        let mut current = self.scene.node_at(pos);
        while let Some(node) = current {
            let parent = self.scene.parent(node)?;
            if self.engine.registry().by_node(parent).is_some()
                && self.scene.role(node) == Some(SceneRole::Element)
            {
                return Some((self.scene.label(node)?.to_owned(), node));
            }
            current = Some(parent);
        }
        None
    }

    fn lane_index(&self, id: &str) -> Option<usize> {
        self.lanes.iter().position(|lane| lane.id == id)
    }

    /// The engine reports; the app owns the order.
    fn apply(&mut self, source: &str, outcome: &DropOutcome) {
        let Some(&node) = self.nodes.get(outcome.item_id()) else {
            return;
        };
        match outcome {
            DropOutcome::Reorder(ev) => {
                let Some(s) = self.lane_index(source) else {
                    return;
                };
                ev.apply(&mut self.lanes[s].items);
                let lane_node = self.lanes[s].node;
                self.scene.move_to_index(node, lane_node, ev.to_index);
            }
            DropOutcome::Move(ev) => {
                let (Some(s), Some(d)) = (
                    self.lane_index(&ev.from_container_id),
                    self.lane_index(&ev.to_container_id),
                ) else {
                    return;
                };
                let mut from = std::mem::take(&mut self.lanes[s].items);
                let mut to = std::mem::take(&mut self.lanes[d].items);
                ev.apply(&mut from, &mut to);
                self.lanes[s].items = from;
                self.lanes[d].items = to;
                let lane_node = self.lanes[d].node;
                self.scene.move_to_index(node, lane_node, ev.to_index);
            }
        }
    }

    fn board_ui(&mut self, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let origin = rect.min.to_vec2();
        let root = self.scene.root();
        self.scene.set_size(root, rect.size());

        let pointer = response.interact_pointer_pos().map(|p| p - origin);

        if response.drag_started()
            && let Some(pos) = pointer
            && let Some((label, node)) = self.item_at(pos)
        {
            let item_type = self.item_types.get(&label).copied().unwrap_or("card");
            self.engine
                .pointer_down(&mut self.scene, pos, DragItem::new(label, item_type, node));
        } else if response.drag_stopped() {
            let source = self
                .engine
                .session()
                .map(|s| s.source_container_id.clone());
            let last =
                pointer.or_else(|| ui.input(|i| i.pointer.latest_pos()).map(|p| p - origin));
            if let (Some(source), Some(pos)) = (source, last)
                && let Some(outcome) = self.engine.pointer_up(&mut self.scene, pos)
            {
                self.apply(&source, &outcome);
            }
        } else if response.dragged()
            && let Some(pos) = pointer
        {
            self.engine.pointer_move(&mut self.scene, pos);
        }

        // Mouse wheel scrolls whatever lane is under the cursor.
        let wheel = ui.input(|i| i.smooth_scroll_delta);
        if wheel != egui::Vec2::ZERO
            && let Some(hover) = response.hover_pos().map(|p| p - origin)
        {
            let mut current = self.scene.node_at(hover);
            while let Some(node) = current {
                if let Some(metrics) = self.scene.scroll_metrics(node) {
                    self.scene.set_scroll_offset(node, metrics.offset - wheel);
                    break;
                }
                current = self.scene.parent(node);
            }
        }

        if self.scene.take_frame_request() {
            self.engine.on_animation_frame(&mut self.scene);
            ui.ctx().request_repaint();
        }

        self.paint(ui, rect);
    }

    fn paint(&self, ui: &egui::Ui, rect: egui::Rect) {
        let visuals = ui.visuals();
        let origin = rect.min.to_vec2();
        for item in self.scene.paint_list() {
            let clip = item.clip.translate(origin).intersect(rect);
            let painter = ui.painter().with_clip_rect(clip);
            let r = item.rect.translate(origin);

            match item.role {
                SceneRole::Element if item.depth == 0 => {}
                SceneRole::Element if item.depth == 1 => {
                    let stroke = if item.highlighted {
                        egui::Stroke::new(2.0, visuals.selection.stroke.color)
                    } else {
                        visuals.widgets.noninteractive.bg_stroke
                    };
                    painter.rect(
                        r,
                        egui::CornerRadius::same(6),
                        visuals.extreme_bg_color,
                        stroke,
                        egui::StrokeKind::Inside,
                    );
                }
                SceneRole::Element | SceneRole::Ghost => {
                    let fill = visuals
                        .widgets
                        .inactive
                        .bg_fill
                        .gamma_multiply(item.opacity);
                    painter.rect(
                        r,
                        egui::CornerRadius::same(4),
                        fill,
                        visuals.widgets.inactive.bg_stroke,
                        egui::StrokeKind::Inside,
                    );
                    painter.text(
                        r.left_center() + egui::vec2(8.0, 0.0),
                        egui::Align2::LEFT_CENTER,
                        &item.label,
                        egui::FontId::proportional(14.0),
                        visuals.text_color().gamma_multiply(item.opacity),
                    );
                }
                SceneRole::Placeholder => {
                    painter.rect(
                        r,
                        egui::CornerRadius::same(4),
                        visuals.selection.bg_fill.gamma_multiply(0.25),
                        egui::Stroke::new(1.0, visuals.selection.stroke.color),
                        egui::StrokeKind::Inside,
                    );
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let options: &mut ReorderOptions = &mut self.engine.options;
                ui.label("Preview:");
                ui.radio_value(&mut options.preview, PreviewStrategy::Placeholder, "Placeholder");
                ui.radio_value(&mut options.preview, PreviewStrategy::Flip, "FLIP");
                ui.separator();
                ui.label("Hit test:");
                ui.radio_value(&mut options.hit_test, HitTestMode::Rect, "Rect");
                ui.radio_value(&mut options.hit_test, HitTestMode::TopmostNode, "Topmost node");
                ui.separator();
                ui.checkbox(&mut options.auto_scroll, "Auto-scroll");
                ui.checkbox(&mut options.highlight_target, "Highlight target");
                ui.checkbox(&mut options.debug_event_log, "Event log");
                ui.checkbox(&mut self.show_debug, "Debug window");
            });
        });

        egui::SidePanel::right("model").show(ctx, |ui| {
            ui.heading("Model");
            for lane in &self.lanes {
                ui.label(format!("{}: {}", lane.id, lane.items.join(", ")));
            }
            ui.separator();
            ui.heading("Callbacks");
            for line in self.events.borrow().iter().rev().take(12) {
                ui.label(line);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| self.board_ui(ui));

        if self.show_debug {
            self.engine.ui_debug_window(ctx);
        }
    }
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("egui_reorder=debug"),
    )
    .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 700.0])
            .with_title("egui_reorder: board"),
        ..Default::default()
    };
    eframe::run_native(
        "egui_reorder: board",
        options,
        Box::new(|_cc| Ok(Box::new(App::new()))),
    )
}
