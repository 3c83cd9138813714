use std::collections::VecDeque;
use std::path::PathBuf;

use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::social::{RelationshipType, SocialGraph, save_graph, to_json};
use crate::util::plural;

use super::super::frame::FrameScheduler;
use super::super::hit_test::HitTester;
use super::super::interaction::{Interaction, Selection};
use super::super::physics::Simulation;
use super::super::render::FrameStats;
use super::super::render_utils::ViewTransform;
use super::super::settings::Settings;
use super::super::ViewModel;
use super::DetailDrafts;

/// Zoom step of the header buttons.
const ZOOM_STEP: f32 = 1.3;

impl ViewModel {
    pub(in crate::app) fn new(graph: SocialGraph, graph_path: Option<PathBuf>, settings: Settings) -> Self {
        let simulation = Simulation::empty(Vec2::ZERO, settings.physics.clone());
        let mut interaction = Interaction::default();
        interaction.set_edge_threshold(settings.visual.edge_hit_threshold);

        Self {
            graph,
            graph_path,
            settings,
            simulation,
            hits: HitTester::default(),
            interaction,
            selection: Selection::default(),
            transform: ViewTransform::default(),
            scheduler: FrameScheduler::default(),
            canvas_size: None,
            unsaved_changes: false,
            status: None,
            search: String::new(),
            new_person_name: String::new(),
            new_person_cohort: None,
            new_cohort_name: String::new(),
            link_target: None,
            link_kind: RelationshipType::Friend,
            drafts: DetailDrafts::default(),
            cohort_rename: None,
            frame_stats: FrameStats::default(),
            show_fps_bar: true,
            fps_show_current: true,
            fps_show_average: true,
            fps_show_frame_time: false,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.scheduler.begin_frame();
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(self.graph.metadata.title.as_str());
                    ui.separator();
                    ui.label(plural(self.graph.persons.len(), "person", "people"));
                    ui.label(plural(
                        self.graph.relationships.len(),
                        "relationship",
                        "relationships",
                    ));
                    ui.label(plural(self.graph.cohorts.len(), "cohort", "cohorts"));
                    ui.separator();

                    let can_save = self.graph_path.is_some();
                    let save_button = ui
                        .add_enabled(can_save, egui::Button::new("Save"))
                        .on_disabled_hover_text("Start with a graph file path to enable saving.");
                    if save_button.clicked() {
                        self.save();
                    }
                    if ui
                        .button("Copy JSON")
                        .on_hover_text("Copy the graph snapshot to the clipboard.")
                        .clicked()
                    {
                        self.copy_json(ui.ctx());
                    }
                    if self.unsaved_changes {
                        ui.label("(unsaved)");
                    }
                    ui.separator();

                    if ui.button("Reset view").clicked() {
                        self.transform = ViewTransform::default();
                        self.request_redraw(ui.ctx());
                    }
                    if ui.button("Fit").clicked() {
                        self.fit_view();
                        self.request_redraw(ui.ctx());
                    }
                    if ui.button("-").on_hover_text("Zoom out").clicked() {
                        self.zoom_canvas_center(1.0 / ZOOM_STEP);
                        self.request_redraw(ui.ctx());
                    }
                    ui.label(format!("{:.0}%", self.transform.k * 100.0));
                    if ui.button("+").on_hover_text("Zoom in").clicked() {
                        self.zoom_canvas_center(ZOOM_STEP);
                        self.request_redraw(ui.ctx());
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                        if let Some(status) = &self.status {
                            ui.label(status.as_str());
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("controls_scroll")
                    .show(ui, |ui| self.draw_controls(ui));
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("details_scroll")
                    .show(ui, |ui| self.draw_details(ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    pub(in crate::app) fn request_redraw(&mut self, ctx: &Context) {
        if self.scheduler.request() {
            ctx.request_repaint();
        }
    }

    pub(in crate::app) fn set_selected_person(&mut self, id: Option<String>) {
        match id {
            Some(id) => self.selection.select_node(id),
            None => self.selection.clear(),
        }
        self.link_target = None;
    }

    fn zoom_canvas_center(&mut self, factor: f32) {
        let size = self.canvas_size.unwrap_or(Vec2::ZERO);
        self.transform.zoom_about((size * 0.5).to_pos2(), factor);
    }

    fn save(&mut self) {
        let Some(path) = self.graph_path.clone() else {
            return;
        };

        match save_graph(&path, &self.graph) {
            Ok(()) => {
                self.unsaved_changes = false;
                self.status = Some(format!("Saved to {}", path.display()));
            }
            Err(error) => {
                tracing::error!("{error:#}");
                self.status = Some(format!("Save failed: {error:#}"));
            }
        }
    }

    fn copy_json(&mut self, ctx: &Context) {
        match to_json(&self.graph) {
            Ok(json) => {
                ctx.copy_text(json);
                self.status = Some("Copied graph JSON".to_owned());
            }
            Err(error) => {
                tracing::error!("{error:#}");
                self.status = Some(format!("Export failed: {error:#}"));
            }
        }
    }
}
