use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::Result;
use eframe::egui::{self, Context, Vec2};

use crate::social::{RelationshipType, SocialGraph, demo_graph, load_graph};

mod frame;
mod graph;
mod highlight;
mod interaction;
mod physics;
mod render;
mod render_utils;
mod settings;
mod ui;

use frame::FrameScheduler;
use hit_test::HitTester;
use interaction::{Interaction, Selection};
use physics::Simulation;
use render::FrameStats;
use render_utils::ViewTransform;
use ui::DetailDrafts;
pub use settings::Settings;

/// Where the graph shown at startup comes from.
#[derive(Clone, Debug)]
pub enum GraphSource {
    /// A snapshot file. A missing file starts a new graph that saves there.
    File { path: PathBuf, title: String },
    Demo,
    Blank { title: String },
}

impl GraphSource {
    fn path(&self) -> Option<PathBuf> {
        match self {
            Self::File { path, .. } => Some(path.clone()),
            Self::Demo | Self::Blank { .. } => None,
        }
    }

    fn load(&self) -> Result<SocialGraph> {
        match self {
            Self::File { path, title } if !path.exists() => {
                tracing::info!(path = %path.display(), "no graph file yet, starting a new graph");
                Ok(SocialGraph::new(title.clone()))
            }
            Self::File { path, .. } => load_graph(path),
            Self::Demo => Ok(demo_graph()),
            Self::Blank { title } => Ok(SocialGraph::new(title.clone())),
        }
    }
}

pub struct EgoGraphApp {
    source: GraphSource,
    settings: Settings,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<SocialGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: SocialGraph,
    graph_path: Option<PathBuf>,
    settings: Settings,
    simulation: Simulation,
    hits: HitTester,
    interaction: Interaction,
    selection: Selection,
    transform: ViewTransform,
    scheduler: FrameScheduler,
    canvas_size: Option<Vec2>,
    unsaved_changes: bool,
    status: Option<String>,
    search: String,
    new_person_name: String,
    new_person_cohort: Option<String>,
    new_cohort_name: String,
    link_target: Option<String>,
    link_kind: RelationshipType,
    drafts: DetailDrafts,
    cohort_rename: Option<(String, String)>,
    frame_stats: FrameStats,
    show_fps_bar: bool,
    fps_show_current: bool,
    fps_show_average: bool,
    fps_show_frame_time: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl EgoGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: GraphSource, settings: Settings) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            settings,
            state,
        }
    }

    fn spawn_load(source: GraphSource) -> Receiver<Result<SocialGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source.load().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: GraphSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }
}

impl eframe::App for EgoGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(graph)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            graph,
                            self.source.path(),
                            self.settings.clone(),
                        ))));
                    }
                    Ok(Err(error)) => {
                        tracing::error!("{error}");
                        transition = Some(AppState::Error(error));
                    }
                    Err(mpsc::TryRecvError::Empty) => {}
                    Err(mpsc::TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading social graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the social graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
