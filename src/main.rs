mod app;
mod social;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::{EgoGraphApp, GraphSource, Settings};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph snapshot to open. Created on first save when it does not exist.
    graph: Option<PathBuf>,

    /// Start with the bundled sample network instead of a file.
    #[arg(long, conflicts_with = "graph")]
    demo: bool,

    /// JSON file overriding physics and display defaults.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Title used when a new graph is started.
    #[arg(long, default_value = "My network")]
    title: String,
}

impl Args {
    fn source(&self) -> GraphSource {
        if self.demo {
            return GraphSource::Demo;
        }
        match &self.graph {
            Some(path) => GraphSource::File {
                path: path.clone(),
                title: self.title.clone(),
            },
            None => GraphSource::Blank {
                title: self.title.clone(),
            },
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ego_graph=info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let settings = Settings::load_or_default(args.settings.as_deref());
    let source = args.source();
    tracing::info!(?source, "starting");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ego-graph",
        options,
        Box::new(move |cc| Ok(Box::new(EgoGraphApp::new(cc, source, settings)))),
    )
}
