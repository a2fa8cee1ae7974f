mod app;
mod graph;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Explored-subgraph payload (JSON) shown in the explorer tab
    #[arg(long, value_name = "FILE")]
    graph: Option<PathBuf>,

    /// Editor document (JSON) opened in the editor tab; Ctrl+S writes it back
    #[arg(long, value_name = "FILE")]
    editor: Option<PathBuf>,

    /// Seed for the initial layout jitter
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("graph_canvas={default_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };
    let launch = app::LaunchOptions {
        graph_path: args.graph,
        editor_path: args.editor,
        seed: args.seed,
    };

    eframe::run_native(
        "graph-canvas",
        options,
        Box::new(move |cc| Ok(Box::new(app::GraphCanvasApp::new(cc, launch)))),
    )
}
