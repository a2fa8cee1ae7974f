use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Result;
use eframe::egui::{self, Context, Rect};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::graph::{EditorDocument, GraphPayload, load_graph_payload};

mod animation;
mod editor;
mod explorer;
mod geometry;
mod render_utils;
mod ui;

use animation::EguiScheduler;
use editor::{EditorCanvas, EditorEvent};
use explorer::{ExplorerView, ForceParams};

#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub graph_path: Option<PathBuf>,
    pub editor_path: Option<PathBuf>,
    pub seed: u64,
}

pub struct GraphCanvasApp {
    options: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<Result<LoadedFiles, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedFiles, String>>,
    },
    Ready(Box<Workspace>),
    Error(String),
}

struct LoadedFiles {
    payload: GraphPayload,
    document: EditorDocument,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Explorer,
    Editor,
}

struct Workspace {
    tab: Tab,
    graph_path: Option<PathBuf>,
    payload: GraphPayload,
    explorer: Option<ExplorerView<EguiScheduler>>,
    params: ForceParams,
    rng: StdRng,
    search: String,
    document_path: Option<PathBuf>,
    document: EditorDocument,
    document_dirty: bool,
    editor: EditorCanvas,
    status: Option<String>,
}

fn load_files(graph_path: Option<&Path>, editor_path: Option<&Path>) -> Result<LoadedFiles> {
    let payload = match graph_path {
        Some(path) => load_graph_payload(path)?,
        None => GraphPayload::default(),
    };

    let document = match editor_path {
        Some(path) if path.exists() => EditorDocument::load(path)?,
        Some(path) => {
            tracing::info!(path = %path.display(), "editor document does not exist yet, starting empty");
            EditorDocument::default()
        }
        None => EditorDocument::default(),
    };

    Ok(LoadedFiles { payload, document })
}

impl GraphCanvasApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::start_load(&options);
        Self {
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(options: &LaunchOptions) -> Receiver<Result<LoadedFiles, String>> {
        let (tx, rx) = mpsc::channel();
        let graph_path = options.graph_path.clone();
        let editor_path = options.editor_path.clone();

        thread::spawn(move || {
            let result = load_files(graph_path.as_deref(), editor_path.as_deref())
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(options: &LaunchOptions) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(options),
        }
    }

    fn ready(&self, result: Result<LoadedFiles, String>) -> AppState {
        match result {
            Ok(files) => AppState::Ready(Box::new(Workspace::new(files, &self.options))),
            Err(error) => {
                tracing::warn!(%error, "loading failed");
                AppState::Error(error)
            }
        }
    }
}

impl eframe::App for GraphCanvasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(result);
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading graph files...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load graph files");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = Self::start_load(&self.options);
                    return;
                }
            }
            AppState::Ready(workspace) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                workspace.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(&self.options));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.ready(result);
        }
    }
}

impl Workspace {
    fn new(files: LoadedFiles, options: &LaunchOptions) -> Self {
        let tab = if options.graph_path.is_none() && options.editor_path.is_some() {
            Tab::Editor
        } else {
            Tab::Explorer
        };

        if options.graph_path.is_some() && files.payload.is_empty() {
            tracing::warn!("graph payload contains no nodes");
        }
        tracing::info!(
            nodes = files.payload.nodes.len(),
            relationships = files.payload.relationships.len(),
            editor_nodes = files.document.nodes.len(),
            editor_edges = files.document.edges.len(),
            "workspace ready"
        );

        Self {
            tab,
            graph_path: options.graph_path.clone(),
            payload: files.payload,
            explorer: None,
            params: ForceParams::default(),
            rng: StdRng::seed_from_u64(options.seed),
            search: String::new(),
            document_path: options.editor_path.clone(),
            document: files.document,
            document_dirty: false,
            editor: EditorCanvas::default(),
            status: None,
        }
    }

    fn set_tab(&mut self, tab: Tab) {
        if self.tab == tab {
            return;
        }
        if self.tab == Tab::Explorer {
            self.unmount_explorer();
        }
        self.tab = tab;
    }

    /// Reloading rebuilds the workspace, so unsaved editor changes block it.
    fn reload_blocker(&self) -> Option<&'static str> {
        self.document_dirty
            .then_some("Save the editor document before reloading; it has unsaved changes")
    }

    fn unmount_explorer(&mut self) {
        if let Some(view) = self.explorer.take() {
            view.unmount();
        }
    }

    /// Throws the current layout away; the next frame mounts a freshly jittered one.
    fn relayout(&mut self) {
        self.unmount_explorer();
    }

    fn explorer_for(&mut self, ctx: &Context, canvas: Rect) -> &mut ExplorerView<EguiScheduler> {
        let Self {
            explorer,
            payload,
            params,
            rng,
            ..
        } = self;
        explorer.get_or_insert_with(|| {
            ExplorerView::mount(
                payload,
                canvas,
                *params,
                EguiScheduler::new(ctx.clone()),
                rng,
            )
        })
    }

    fn apply_editor_events(&mut self, events: Vec<EditorEvent>) {
        for event in events {
            match event {
                EditorEvent::NodesChanged(nodes) => {
                    self.document.replace_nodes(nodes);
                    self.document_dirty = true;
                }
                EditorEvent::EdgeCreated { source, target } => {
                    let edge = self.document.create_edge(&source, &target);
                    tracing::info!(id = %edge.id, %source, %target, "edge created");
                    self.status = Some(format!("Created {} ({source} → {target})", edge.id));
                    self.document_dirty = true;
                }
                EditorEvent::NodeSelected(id) => tracing::debug!(?id, "editor node selection"),
                EditorEvent::EdgeSelected(id) => tracing::debug!(?id, "editor edge selection"),
            }
        }
    }

    fn delete_editor_selection(&mut self) {
        let selection = self.editor.selection();
        let removed = if let Some(id) = selection.edge().map(str::to_owned) {
            self.document.remove_edge(&id).then(|| format!("Deleted edge {id}"))
        } else if let Some(id) = selection.node().map(str::to_owned) {
            self.document.remove_node(&id).then(|| format!("Deleted node {id}"))
        } else {
            None
        };

        if let Some(message) = removed {
            tracing::info!("{message}");
            self.status = Some(message);
            self.document_dirty = true;
        }

        let events = self
            .editor
            .prune_selection(&self.document.nodes, &self.document.edges);
        self.apply_editor_events(events);
    }

    fn save_document(&mut self) {
        let Some(path) = self.document_path.as_deref() else {
            self.status = Some("No editor file to save to (start with --editor <FILE>)".to_owned());
            return;
        };

        match self.document.save(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "editor document saved");
                self.status = Some(format!("Saved {}", path.display()));
                self.document_dirty = false;
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %format!("{error:#}"), "save failed");
                self.status = Some(format!("Save failed: {error:#}"));
            }
        }
    }
}
