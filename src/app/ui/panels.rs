use eframe::egui::{self, Align, Context, Key, Layout, Sense, Ui, vec2};

use crate::graph::{Category, SizeClass};

use super::super::explorer::{reserve_canvas, search_matches};
use super::super::render_utils::category_color;
use super::super::{Tab, Workspace};
use super::details::{NodeDetails, draw_node_details};

impl Workspace {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        self.draw_top_bar(ctx, reload_requested, is_reloading);

        match self.tab {
            Tab::Explorer => self.show_explorer(ctx),
            Tab::Editor => self.show_editor(ctx),
        }
    }

    fn draw_top_bar(&mut self, ctx: &Context, reload_requested: &mut bool, is_reloading: bool) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("graph-canvas");
                    ui.separator();

                    let mut tab = self.tab;
                    ui.selectable_value(&mut tab, Tab::Explorer, "Explorer");
                    ui.selectable_value(&mut tab, Tab::Editor, "Editor");
                    self.set_tab(tab);
                    ui.separator();

                    match self.tab {
                        Tab::Explorer => {
                            if let Some(path) = &self.graph_path {
                                ui.label(format!("graph: {}", path.display()));
                            }
                            ui.label(format!("nodes: {}", self.payload.nodes.len()));
                            ui.label(format!(
                                "relationships: {}",
                                self.payload.relationships.len()
                            ));
                        }
                        Tab::Editor => {
                            if let Some(path) = &self.document_path {
                                ui.label(format!("document: {}", path.display()));
                            }
                            ui.label(format!("nodes: {}", self.document.nodes.len()));
                            ui.label(format!("edges: {}", self.document.edges.len()));
                            if self.document_dirty {
                                ui.label("(unsaved)");
                            }
                        }
                    }

                    let reload_blocker = self.reload_blocker();
                    let mut reload_button = ui.add_enabled(
                        !is_reloading && reload_blocker.is_none(),
                        egui::Button::new("Reload files"),
                    );
                    if let Some(reason) = reload_blocker {
                        reload_button = reload_button.on_disabled_hover_text(reason);
                    }
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if is_reloading {
                            ui.spinner();
                        }
                        if let Some(status) = &self.status {
                            ui.label(status.as_str());
                        }
                    });
                });
            });
    }

    fn show_explorer(&mut self, ctx: &Context) {
        egui::SidePanel::left("explorer_controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_explorer_controls(ui));

        let details = self
            .explorer
            .as_ref()
            .and_then(|view| view.selected_node())
            .map(NodeDetails::from_node);
        if let Some(details) = details {
            egui::SidePanel::right("explorer_details")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| {
                    if draw_node_details(ui, &details)
                        && let Some(view) = self.explorer.as_mut()
                    {
                        view.clear_selection();
                    }
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let canvas = reserve_canvas(ui);
                if self.explorer.is_none() && (canvas.width() < 1.0 || canvas.height() < 1.0) {
                    return;
                }
                let search = self.search.clone();
                let view = self.explorer_for(ui.ctx(), canvas);
                let matches = search_matches(view.simulation().nodes(), &search);
                view.show(ui, matches.as_ref());
            });
    }

    fn draw_explorer_controls(&mut self, ui: &mut Ui) {
        ui.heading("Search");
        ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("name, id or label")
                .desired_width(f32::INFINITY),
        );
        if let Some(view) = &self.explorer
            && let Some(matches) = search_matches(view.simulation().nodes(), &self.search)
        {
            ui.small(format!("{} matching nodes", matches.len()));
        }
        if self.explorer.as_ref().is_some_and(|view| !view.is_animating()) {
            ui.small("Layout is static (nothing to simulate).");
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Re-run layout").clicked() {
                self.relayout();
            }
            if ui.button("Reset view").clicked()
                && let Some(view) = self.explorer.as_mut()
            {
                view.reset_view();
            }
        });

        ui.separator();
        ui.heading("Legend");
        for category in Category::ALL {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
                let radius = if category.size_class() == SizeClass::Hub {
                    6.5
                } else {
                    4.5
                };
                ui.painter()
                    .circle_filled(rect.center(), radius, category_color(category));
                ui.label(category.label());
            });
        }

        ui.separator();
        ui.small("Drag nodes to pin them while held. Right-drag pans, wheel zooms.");
    }

    fn show_editor(&mut self, ctx: &Context) {
        self.handle_editor_shortcuts(ctx);

        egui::TopBottomPanel::top("editor_toolbar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    self.editor.toolbar(ui, &self.document.nodes);
                    ui.separator();

                    let selection = self.editor.selection();
                    let has_selection = selection.node().is_some() || selection.edge().is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete selected"))
                        .on_hover_text("Delete")
                        .clicked()
                    {
                        self.delete_editor_selection();
                    }
                    if ui
                        .add_enabled(self.document_path.is_some(), egui::Button::new("Save"))
                        .on_hover_text("Ctrl+S")
                        .clicked()
                    {
                        self.save_document();
                    }
                });
            });

        let details = self
            .editor
            .selection()
            .node()
            .and_then(|id| self.document.nodes.iter().find(|node| node.id == id))
            .map(NodeDetails::from_editor_node);
        if let Some(details) = details {
            egui::SidePanel::right("editor_details")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| {
                    if draw_node_details(ui, &details) {
                        let events = self.editor.clear_selection();
                        self.apply_editor_events(events);
                    }
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let events = self
                    .editor
                    .show(ui, &self.document.nodes, &self.document.edges);
                self.apply_editor_events(events);
            });
    }

    fn handle_editor_shortcuts(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (save, delete) = ctx.input(|input| {
            (
                input.modifiers.command && input.key_pressed(Key::S),
                input.key_pressed(Key::Delete) || input.key_pressed(Key::Backspace),
            )
        });

        if save {
            self.save_document();
        }
        if delete {
            self.delete_editor_selection();
        }
    }
}
