use eframe::egui::{self, Sense, Ui, Vec2};

use crate::graph::{EditorEdge, EditorNode};

use super::render::draw_editor;
use super::{EditorCanvas, EditorEvent};

impl EditorCanvas {
    pub(in crate::app) fn toolbar(&mut self, ui: &mut Ui, nodes: &[EditorNode]) {
        ui.label(format!("Zoom {:.0}%", self.viewport().zoom * 100.0));
        if ui.button("Reset view").clicked() {
            self.reset_view();
        }
        if ui.button("Fit").clicked() {
            self.fit_view(nodes);
        }
    }

    /// Allocates the remaining space, feeds pointer input through the gesture state machine
    /// and paints. Events are returned for the owner to apply.
    pub(in crate::app) fn show(
        &mut self,
        ui: &mut Ui,
        nodes: &[EditorNode],
        edges: &[EditorEdge],
    ) -> Vec<EditorEvent> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.set_canvas(rect);

        let (pointer, pressed, pan_pressed, released, moved, scroll, ctrl) = ui.input(|input| {
            (
                input.pointer.interact_pos(),
                input.pointer.primary_pressed(),
                input.pointer.secondary_pressed()
                    || input.pointer.button_pressed(egui::PointerButton::Middle),
                input.pointer.any_released(),
                input.pointer.delta() != Vec2::ZERO,
                input.raw_scroll_delta,
                input.modifiers.ctrl,
            )
        });

        let mut events = Vec::new();
        let inside = pointer.filter(|pos| rect.contains(*pos));

        if let Some(pos) = inside {
            if pressed {
                events.extend(self.pointer_down(nodes, edges, pos));
            } else if pan_pressed {
                self.pan_down(pos);
            }
        }

        match (pointer, inside) {
            (Some(pos), Some(_)) if moved && self.is_interacting() => {
                events.extend(self.pointer_move(nodes, pos));
            }
            (_, None) if self.is_interacting() && !released => self.pointer_leave(),
            _ => {}
        }

        if released && let Some(pos) = pointer {
            events.extend(self.pointer_up(nodes, pos));
        }

        if response.hovered() && scroll != Vec2::ZERO {
            // egui reports scrolling up as positive; the canvas expects browser deltas.
            self.wheel(-scroll, ctrl);
        }

        draw_editor(&ui.painter_at(rect), self, nodes, edges);
        events
    }
}
