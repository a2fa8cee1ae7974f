use std::collections::HashSet;

use eframe::egui::{self, Rect, Sense, Ui, Vec2};

use super::super::animation::FrameScheduler;
use super::ExplorerView;
use super::render::draw_explorer;

/// Canvas rect for a new mount, so the simulation is seeded around the right center.
pub(in crate::app) fn reserve_canvas(ui: &Ui) -> Rect {
    Rect::from_min_size(ui.cursor().min, ui.available_size())
}

impl<S: FrameScheduler> ExplorerView<S> {
    pub(in crate::app) fn show(&mut self, ui: &mut Ui, matches: Option<&HashSet<usize>>) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.resize(rect);

        let (pointer, pressed, pan_pressed, released, moved, scroll_y, time) = ui.input(|input| {
            (
                input.pointer.interact_pos(),
                input.pointer.primary_pressed(),
                input.pointer.secondary_pressed()
                    || input.pointer.button_pressed(egui::PointerButton::Middle),
                input.pointer.any_released(),
                input.pointer.delta() != Vec2::ZERO,
                input.raw_scroll_delta.y,
                input.time,
            )
        });
        let inside = pointer.filter(|pos| rect.contains(*pos));

        if let Some(pos) = inside {
            if pressed {
                self.pointer_down(pos);
            } else if pan_pressed {
                self.pan_down(pos);
            }
        }

        match inside {
            Some(pos) if moved => self.pointer_move(pos),
            None if self.is_dragging() => self.pointer_leave(),
            _ => {}
        }

        if released {
            self.pointer_up();
        }

        if response.hovered()
            && let Some(pos) = inside
        {
            // egui reports scrolling up as positive; the view expects browser deltas.
            self.wheel(pos, -scroll_y);
        }

        self.frame();
        draw_explorer(&ui.painter_at(rect), self, time, matches);
    }
}
