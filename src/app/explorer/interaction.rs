use eframe::egui::Pos2;

use super::super::animation::FrameScheduler;
use super::super::geometry::point_in_circle;
use super::ExplorerView;

const WHEEL_ZOOM_RATE: f32 = 0.0018;

impl<S: FrameScheduler> ExplorerView<S> {
    fn to_world(&self, screen: Pos2) -> Pos2 {
        self.viewport.screen_to_world(self.canvas.min, screen)
    }

    /// Topmost node under a world-space point; later nodes are drawn on top.
    pub(in crate::app) fn node_at(&self, world: Pos2) -> Option<usize> {
        self.simulation
            .nodes()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, node)| point_in_circle(world, node.pos.to_pos2(), node.radius))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn pointer_down(&mut self, screen: Pos2) {
        let world = self.to_world(screen);
        match self.node_at(world) {
            Some(index) => {
                self.selected = Some(index);
                self.simulation.begin_drag(index);
            }
            None => self.selected = None,
        }
    }

    pub(in crate::app) fn pan_down(&mut self, screen: Pos2) {
        self.pan_anchor = Some(screen);
    }

    pub(in crate::app) fn pointer_move(&mut self, screen: Pos2) {
        if let Some(index) = self.simulation.dragged() {
            let world = self.to_world(screen);
            self.simulation.set_drag_target(index, world);
        } else if let Some(anchor) = self.pan_anchor {
            self.viewport.pan_by(screen - anchor);
            self.pan_anchor = Some(screen);
        }
    }

    pub(in crate::app) fn pointer_up(&mut self) {
        self.simulation.release_drag();
        self.pan_anchor = None;
    }

    pub(in crate::app) fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Positive `delta_y` zooms out, anchored at the pointer.
    pub(in crate::app) fn wheel(&mut self, screen: Pos2, delta_y: f32) {
        if delta_y.abs() <= f32::EPSILON {
            return;
        }
        let factor = (1.0 - delta_y * WHEEL_ZOOM_RATE).clamp(0.85, 1.15);
        let anchor = (screen - self.canvas.min).to_pos2();
        self.viewport.zoom_around(anchor, factor);
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.viewport.reset();
        self.pan_anchor = None;
    }

    pub(in crate::app) fn is_dragging(&self) -> bool {
        self.simulation.dragged().is_some() || self.pan_anchor.is_some()
    }
}
