mod interaction;
mod render;
mod search;
mod simulation;
mod view;

use eframe::egui::{Rect, Vec2};
use rand::Rng;

use crate::graph::GraphPayload;

use super::animation::{AnimationLoop, FrameScheduler};
use super::geometry::Viewport;
pub(in crate::app) use search::search_matches;
pub(in crate::app) use simulation::{ForceParams, ForceSimulation, SimNode};
pub(in crate::app) use view::reserve_canvas;

/// One mounted explored-subgraph viewer: simulation, view transform, selection and the
/// animation loop that drives it.
pub(in crate::app) struct ExplorerView<S: FrameScheduler> {
    simulation: ForceSimulation,
    viewport: Viewport,
    canvas: Rect,
    selected: Option<usize>,
    pan_anchor: Option<eframe::egui::Pos2>,
    animation: Option<AnimationLoop<S>>,
}

impl<S: FrameScheduler> ExplorerView<S> {
    pub(in crate::app) fn mount(
        payload: &GraphPayload,
        canvas: Rect,
        params: ForceParams,
        scheduler: S,
        rng: &mut impl Rng,
    ) -> Self {
        let simulation = ForceSimulation::new(payload, canvas.size(), params, rng);
        let animation = if simulation.nodes().is_empty() || !has_area(canvas) {
            tracing::debug!("explorer mounted without animation (no nodes or no canvas area)");
            None
        } else {
            Some(AnimationLoop::start(scheduler))
        };

        tracing::debug!(
            nodes = simulation.nodes().len(),
            edges = simulation.edges().len(),
            "explorer mounted"
        );

        Self {
            simulation,
            viewport: Viewport::default(),
            canvas,
            selected: None,
            pan_anchor: None,
            animation,
        }
    }

    pub(in crate::app) fn unmount(self) {
        let frames = self
            .animation
            .as_ref()
            .map(AnimationLoop::frames)
            .unwrap_or(0);
        tracing::debug!(frames, "explorer unmounted");
    }

    /// Advances the simulation by one frame. Returns false when nothing is animating.
    pub(in crate::app) fn frame(&mut self) -> bool {
        if !has_area(self.canvas) {
            return false;
        }
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };

        animation.next_frame();
        self.simulation.step();
        true
    }

    pub(in crate::app) fn resize(&mut self, canvas: Rect) {
        let center = canvas.size() * 0.5;
        if center != self.simulation.center() {
            self.simulation.set_center(center);
        }
        self.canvas = canvas;
    }

    pub(in crate::app) fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub(in crate::app) fn simulation(&self) -> &ForceSimulation {
        &self.simulation
    }

    pub(in crate::app) fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub(in crate::app) fn canvas(&self) -> Rect {
        self.canvas
    }

    pub(in crate::app) fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub(in crate::app) fn selected_node(&self) -> Option<&SimNode> {
        self.selected
            .and_then(|index| self.simulation.nodes().get(index))
    }

    pub(in crate::app) fn clear_selection(&mut self) {
        self.selected = None;
    }
}

fn has_area(rect: Rect) -> bool {
    let size: Vec2 = rect.size();
    rect.is_finite() && size.x >= 1.0 && size.y >= 1.0
}
