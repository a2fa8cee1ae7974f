mod interaction;
mod paths;
mod render;
mod view;

use eframe::egui::{Pos2, Rect};

use crate::graph::{EditorEdge, EditorNode};

use super::geometry::{Viewport, bounds_of};
use paths::{NODE_SIZE, node_rect};

/// Intent reported by the canvas. The canvas never edits the caller's nodes or edges.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum EditorEvent {
    NodesChanged(Vec<EditorNode>),
    EdgeCreated { source: String, target: String },
    NodeSelected(Option<String>),
    EdgeSelected(Option<String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum HandleSide {
    Input,
    Output,
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum HitTarget {
    Handle { node: String, side: HandleSide },
    Node(String),
    Edge(String),
    Background,
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct PendingConnection {
    pub(in crate::app) origin: String,
    pub(in crate::app) side: HandleSide,
    pub(in crate::app) anchor: Pos2,
    pub(in crate::app) cursor: Pos2,
}

#[derive(Clone, Debug, PartialEq)]
enum Gesture {
    Idle,
    Panning { last: Pos2 },
    DraggingNode { id: String },
    Connecting(PendingConnection),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct Selection {
    node: Option<String>,
    edge: Option<String>,
}

impl Selection {
    pub(in crate::app) fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    pub(in crate::app) fn edge(&self) -> Option<&str> {
        self.edge.as_deref()
    }

    fn select_node(&mut self, id: &str, events: &mut Vec<EditorEvent>) {
        if self.edge.take().is_some() {
            events.push(EditorEvent::EdgeSelected(None));
        }
        if self.node.as_deref() != Some(id) {
            self.node = Some(id.to_owned());
            events.push(EditorEvent::NodeSelected(Some(id.to_owned())));
        }
    }

    fn toggle_edge(&mut self, id: &str, events: &mut Vec<EditorEvent>) {
        if self.node.take().is_some() {
            events.push(EditorEvent::NodeSelected(None));
        }
        if self.edge.as_deref() == Some(id) {
            self.edge = None;
            events.push(EditorEvent::EdgeSelected(None));
        } else {
            self.edge = Some(id.to_owned());
            events.push(EditorEvent::EdgeSelected(Some(id.to_owned())));
        }
    }

    fn clear(&mut self, events: &mut Vec<EditorEvent>) {
        if self.node.take().is_some() {
            events.push(EditorEvent::NodeSelected(None));
        }
        if self.edge.take().is_some() {
            events.push(EditorEvent::EdgeSelected(None));
        }
    }
}

/// Interaction state of the graph editor canvas: viewport, selection and the gesture in
/// progress. Nodes and edges are passed in on every call.
pub(in crate::app) struct EditorCanvas {
    viewport: Viewport,
    canvas: Rect,
    selection: Selection,
    gesture: Gesture,
}

impl Default for EditorCanvas {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            canvas: Rect::NOTHING,
            selection: Selection::default(),
            gesture: Gesture::Idle,
        }
    }
}

impl EditorCanvas {
    const FIT_PADDING: f32 = 48.0;

    pub(in crate::app) fn set_canvas(&mut self, canvas: Rect) {
        self.canvas = canvas;
    }

    pub(in crate::app) fn canvas(&self) -> Rect {
        self.canvas
    }

    pub(in crate::app) fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub(in crate::app) fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(in crate::app) fn pending_connection(&self) -> Option<&PendingConnection> {
        match &self.gesture {
            Gesture::Connecting(pending) => Some(pending),
            _ => None,
        }
    }

    pub(in crate::app) fn is_interacting(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    pub(in crate::app) fn to_world(&self, screen: Pos2) -> Pos2 {
        self.viewport.screen_to_world(self.canvas.min, screen)
    }

    pub(in crate::app) fn to_screen(&self, world: Pos2) -> Pos2 {
        self.viewport.world_to_screen(self.canvas.min, world)
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.viewport.reset();
    }

    pub(in crate::app) fn fit_view(&mut self, nodes: &[EditorNode]) {
        match bounds_of(nodes.iter().map(node_rect)) {
            Some(bounds) => {
                self.viewport
                    .fit_to(bounds, self.canvas.size(), Self::FIT_PADDING)
            }
            None => self.viewport.reset(),
        }
    }

    /// Takes browser-style deltas: positive `delta.y` scrolls down, so a ctrl+wheel zoom-out
    /// of 2000 arrives as `+2000` and clamps at the minimum zoom. The egui adapter negates
    /// egui's scroll delta before calling this.
    pub(in crate::app) fn wheel(&mut self, delta: eframe::egui::Vec2, ctrl: bool) {
        self.viewport.apply_wheel(delta, ctrl);
    }

    pub(in crate::app) fn clear_selection(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        self.selection.clear(&mut events);
        events
    }

    /// Drops selections that no longer resolve, e.g. after the owner removed a node.
    pub(in crate::app) fn prune_selection(
        &mut self,
        nodes: &[EditorNode],
        edges: &[EditorEdge],
    ) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if let Some(id) = self.selection.node.as_deref()
            && !nodes.iter().any(|node| node.id == id)
        {
            self.selection.node = None;
            events.push(EditorEvent::NodeSelected(None));
        }
        if let Some(id) = self.selection.edge.as_deref()
            && !edges.iter().any(|edge| edge.id == id)
        {
            self.selection.edge = None;
            events.push(EditorEvent::EdgeSelected(None));
        }
        events
    }
}

#[cfg(test)]
pub(in crate::app) mod fixtures {
    use serde_json::{Map, Value};

    use crate::graph::{EditorEdge, EditorNode};

    pub(in crate::app) fn node(id: &str, x: f32, y: f32) -> EditorNode {
        let mut properties = Map::new();
        properties.insert(
            "description".to_owned(),
            Value::String(format!("{id} description")),
        );
        EditorNode {
            id: id.to_owned(),
            kind: "source".to_owned(),
            sub_type: "table".to_owned(),
            label: id.to_owned(),
            x,
            y,
            properties,
        }
    }

    pub(in crate::app) fn edge(id: &str, source: &str, target: &str) -> EditorEdge {
        EditorEdge {
            id: id.to_owned(),
            source: source.to_owned(),
            target: target.to_owned(),
            label: Some(format!("{source}->{target}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::fixtures::{edge, node};
    use super::*;

    #[test]
    fn fit_view_frames_all_nodes() {
        let mut canvas = EditorCanvas::default();
        canvas.set_canvas(Rect::from_min_size(pos2(0.0, 0.0), vec2(1000.0, 600.0)));
        let nodes = vec![node("a", 0.0, 0.0), node("b", 600.0, 300.0)];

        canvas.fit_view(&nodes);

        for node in &nodes {
            let rect = node_rect(node);
            assert!(canvas.canvas().contains(canvas.to_screen(rect.min)));
            assert!(canvas.canvas().contains(canvas.to_screen(rect.max)));
        }
        assert!((0.5..=2.0).contains(&canvas.viewport().zoom));
    }

    #[test]
    fn fit_view_without_nodes_resets() {
        let mut canvas = EditorCanvas::default();
        canvas.set_canvas(Rect::from_min_size(pos2(0.0, 0.0), vec2(1000.0, 600.0)));
        canvas.wheel(vec2(30.0, 30.0), false);

        canvas.fit_view(&[]);
        assert_eq!(*canvas.viewport(), Viewport::default());
    }

    #[test]
    fn ctrl_wheel_zoom_out_and_in_clamp() {
        let mut canvas = EditorCanvas::default();

        canvas.wheel(vec2(0.0, 2000.0), true);
        assert_eq!(canvas.viewport().zoom, 0.5);

        canvas.wheel(vec2(0.0, -5000.0), true);
        assert_eq!(canvas.viewport().zoom, 2.0);
        assert_eq!(canvas.viewport().offset, vec2(0.0, 0.0));
    }

    #[test]
    fn pruning_clears_stale_selection() {
        let mut canvas = EditorCanvas::default();
        let mut events = Vec::new();
        canvas.selection.toggle_edge("e1", &mut events);

        let events = canvas.prune_selection(&[node("a", 0.0, 0.0)], &[edge("e2", "a", "a")]);
        assert_eq!(events, vec![EditorEvent::EdgeSelected(None)]);
        assert_eq!(canvas.selection().edge(), None);
    }
}
