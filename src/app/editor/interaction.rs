use eframe::egui::Pos2;

use crate::graph::{EditorEdge, EditorNode};

use super::super::geometry::point_in_circle;
use super::paths::{input_anchor, node_rect, output_anchor, route_edges};
use super::{EditorCanvas, EditorEvent, Gesture, HandleSide, HitTarget, NODE_SIZE, PendingConnection};

pub(in crate::app) const HANDLE_RADIUS: f32 = 8.0;
const EDGE_HIT_DISTANCE: f32 = 10.0;

fn handle_at(nodes: &[EditorNode], world: Pos2) -> Option<(&EditorNode, HandleSide)> {
    nodes.iter().rev().find_map(|node| {
        if point_in_circle(world, output_anchor(node), HANDLE_RADIUS) {
            Some((node, HandleSide::Output))
        } else if point_in_circle(world, input_anchor(node), HANDLE_RADIUS) {
            Some((node, HandleSide::Input))
        } else {
            None
        }
    })
}

fn node_at(nodes: &[EditorNode], world: Pos2) -> Option<&EditorNode> {
    nodes
        .iter()
        .rev()
        .find(|node| node_rect(node).contains(world))
}

fn edge_at(nodes: &[EditorNode], edges: &[EditorEdge], world: Pos2) -> Option<String> {
    route_edges(nodes, edges)
        .into_iter()
        .map(|route| (route.curve.distance_to(world), route.id))
        .filter(|(distance, _)| *distance <= EDGE_HIT_DISTANCE)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id)
}

impl EditorCanvas {
    pub(in crate::app) fn hit_test(
        &self,
        nodes: &[EditorNode],
        edges: &[EditorEdge],
        screen: Pos2,
    ) -> HitTarget {
        let world = self.to_world(screen);
        if let Some((node, side)) = handle_at(nodes, world) {
            return HitTarget::Handle {
                node: node.id.clone(),
                side,
            };
        }
        if let Some(node) = node_at(nodes, world) {
            return HitTarget::Node(node.id.clone());
        }
        if let Some(edge) = edge_at(nodes, edges, world) {
            return HitTarget::Edge(edge);
        }
        HitTarget::Background
    }

    pub(in crate::app) fn pointer_down(
        &mut self,
        nodes: &[EditorNode],
        edges: &[EditorEdge],
        screen: Pos2,
    ) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        let world = self.to_world(screen);

        self.gesture = match self.hit_test(nodes, edges, screen) {
            HitTarget::Handle { node, side } => {
                let anchor = nodes
                    .iter()
                    .find(|candidate| candidate.id == node)
                    .map(|candidate| match side {
                        HandleSide::Output => output_anchor(candidate),
                        HandleSide::Input => input_anchor(candidate),
                    })
                    .unwrap_or(world);
                Gesture::Connecting(PendingConnection {
                    origin: node,
                    side,
                    anchor,
                    cursor: world,
                })
            }
            HitTarget::Node(id) => {
                self.selection.select_node(&id, &mut events);
                Gesture::DraggingNode { id }
            }
            HitTarget::Edge(id) => {
                self.selection.toggle_edge(&id, &mut events);
                Gesture::Idle
            }
            HitTarget::Background => {
                self.selection.clear(&mut events);
                Gesture::Panning { last: screen }
            }
        };

        events
    }

    /// Secondary-button press: pans from anywhere without touching the selection.
    pub(in crate::app) fn pan_down(&mut self, screen: Pos2) {
        self.gesture = Gesture::Panning { last: screen };
    }

    pub(in crate::app) fn pointer_move(
        &mut self,
        nodes: &[EditorNode],
        screen: Pos2,
    ) -> Vec<EditorEvent> {
        let world = self.to_world(screen);
        match &mut self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.viewport.pan_by(delta);
                Vec::new()
            }
            Gesture::Connecting(pending) => {
                pending.cursor = world;
                Vec::new()
            }
            Gesture::DraggingNode { id } => {
                if !nodes.iter().any(|node| node.id == *id) {
                    self.gesture = Gesture::Idle;
                    return Vec::new();
                }
                let top_left = world - NODE_SIZE * 0.5;
                let moved = nodes
                    .iter()
                    .map(|node| {
                        let mut node = node.clone();
                        if node.id == *id {
                            node.x = top_left.x;
                            node.y = top_left.y;
                        }
                        node
                    })
                    .collect();
                vec![EditorEvent::NodesChanged(moved)]
            }
        }
    }

    pub(in crate::app) fn pointer_up(
        &mut self,
        nodes: &[EditorNode],
        screen: Pos2,
    ) -> Vec<EditorEvent> {
        let world = self.to_world(screen);
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);

        match gesture {
            Gesture::Connecting(pending) => {
                let Some(dropped) = node_at(nodes, world) else {
                    tracing::debug!(origin = %pending.origin, "connection dropped on background");
                    return Vec::new();
                };
                if dropped.id == pending.origin {
                    tracing::debug!(origin = %pending.origin, "connection dropped on its origin");
                    return Vec::new();
                }

                let (source, target) = match pending.side {
                    HandleSide::Output => (pending.origin, dropped.id.clone()),
                    HandleSide::Input => (dropped.id.clone(), pending.origin),
                };
                tracing::debug!(%source, %target, "edge connected");
                vec![EditorEvent::EdgeCreated { source, target }]
            }
            Gesture::DraggingNode { id } => {
                tracing::debug!(node = %id, "node drag finished");
                Vec::new()
            }
            Gesture::Idle | Gesture::Panning { .. } => Vec::new(),
        }
    }

    /// Leaving the canvas ends any gesture; a pending connection is discarded.
    pub(in crate::app) fn pointer_leave(&mut self) {
        self.gesture = Gesture::Idle;
    }
}
