use std::collections::HashMap;

use eframe::egui::{Pos2, Rect, Vec2, pos2};

use crate::graph::{EditorEdge, EditorNode};

use super::super::geometry::{CubicCurve, parallel_offset, rect_at};
use super::{HandleSide, PendingConnection};

pub(in crate::app) const NODE_SIZE: Vec2 = Vec2::new(200.0, 80.0);
const MIN_CONTROL_OFFSET: f32 = 80.0;
const SELF_LOOP_BASE_HEIGHT: f32 = 80.0;
const SELF_LOOP_STEP: f32 = 25.0;
const SELF_LOOP_REACH: f32 = 60.0;

pub(in crate::app) fn node_rect(node: &EditorNode) -> Rect {
    rect_at(pos2(node.x, node.y), NODE_SIZE)
}

/// Right-center of the card, where outgoing edges leave.
pub(in crate::app) fn output_anchor(node: &EditorNode) -> Pos2 {
    pos2(node.x + NODE_SIZE.x, node.y + NODE_SIZE.y * 0.5)
}

/// Left-center of the card, where incoming edges arrive.
pub(in crate::app) fn input_anchor(node: &EditorNode) -> Pos2 {
    pos2(node.x, node.y + NODE_SIZE.y * 0.5)
}

pub(in crate::app) fn self_loop_height(index: usize) -> f32 {
    SELF_LOOP_BASE_HEIGHT + index as f32 * SELF_LOOP_STEP
}

pub(in crate::app) fn connector_curve(from: Pos2, to: Pos2, vertical_offset: f32) -> CubicCurve {
    let control = ((to.x - from.x).abs() * 0.5).max(MIN_CONTROL_OFFSET);
    CubicCurve {
        from,
        ctrl1: pos2(from.x + control, from.y + vertical_offset),
        ctrl2: pos2(to.x - control, to.y + vertical_offset),
        to,
    }
}

/// In-progress connector, oriented the way the committed edge will run: out of an output
/// handle, or into an input handle.
pub(in crate::app) fn pending_curve(pending: &PendingConnection) -> CubicCurve {
    match pending.side {
        HandleSide::Output => connector_curve(pending.anchor, pending.cursor, 0.0),
        HandleSide::Input => connector_curve(pending.cursor, pending.anchor, 0.0),
    }
}

pub(in crate::app) fn self_loop_curve(node: &EditorNode, index: usize) -> CubicCurve {
    let height = self_loop_height(index);
    let from = output_anchor(node);
    let to = input_anchor(node);
    CubicCurve {
        from,
        ctrl1: pos2(from.x + SELF_LOOP_REACH, from.y - height),
        ctrl2: pos2(to.x - SELF_LOOP_REACH, to.y - height),
        to,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct RoutedEdge {
    pub(in crate::app) id: String,
    pub(in crate::app) label: Option<String>,
    pub(in crate::app) curve: CubicCurve,
    pub(in crate::app) label_pos: Pos2,
    pub(in crate::app) vertical_offset: f32,
}

/// Curves for every edge whose endpoints both exist, in input order. Edges sharing an
/// ordered (source, target) pair are fanned out; self-loops are stacked.
pub(in crate::app) fn route_edges(nodes: &[EditorNode], edges: &[EditorEdge]) -> Vec<RoutedEdge> {
    let by_id = nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect::<HashMap<_, _>>();

    let mut totals: HashMap<(&str, &str), usize> = HashMap::new();
    for edge in edges {
        if by_id.contains_key(edge.source.as_str()) && by_id.contains_key(edge.target.as_str()) {
            *totals
                .entry((edge.source.as_str(), edge.target.as_str()))
                .or_insert(0) += 1;
        }
    }

    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
    let mut routed = Vec::with_capacity(edges.len());
    for edge in edges {
        let (Some(source), Some(target)) = (
            by_id.get(edge.source.as_str()),
            by_id.get(edge.target.as_str()),
        ) else {
            continue;
        };

        let key = (edge.source.as_str(), edge.target.as_str());
        let index = seen.entry(key).or_insert(0);
        let position = *index;
        *index += 1;
        let total = totals.get(&key).copied().unwrap_or(1);

        let (curve, label_pos, vertical_offset) = if edge.source == edge.target {
            let curve = self_loop_curve(source, position);
            (curve, curve.point_at(0.5), -self_loop_height(position))
        } else {
            let offset = parallel_offset(position, total);
            let from = output_anchor(source);
            let to = input_anchor(target);
            let curve = connector_curve(from, to, offset);
            let label_pos = pos2((from.x + to.x) * 0.5, (from.y + to.y) * 0.5 + offset);
            (curve, label_pos, offset)
        };

        routed.push(RoutedEdge {
            id: edge.id.clone(),
            label: edge.label.clone(),
            curve,
            label_pos,
            vertical_offset,
        });
    }

    routed
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{edge, node};
    use super::*;

    #[test]
    fn three_parallel_edges_fan_out_symmetrically() {
        let offsets = (0..3).map(|index| parallel_offset(index, 3)).collect::<Vec<_>>();
        assert_eq!(offsets, vec![-30.0, 0.0, 30.0]);
    }

    #[test]
    fn parallel_offsets_are_symmetric_and_increasing() {
        for total in 1..8 {
            let offsets = (0..total)
                .map(|index| parallel_offset(index, total))
                .collect::<Vec<_>>();
            let sum: f32 = offsets.iter().sum();
            assert!(sum.abs() < 1e-4, "total {total}");
            assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]));
        }
        assert_eq!(parallel_offset(0, 1), 0.0);
        assert_eq!(parallel_offset(0, 2), -15.0);
    }

    #[test]
    fn self_loops_grow_with_index() {
        assert_eq!(self_loop_height(0), 80.0);
        assert_eq!(self_loop_height(1), 105.0);
    }

    #[test]
    fn control_points_keep_a_minimum_horizontal_reach() {
        let near = connector_curve(pos2(0.0, 0.0), pos2(40.0, 0.0), 0.0);
        assert_eq!(near.ctrl1, pos2(80.0, 0.0));
        assert_eq!(near.ctrl2, pos2(-40.0, 0.0));

        let far = connector_curve(pos2(0.0, 0.0), pos2(400.0, 100.0), 30.0);
        assert_eq!(far.ctrl1, pos2(200.0, 30.0));
        assert_eq!(far.ctrl2, pos2(200.0, 130.0));
    }

    #[test]
    fn pending_connector_bends_like_the_committed_edge() {
        let pending = |side: HandleSide| PendingConnection {
            origin: "a".to_owned(),
            side,
            anchor: pos2(200.0, 40.0),
            cursor: pos2(500.0, 140.0),
        };

        let outgoing = pending_curve(&pending(HandleSide::Output));
        assert_eq!(outgoing.from, pos2(200.0, 40.0));
        assert_eq!(outgoing.to, pos2(500.0, 140.0));
        assert_eq!(outgoing.ctrl1, pos2(350.0, 40.0));

        let incoming = pending_curve(&pending(HandleSide::Input));
        assert_eq!(incoming.from, pos2(500.0, 140.0));
        assert_eq!(incoming.to, pos2(200.0, 40.0));
        assert_eq!(incoming.ctrl1, pos2(650.0, 140.0));
        assert!(incoming.flatten(8).len() > 2);
    }

    #[test]
    fn routes_exit_right_and_enter_left() {
        let nodes = vec![node("a", 0.0, 0.0), node("b", 400.0, 100.0)];
        let routed = route_edges(&nodes, &[edge("e1", "a", "b")]);

        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].curve.from, pos2(200.0, 40.0));
        assert_eq!(routed[0].curve.to, pos2(400.0, 140.0));
        assert_eq!(routed[0].label_pos, pos2(300.0, 90.0));
    }

    #[test]
    fn parallel_edges_get_distinct_offsets_and_labels() {
        let nodes = vec![node("x", 0.0, 0.0), node("y", 500.0, 0.0)];
        let edges = vec![
            edge("e1", "x", "y"),
            edge("e2", "x", "y"),
            edge("e3", "y", "x"),
            edge("e4", "x", "y"),
        ];
        let routed = route_edges(&nodes, &edges);

        let offsets = routed
            .iter()
            .map(|route| (route.id.as_str(), route.vertical_offset))
            .collect::<Vec<_>>();
        assert_eq!(
            offsets,
            vec![("e1", -30.0), ("e2", 0.0), ("e3", 0.0), ("e4", 30.0)]
        );
        assert_eq!(routed[0].label_pos.y, 40.0 - 30.0);
        assert_eq!(routed[3].curve.ctrl1.y, 40.0 + 30.0);
    }

    #[test]
    fn stacked_self_loops_do_not_overlap() {
        let nodes = vec![node("a", 0.0, 0.0)];
        let routed = route_edges(&nodes, &[edge("l1", "a", "a"), edge("l2", "a", "a")]);

        assert_eq!(routed.len(), 2);
        assert_eq!(routed[0].curve.ctrl1.y, 40.0 - 80.0);
        assert_eq!(routed[1].curve.ctrl1.y, 40.0 - 105.0);
        assert!(routed[1].label_pos.y < routed[0].label_pos.y);
        assert!(routed[0].label_pos.y < 0.0);
    }

    #[test]
    fn dangling_edges_are_skipped() {
        let nodes = vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)];
        let edges = vec![
            edge("e1", "a", "b"),
            edge("e2", "a", "gone"),
            edge("e3", "gone", "b"),
        ];
        let routed = route_edges(&nodes, &edges);

        assert_eq!(routed.len(), edges.len() - 2);
        assert_eq!(routed[0].id, "e1");
    }
}
