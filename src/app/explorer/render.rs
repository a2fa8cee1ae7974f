use std::collections::{HashMap, HashSet};

use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Shape, Stroke, Vec2, vec2};

use crate::util::truncate_chars;

use super::super::animation::FrameScheduler;
use super::super::geometry::{CubicCurve, parallel_offset};
use super::super::render_utils::{category_color, draw_background, fade_unmatched, with_alpha};
use super::ExplorerView;
use super::simulation::SimEdge;

const EDGE_LABEL_NODE_LIMIT: usize = 50;
const PULSE_AMPLITUDE: f32 = 1.5;
const SELECTION_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const BENT_EDGE_SEGMENTS: usize = 16;
const SELF_LOOP_GROWTH: f32 = 8.0;

/// Cosmetic radius oscillation; each node is phase-shifted by its index.
pub(super) fn pulse_radius(radius: f32, time: f64, index: usize) -> f32 {
    let phase = (time * 2.5) as f32 + index as f32 * 0.7;
    radius + PULSE_AMPLITUDE * phase.sin()
}

pub(super) fn show_edge_labels(node_count: usize) -> bool {
    node_count < EDGE_LABEL_NODE_LIMIT
}

/// World-space bend for every edge, in input order. Edges joining the same two nodes, in
/// either direction, fan out around the chord; a lone edge gets zero. Repeated self-loops
/// get a growing extra loop radius instead.
pub(super) fn edge_bends(edges: &[SimEdge]) -> Vec<f32> {
    let pair = |edge: &SimEdge| (edge.from.min(edge.to), edge.from.max(edge.to));

    let mut totals: HashMap<(usize, usize), usize> = HashMap::new();
    for edge in edges {
        *totals.entry(pair(edge)).or_insert(0) += 1;
    }

    let mut seen: HashMap<(usize, usize), usize> = HashMap::new();
    edges
        .iter()
        .map(|edge| {
            let key = pair(edge);
            let index = seen.entry(key).or_insert(0);
            let position = *index;
            *index += 1;
            if edge.from == edge.to {
                return position as f32 * SELF_LOOP_GROWTH;
            }
            let offset = parallel_offset(position, totals.get(&key).copied().unwrap_or(1));
            // A reversed edge's chord normal points the other way.
            if edge.from > edge.to {
                -offset
            } else {
                offset
            }
        })
        .collect()
}

/// Symmetric cubic from `start` to `end` whose midpoint sits `bend` off the chord.
pub(super) fn bent_edge(start: Pos2, end: Pos2, bend: f32) -> CubicCurve {
    let chord = end - start;
    let normal = if chord.length_sq() > f32::EPSILON {
        chord.normalized().rot90()
    } else {
        Vec2::ZERO
    };
    let lift = normal * (bend * 4.0 / 3.0);
    CubicCurve {
        from: start,
        ctrl1: start + lift,
        ctrl2: end + lift,
        to: end,
    }
}

pub(super) fn draw_explorer<S: FrameScheduler>(
    painter: &Painter,
    view: &ExplorerView<S>,
    time: f64,
    matches: Option<&HashSet<usize>>,
) {
    let rect = view.canvas();
    let viewport = view.viewport();
    draw_background(painter, rect, viewport, 48.0);

    let simulation = view.simulation();
    let nodes = simulation.nodes();
    if nodes.is_empty() {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No nodes to display",
            FontId::proportional(14.0),
            Color32::from_gray(150),
        );
        return;
    }

    let zoom = viewport.zoom;
    let to_screen = |pos: Vec2| viewport.world_to_screen(rect.min, pos.to_pos2());
    let edge_color = Color32::from_rgba_unmultiplied(148, 163, 184, 110);
    let edge_stroke = Stroke::new(1.5 * zoom.sqrt(), edge_color);
    let labels_visible = show_edge_labels(nodes.len());

    let edges = simulation.edges();
    let bends = edge_bends(edges);

    for (edge, bend) in edges.iter().zip(bends) {
        let (Some(from), Some(to)) = (nodes.get(edge.from), nodes.get(edge.to)) else {
            continue;
        };
        let start = to_screen(from.pos);
        let end = to_screen(to.pos);

        if edge.from == edge.to {
            let loop_radius = (from.radius * 0.7 + bend) * zoom;
            painter.circle_stroke(
                start - vec2(0.0, from.radius * zoom + loop_radius * 0.6),
                loop_radius,
                edge_stroke,
            );
            continue;
        }

        let curve = bent_edge(start, end, bend * zoom);
        if bend == 0.0 {
            painter.line_segment([start, end], edge_stroke);
        } else {
            painter.add(Shape::line(curve.flatten(BENT_EDGE_SEGMENTS), edge_stroke));
        }

        if labels_visible && !edge.kind.is_empty() {
            let mid = curve.point_at(0.5);
            painter.text(
                mid - vec2(0.0, 3.0),
                Align2::CENTER_BOTTOM,
                &edge.kind,
                FontId::proportional(10.0),
                with_alpha(Color32::from_gray(200), 190),
            );
        }
    }

    let searching = matches.is_some_and(|matches| !matches.is_empty());
    let selected = view.selected_index();

    for (index, node) in nodes.iter().enumerate() {
        let center = to_screen(node.pos);
        let radius = pulse_radius(node.radius, time, index) * zoom;
        let is_match = matches.is_some_and(|matches| matches.contains(&index));

        let base_color = category_color(node.category);
        let color = if searching && !is_match {
            fade_unmatched(base_color)
        } else {
            base_color
        };

        painter.circle_filled(center, radius, color);
        painter.circle_stroke(
            center,
            radius,
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
        );

        if is_match {
            painter.circle_stroke(center, radius + 2.5, Stroke::new(1.5, MATCH_COLOR));
        }
        if selected == Some(index) {
            painter.circle_stroke(center, radius + 5.0, Stroke::new(2.5, SELECTION_COLOR));
        }

        painter.text(
            center + vec2(0.0, radius + 4.0),
            Align2::CENTER_TOP,
            truncate_chars(&node.display_name(), 24),
            FontId::proportional(11.0),
            Color32::from_gray(230),
        );
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    fn edge(from: usize, to: usize) -> SimEdge {
        SimEdge {
            from,
            to,
            kind: "FEEDS".to_owned(),
        }
    }

    #[test]
    fn pulse_stays_near_base_radius() {
        for step in 0..200 {
            let time = step as f64 * 0.05;
            let radius = pulse_radius(25.0, time, step % 7);
            assert!((radius - 25.0).abs() <= PULSE_AMPLITUDE + 1e-4);
        }
    }

    #[test]
    fn pulse_varies_over_time() {
        assert_ne!(pulse_radius(15.0, 0.0, 0), pulse_radius(15.0, 0.5, 0));
    }

    #[test]
    fn edge_labels_hidden_for_large_graphs() {
        assert!(show_edge_labels(49));
        assert!(!show_edge_labels(50));
    }

    #[test]
    fn parallel_edges_bend_apart() {
        let bends = edge_bends(&[edge(0, 1), edge(0, 1)]);
        assert_eq!(bends, vec![-15.0, 15.0]);

        let (start, end) = (pos2(0.0, 0.0), pos2(200.0, 0.0));
        let first = bent_edge(start, end, bends[0]);
        let second = bent_edge(start, end, bends[1]);
        assert_ne!(first.flatten(BENT_EDGE_SEGMENTS), second.flatten(BENT_EDGE_SEGMENTS));
        assert!((first.point_at(0.5).distance(second.point_at(0.5)) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn reverse_edges_land_on_opposite_sides() {
        let bends = edge_bends(&[edge(0, 1), edge(1, 0)]);
        let (a, b) = (pos2(0.0, 0.0), pos2(0.0, 120.0));

        let forward = bent_edge(a, b, bends[0]).point_at(0.5);
        let backward = bent_edge(b, a, bends[1]).point_at(0.5);
        assert!((forward.distance(backward) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn lone_edges_stay_straight() {
        let bends = edge_bends(&[edge(0, 1), edge(1, 2), edge(2, 2)]);
        assert_eq!(bends, vec![0.0, 0.0, 0.0]);

        let curve = bent_edge(pos2(0.0, 0.0), pos2(100.0, 40.0), 0.0);
        assert!(curve.point_at(0.5).distance(pos2(50.0, 20.0)) < 1e-4);
    }

    #[test]
    fn repeated_self_loops_grow() {
        let bends = edge_bends(&[edge(3, 3), edge(0, 1), edge(3, 3)]);
        assert_eq!(bends, vec![0.0, 0.0, SELF_LOOP_GROWTH]);
    }
}
