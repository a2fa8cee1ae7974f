use eframe::egui::{
    Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2, vec2,
};

use crate::graph::{EditorEdge, EditorNode};
use crate::util::truncate_chars;

use super::super::render_utils::{draw_background, editor_kind_color, tint_color, with_alpha};
use super::interaction::HANDLE_RADIUS;
use super::paths::{input_anchor, node_rect, output_anchor, pending_curve, route_edges};
use super::EditorCanvas;

const EDGE_COLOR: Color32 = Color32::from_rgb(120, 132, 150);
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const CONNECTOR_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const CURVE_SEGMENTS: usize = 32;
const ARROW_LENGTH: f32 = 10.0;

/// Triangle with its tip at `tip`, pointing along `direction`.
pub(super) fn arrow_head(tip: Pos2, direction: Vec2, length: f32) -> [Pos2; 3] {
    let direction = if direction.length_sq() > f32::EPSILON {
        direction.normalized()
    } else {
        Vec2::X
    };
    let normal = direction.rot90();
    let base = tip - direction * length;
    [
        tip,
        base + normal * (length * 0.5),
        base - normal * (length * 0.5),
    ]
}

pub(super) fn draw_editor(
    painter: &Painter,
    canvas: &EditorCanvas,
    nodes: &[EditorNode],
    edges: &[EditorEdge],
) {
    let rect = canvas.canvas();
    let viewport = canvas.viewport();
    let zoom = viewport.zoom;
    draw_background(painter, rect, viewport, 24.0);

    let to_screen = |world: Pos2| canvas.to_screen(world);
    let selected_edge = canvas.selection().edge();

    for route in route_edges(nodes, edges) {
        let selected = selected_edge == Some(route.id.as_str());
        let (color, width) = if selected {
            (SELECTED_COLOR, 3.0)
        } else {
            (EDGE_COLOR, 2.0)
        };
        let curve = route.curve.map(to_screen);
        painter.add(Shape::line(
            curve.flatten(CURVE_SEGMENTS),
            Stroke::new(width * zoom.sqrt(), color),
        ));
        painter.add(Shape::convex_polygon(
            arrow_head(curve.to, curve.end_direction(), ARROW_LENGTH * zoom).to_vec(),
            color,
            Stroke::NONE,
        ));

        if let Some(label) = route.label.as_deref().filter(|label| !label.is_empty()) {
            let galley_pos = to_screen(route.label_pos) - vec2(0.0, 6.0 * zoom);
            painter.text(
                galley_pos,
                Align2::CENTER_BOTTOM,
                label,
                FontId::proportional(11.0 * zoom),
                if selected {
                    SELECTED_COLOR
                } else {
                    Color32::from_gray(190)
                },
            );
        }
    }

    let selected_node = canvas.selection().node();
    for node in nodes {
        draw_card(painter, node, selected_node == Some(node.id.as_str()), canvas);
    }

    if let Some(pending) = canvas.pending_connection() {
        let points = pending_curve(pending).map(to_screen).flatten(CURVE_SEGMENTS);
        painter.extend(Shape::dashed_line(
            &points,
            Stroke::new(2.0, CONNECTOR_COLOR),
            8.0,
            6.0,
        ));
        painter.circle_filled(to_screen(pending.cursor), 4.0, CONNECTOR_COLOR);
    }

    if nodes.is_empty() {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Empty document",
            FontId::proportional(14.0),
            Color32::from_gray(150),
        );
    }
}

fn draw_card(painter: &Painter, node: &EditorNode, selected: bool, canvas: &EditorCanvas) {
    let zoom = canvas.viewport().zoom;
    let world = node_rect(node);
    let rect = Rect::from_min_max(canvas.to_screen(world.min), canvas.to_screen(world.max));
    let accent = editor_kind_color(&node.kind, &node.sub_type);
    let rounding = 8.0 * zoom;

    let fill = Color32::from_rgb(30, 36, 46);
    let fill = if selected {
        tint_color(fill, accent, 0.18)
    } else {
        fill
    };
    painter.rect_filled(rect, rounding, fill);
    painter.rect_filled(
        Rect::from_min_size(rect.min, vec2(5.0 * zoom, rect.height())),
        rounding,
        accent,
    );
    let border = if selected {
        Stroke::new(2.5, SELECTED_COLOR)
    } else {
        Stroke::new(1.0, with_alpha(accent, 160))
    };
    painter.rect_stroke(rect, rounding, border, StrokeKind::Inside);

    let text_left = rect.left() + 14.0 * zoom;
    painter.text(
        Pos2::new(text_left, rect.top() + 12.0 * zoom),
        Align2::LEFT_TOP,
        truncate_chars(&node.label, 22),
        FontId::proportional(14.0 * zoom),
        Color32::from_gray(235),
    );

    let kind = if node.sub_type.is_empty() {
        node.kind.clone()
    } else {
        format!("{} · {}", node.kind, node.sub_type)
    };
    painter.text(
        Pos2::new(text_left, rect.top() + 32.0 * zoom),
        Align2::LEFT_TOP,
        kind,
        FontId::proportional(10.0 * zoom),
        with_alpha(accent, 220),
    );

    let description = node.description();
    if !description.is_empty() {
        painter.text(
            Pos2::new(text_left, rect.top() + 50.0 * zoom),
            Align2::LEFT_TOP,
            truncate_chars(description, 30),
            FontId::proportional(10.0 * zoom),
            Color32::from_gray(160),
        );
    }

    for anchor in [input_anchor(node), output_anchor(node)] {
        let center = canvas.to_screen(anchor);
        painter.circle_filled(center, HANDLE_RADIUS * zoom, Color32::from_rgb(19, 23, 29));
        painter.circle_stroke(center, HANDLE_RADIUS * zoom, Stroke::new(1.5, accent));
    }
}
