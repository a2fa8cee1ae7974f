use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::graph::Category;

use super::geometry::Viewport;

pub(super) const FALLBACK_COLOR: Color32 = Color32::from_rgb(148, 163, 184);
const UNMATCHED_BRIGHTNESS: f32 = 0.45;
const UNMATCHED_OPACITY: f32 = 0.7;

pub(super) fn category_color(category: Category) -> Color32 {
    match category {
        Category::Database => Color32::from_rgb(99, 102, 241),
        Category::Schema => Color32::from_rgb(139, 92, 246),
        Category::Table => Color32::from_rgb(59, 130, 246),
        Category::Column => Color32::from_rgb(14, 165, 233),
        Category::BusinessMetric => Color32::from_rgb(16, 185, 129),
        Category::BusinessTerm => Color32::from_rgb(245, 158, 11),
        Category::Concept => Color32::from_rgb(236, 72, 153),
        Category::Document => Color32::from_rgb(239, 68, 68),
        Category::Other => FALLBACK_COLOR,
    }
}

/// Editor cards are colored by `subType` first, then by the coarse `type`.
pub(super) fn editor_kind_color(kind: &str, sub_type: &str) -> Color32 {
    let by_sub_type = match sub_type.to_ascii_lowercase().as_str() {
        "database" => Some(category_color(Category::Database)),
        "schema" => Some(category_color(Category::Schema)),
        "table" => Some(category_color(Category::Table)),
        "column" => Some(category_color(Category::Column)),
        "metric" => Some(category_color(Category::BusinessMetric)),
        "term" => Some(category_color(Category::BusinessTerm)),
        "dimension" => Some(Color32::from_rgb(20, 184, 166)),
        _ => None,
    };
    if let Some(color) = by_sub_type {
        return color;
    }

    match kind.to_ascii_lowercase().as_str() {
        "source" => Color32::from_rgb(59, 130, 246),
        "semantic" => Color32::from_rgb(16, 185, 129),
        "concept" => category_color(Category::Concept),
        _ => FALLBACK_COLOR,
    }
}

/// Mixes `tint` into the RGB of `base`; the result keeps `base`'s alpha.
pub(super) fn tint_color(base: Color32, tint: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * amount).round() as u8;
    Color32::from_rgba_unmultiplied(
        mix(base.r(), tint.r()),
        mix(base.g(), tint.g()),
        mix(base.b(), tint.b()),
        base.a(),
    )
}

/// Darkened, partly transparent version of a node color outside the search results.
pub(super) fn fade_unmatched(color: Color32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let darken = |channel: u8| (channel as f32 * UNMATCHED_BRIGHTNESS).round() as u8;
    Color32::from_rgba_unmultiplied(
        darken(r),
        darken(g),
        darken(b),
        (a as f32 * UNMATCHED_OPACITY).round() as u8,
    )
}

pub(super) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, viewport: &Viewport, spacing: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (spacing * viewport.zoom).max(12.0);
    let origin = rect.min + viewport.offset;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}
