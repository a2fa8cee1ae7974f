use eframe::egui::{Pos2, Rect, Vec2, pos2};

pub(in crate::app) const MIN_ZOOM: f32 = 0.5;
pub(in crate::app) const MAX_ZOOM: f32 = 2.0;
const WHEEL_ZOOM_RATE: f32 = 0.001;
const PARALLEL_SPACING: f32 = 30.0;

/// Pan/zoom transform: `screen = origin + offset + world * zoom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Viewport {
    pub(in crate::app) offset: Vec2,
    pub(in crate::app) zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub(in crate::app) fn screen_to_world(&self, origin: Pos2, screen: Pos2) -> Pos2 {
        ((screen - origin - self.offset) / self.zoom).to_pos2()
    }

    pub(in crate::app) fn world_to_screen(&self, origin: Pos2, world: Pos2) -> Pos2 {
        origin + self.offset + world.to_vec2() * self.zoom
    }

    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub(in crate::app) fn zoom_by(&mut self, amount: f32) {
        self.zoom = (self.zoom + amount).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Browser wheel convention: positive `delta.y` scrolls down, which zooms out when
    /// `ctrl` is held and pans otherwise.
    pub(in crate::app) fn apply_wheel(&mut self, delta: Vec2, ctrl: bool) {
        if ctrl {
            self.zoom_by(-delta.y * WHEEL_ZOOM_RATE);
        } else {
            self.pan_by(-delta);
        }
    }

    /// Scales around a canvas-relative anchor so the world point under it stays put.
    pub(in crate::app) fn zoom_around(&mut self, anchor: Pos2, factor: f32) {
        let world_before = self.screen_to_world(Pos2::ZERO, anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = anchor.to_vec2() - world_before.to_vec2() * self.zoom;
    }

    pub(in crate::app) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(in crate::app) fn fit_to(&mut self, bounds: Rect, canvas_size: Vec2, padding: f32) {
        if !bounds.is_finite() || canvas_size.x <= 0.0 || canvas_size.y <= 0.0 {
            self.reset();
            return;
        }

        let available = (canvas_size - Vec2::splat(padding * 2.0)).max(Vec2::splat(1.0));
        let span = bounds.size().max(Vec2::splat(1.0));
        self.zoom = (available.x / span.x)
            .min(available.y / span.y)
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = canvas_size * 0.5 - bounds.center().to_vec2() * self.zoom;
    }
}

pub(in crate::app) fn point_in_circle(point: Pos2, center: Pos2, radius: f32) -> bool {
    point.distance_sq(center) <= radius * radius
}

pub(in crate::app) fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq <= f32::EPSILON {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct CubicCurve {
    pub(in crate::app) from: Pos2,
    pub(in crate::app) ctrl1: Pos2,
    pub(in crate::app) ctrl2: Pos2,
    pub(in crate::app) to: Pos2,
}

impl CubicCurve {
    const HIT_SEGMENTS: usize = 24;

    pub(in crate::app) fn point_at(&self, t: f32) -> Pos2 {
        let u = 1.0 - t;
        let point = self.from.to_vec2() * (u * u * u)
            + self.ctrl1.to_vec2() * (3.0 * u * u * t)
            + self.ctrl2.to_vec2() * (3.0 * u * t * t)
            + self.to.to_vec2() * (t * t * t);
        point.to_pos2()
    }

    pub(in crate::app) fn flatten(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|step| self.point_at(step as f32 / segments as f32))
            .collect()
    }

    /// Approximate distance from `point` to the curve via its flattened polyline.
    pub(in crate::app) fn distance_to(&self, point: Pos2) -> f32 {
        self.flatten(Self::HIT_SEGMENTS)
            .windows(2)
            .map(|pair| distance_to_segment(point, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min)
    }

    /// Unit direction the curve travels when it arrives at `to`.
    pub(in crate::app) fn end_direction(&self) -> Vec2 {
        let tangent = self.to - self.ctrl2;
        if tangent.length_sq() > f32::EPSILON {
            return tangent.normalized();
        }
        let chord = self.to - self.from;
        if chord.length_sq() > f32::EPSILON {
            chord.normalized()
        } else {
            Vec2::X
        }
    }

    pub(in crate::app) fn map(&self, transform: impl Fn(Pos2) -> Pos2) -> Self {
        Self {
            from: transform(self.from),
            ctrl1: transform(self.ctrl1),
            ctrl2: transform(self.ctrl2),
            to: transform(self.to),
        }
    }
}

/// Perpendicular offset of the `index`-th of `total` edges sharing a pair of endpoints,
/// centered so a lone edge gets zero.
pub(in crate::app) fn parallel_offset(index: usize, total: usize) -> f32 {
    let total = total.max(1);
    (index as f32 - (total - 1) as f32 / 2.0) * PARALLEL_SPACING
}

pub(in crate::app) fn bounds_of(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|bounds, rect| bounds.union(rect))
}

pub(in crate::app) fn rect_at(top_left: Pos2, size: Vec2) -> Rect {
    Rect::from_min_size(pos2(top_left.x, top_left.y), size)
}
