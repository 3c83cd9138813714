use eframe::egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;
pub const FIT_PADDING: f32 = 60.0;
pub const FIT_MAX_SCALE: f32 = 2.0;

/// Pan and uniform scale, canvas-local: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub x: f32,
    pub y: f32,
    pub k: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            k: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn translation(self) -> Vec2 {
        vec2(self.x, self.y)
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Scales by `factor` while keeping the world point under `screen` fixed.
    pub fn zoom_about(&mut self, screen: Pos2, factor: f32) {
        let anchor = screen_to_world(*self, screen);
        self.k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.x = screen.x - anchor.x * self.k;
        self.y = screen.y - anchor.y * self.k;
    }

    /// World rectangle covered by a canvas of `size`, grown by `padding`
    /// world units on each side.
    pub fn visible_world_rect(self, size: Vec2, padding: f32) -> Rect {
        let min = screen_to_world(self, Pos2::ZERO);
        let max = screen_to_world(self, pos2(size.x, size.y));
        Rect::from_min_max(min, max).expand(padding)
    }
}

pub fn world_to_screen(transform: ViewTransform, world: Pos2) -> Pos2 {
    pos2(
        world.x * transform.k + transform.x,
        world.y * transform.k + transform.y,
    )
}

pub fn screen_to_world(transform: ViewTransform, screen: Pos2) -> Pos2 {
    pos2(
        (screen.x - transform.x) / transform.k,
        (screen.y - transform.y) / transform.k,
    )
}

/// Transform that frames `bounds` in a canvas of `size`, never zooming in
/// past [`FIT_MAX_SCALE`].
pub fn fit_to_nodes(bounds: Rect, size: Vec2) -> Option<ViewTransform> {
    if size.x <= 0.0 || size.y <= 0.0 || !bounds.is_finite() {
        return None;
    }

    let width = bounds.width() + FIT_PADDING * 2.0;
    let height = bounds.height() + FIT_PADDING * 2.0;
    let k = (size.x / width)
        .min(size.y / height)
        .min(FIT_MAX_SCALE)
        .clamp(MIN_ZOOM, MAX_ZOOM);
    let center = bounds.center();

    Some(ViewTransform {
        x: size.x / 2.0 - center.x * k,
        y: size.y / 2.0 - center.y * k,
        k,
    })
}

pub fn bounds_of(points: impl IntoIterator<Item = Pos2>) -> Option<Rect> {
    let mut points = points.into_iter();
    let first = points.next()?;
    Some(points.fold(Rect::from_min_max(first, first), |rect, point| {
        rect.union(Rect::from_min_max(point, point))
    }))
}

/// Parses `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_color(value: &str) -> Option<Color32> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}

pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let alpha = (a as f32 * alpha.clamp(0.0, 1.0)).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

/// Hover tint: each channel pushed 40 steps toward white.
pub fn brighten(color: Color32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(
        r.saturating_add(40),
        g.saturating_add(40),
        b.saturating_add(40),
        a,
    )
}

pub fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub fn edge_visible(rect: Rect, start: Pos2, end: Pos2) -> bool {
    let min_x = start.x.min(end.x);
    let max_x = start.x.max(end.x);
    let min_y = start.y.min(end.y);
    let max_y = start.y.max(end.y);

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_and_world_are_inverse() {
        let transform = ViewTransform {
            x: 40.0,
            y: -20.0,
            k: 2.0,
        };
        let world = pos2(15.0, 30.0);
        let screen = world_to_screen(transform, world);
        assert_eq!(screen, pos2(70.0, 40.0));
        assert_eq!(screen_to_world(transform, screen), world);
    }

    #[test]
    fn zoom_keeps_anchor_and_clamps() {
        let mut transform = ViewTransform::default();
        let anchor = pos2(200.0, 100.0);
        let world = screen_to_world(transform, anchor);

        transform.zoom_about(anchor, 2.0);
        assert_eq!(transform.k, 2.0);
        assert_eq!(world_to_screen(transform, world), anchor);

        transform.zoom_about(anchor, 100.0);
        assert_eq!(transform.k, MAX_ZOOM);
        transform.zoom_about(anchor, 0.0001);
        assert_eq!(transform.k, MIN_ZOOM);
    }

    #[test]
    fn fit_frames_bounds_with_padding() {
        let bounds = Rect::from_min_max(pos2(0.0, 0.0), pos2(680.0, 280.0));
        let transform = fit_to_nodes(bounds, vec2(800.0, 600.0)).expect("fit");

        assert_eq!(transform.k, 1.0);
        assert_eq!(world_to_screen(transform, bounds.center()), pos2(400.0, 300.0));
    }

    #[test]
    fn fit_never_zooms_past_the_cap() {
        let bounds = Rect::from_min_max(pos2(10.0, 10.0), pos2(10.0, 10.0));
        let transform = fit_to_nodes(bounds, vec2(800.0, 600.0)).expect("fit");
        assert_eq!(transform.k, FIT_MAX_SCALE);
        assert!(fit_to_nodes(bounds, vec2(0.0, 600.0)).is_none());
    }

    #[test]
    fn visible_rect_inverts_the_view() {
        let transform = ViewTransform {
            x: -100.0,
            y: 0.0,
            k: 0.5,
        };
        let rect = transform.visible_world_rect(vec2(400.0, 300.0), 50.0);
        assert_eq!(rect.min, pos2(150.0, -50.0));
        assert_eq!(rect.max, pos2(1050.0, 650.0));
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#FF69B4"), Some(Color32::from_rgb(255, 105, 180)));
        assert_eq!(
            parse_hex_color("#00000080"),
            Some(Color32::from_rgba_unmultiplied(0, 0, 0, 128))
        );
        assert_eq!(parse_hex_color("FF69B4"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }

    #[test]
    fn edge_crossing_the_view_is_visible() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0)));
        assert!(!edge_visible(rect, pos2(-50.0, -10.0), pos2(-10.0, -50.0)));
        assert!(edge_visible(rect, pos2(50.0, 50.0), pos2(500.0, 500.0)));
    }
}
