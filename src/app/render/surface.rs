use eframe::egui::{
    Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2, vec2,
};

use crate::app::render_utils::{ViewTransform, world_to_screen};

/// Minimal 2D drawing target. Geometry is given in world units and mapped
/// through the transform on top of the stack.
pub trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color32);
    fn push_transform(&mut self, transform: ViewTransform);
    fn pop_transform(&mut self);
    fn circle_filled(&mut self, center: Pos2, radius: f32, color: Color32);
    fn circle_stroke(&mut self, center: Pos2, radius: f32, stroke: Stroke);
    fn line_segment(&mut self, from: Pos2, to: Pos2, stroke: Stroke);
    fn rounded_rect(&mut self, rect: Rect, corner: f32, fill: Color32, stroke: Stroke);
    /// Text centered horizontally below `anchor`.
    fn text(&mut self, anchor: Pos2, text: &str, size: f32, color: Color32, outline: Option<Color32>);
}

/// [`Surface`] over an egui painter clipped to the canvas rect.
pub struct PainterSurface {
    painter: Painter,
    origin: Pos2,
    size: Vec2,
    stack: Vec<ViewTransform>,
}

impl PainterSurface {
    pub fn new(painter: Painter, rect: Rect) -> Self {
        Self {
            painter,
            origin: rect.min,
            size: rect.size(),
            stack: Vec::new(),
        }
    }

    fn transform(&self) -> ViewTransform {
        self.stack.last().copied().unwrap_or_default()
    }

    fn to_screen(&self, world: Pos2) -> Pos2 {
        world_to_screen(self.transform(), world) + self.origin.to_vec2()
    }

    fn scaled(&self, length: f32) -> f32 {
        length * self.transform().k
    }

    fn scaled_stroke(&self, stroke: Stroke) -> Stroke {
        Stroke::new(self.scaled(stroke.width), stroke.color)
    }
}

impl Surface for PainterSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color32) {
        self.painter
            .rect_filled(Rect::from_min_size(self.origin, self.size), 0.0, color);
    }

    fn push_transform(&mut self, transform: ViewTransform) {
        self.stack.push(transform);
    }

    fn pop_transform(&mut self) {
        self.stack.pop();
    }

    fn circle_filled(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.painter
            .circle_filled(self.to_screen(center), self.scaled(radius), color);
    }

    fn circle_stroke(&mut self, center: Pos2, radius: f32, stroke: Stroke) {
        self.painter.circle_stroke(
            self.to_screen(center),
            self.scaled(radius),
            self.scaled_stroke(stroke),
        );
    }

    fn line_segment(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            self.scaled_stroke(stroke),
        );
    }

    fn rounded_rect(&mut self, rect: Rect, corner: f32, fill: Color32, stroke: Stroke) {
        let screen = Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max));
        let corner = CornerRadius::same(self.scaled(corner).clamp(0.0, 255.0) as u8);
        self.painter.rect(
            screen,
            corner,
            fill,
            self.scaled_stroke(stroke),
            StrokeKind::Middle,
        );
    }

    fn text(&mut self, anchor: Pos2, text: &str, size: f32, color: Color32, outline: Option<Color32>) {
        let position = self.to_screen(anchor);
        let font = FontId::proportional(self.scaled(size).max(1.0));

        if let Some(outline) = outline {
            for offset in [vec2(-1.0, 0.0), vec2(1.0, 0.0), vec2(0.0, -1.0), vec2(0.0, 1.0)] {
                self.painter
                    .text(position + offset, Align2::CENTER_TOP, text, font.clone(), outline);
            }
        }
        self.painter
            .text(position, Align2::CENTER_TOP, text, font, color);
    }
}
