use eframe::egui::{Align2, Color32, FontId, Sense, Ui, vec2};

use super::super::ViewModel;
use super::super::render::{FrameInput, PainterSurface, RenderStyle, render};

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let size = rect.size();
        let now = ui.input(|input| input.time);

        match self.canvas_size {
            None => {
                self.canvas_size = Some(size);
                self.relayout();
            }
            Some(previous) if previous != size => {
                self.canvas_size = Some(size);
                self.simulation.set_center(size * 0.5);
                self.hits.invalidate();
            }
            Some(_) => {}
        }

        let outcome = self.handle_canvas_input(ui, rect, &response);

        if self.simulation.tick() {
            self.hits.invalidate();
        }

        let style = RenderStyle::resolve(&self.settings.visual);
        let input = FrameInput {
            simulation: &self.simulation,
            graph: &self.graph,
            selection: &self.selection,
            hovered: self.interaction.hovered(),
            active_cohort: self.graph.active_cohort_id.as_deref(),
            transform: self.transform,
            now,
        };
        let mut surface = PainterSurface::new(ui.painter_at(rect), rect);
        self.frame_stats = render(&mut surface, &input, &style);

        let painter = ui.painter_at(rect);
        if let Some(person) = self
            .interaction
            .hovered()
            .and_then(|index| self.simulation.node(index))
            .and_then(|node| self.graph.person(&node.id))
        {
            let cohort = person
                .cohort_ids
                .first()
                .and_then(|id| self.graph.cohort(id))
                .map(|cohort| format!("  |  {}", cohort.name))
                .unwrap_or_default();
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}{cohort}", person.name),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        let fading = self.simulation.nodes().iter().any(|node| {
            node.added_at
                .is_some_and(|added_at| now - added_at < self.settings.visual.fade_duration_secs)
        });
        if outcome.redraw || fading || self.simulation.is_active() {
            self.request_redraw(ui.ctx());
        }
    }
}
