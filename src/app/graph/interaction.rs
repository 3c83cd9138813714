use eframe::egui::{self, Key, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::interaction::{InteractionTargets, Outcome};

impl ViewModel {
    /// Feeds this frame's pointer and keyboard input to the interaction state
    /// machine. Positions are converted to canvas-local coordinates first.
    pub(in crate::app) fn handle_canvas_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) -> Outcome {
        let (pressed, released, pointer, escape) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.latest_pos(),
                input.key_pressed(Key::Escape),
            )
        });
        let local = |position: Pos2| position - rect.min.to_vec2();
        let typing = ui.ctx().memory(|memory| memory.focused().is_some());

        let mut outcome = Outcome::default();
        let mut targets = InteractionTargets {
            simulation: &mut self.simulation,
            hits: &mut self.hits,
            selection: &mut self.selection,
            transform: &mut self.transform,
        };

        if pressed
            && response.hovered()
            && let Some(position) = pointer
        {
            outcome = outcome.merge(self.interaction.pointer_down(&mut targets, local(position)));
        }

        if self.interaction.is_pressed() {
            if let Some(position) = pointer {
                outcome =
                    outcome.merge(self.interaction.pointer_move(&mut targets, local(position)));
                if released {
                    outcome =
                        outcome.merge(self.interaction.pointer_up(&mut targets, local(position)));
                }
            }
        } else {
            let hover = pointer.filter(|_| response.hovered()).map(local);
            outcome = outcome.merge(self.interaction.hover(&mut targets, hover));
        }

        if escape && !typing {
            outcome = outcome.merge(self.interaction.escape(&mut self.selection));
        }

        if self.handle_canvas_zoom(ui, rect, response) {
            outcome.redraw = true;
        }

        if self.interaction.is_dragging() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if self.interaction.hovered().is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        if outcome.selection_changed {
            self.link_target = None;
        }
        outcome
    }

    fn handle_canvas_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) -> bool {
        if !response.hovered() {
            return false;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return false;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.transform
            .zoom_about(pointer - rect.min.to_vec2(), zoom_factor);
        true
    }
}
