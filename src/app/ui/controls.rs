use std::ops::RangeInclusive;

use eframe::egui::{self, Key, Response, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::social::{Person, SocialGraph};

use super::super::ViewModel;
use super::super::render_utils::parse_hex_color;
use super::super::settings::{PhysicsSettings, VisualSettings};

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;
const SEARCH_RESULT_LIMIT: usize = 12;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

fn default_slider_key_step(min: f32, max: f32) -> f32 {
    ((max - min) / 200.0).max(0.0005)
}

/// Holding an arrow key on a focused slider speeds up the longer it is held.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    range: &RangeInclusive<f32>,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        return false;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let (min, max) = (*range.start(), *range.end());
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction as f32 * default_slider_key_step(min, max) * speed * delta_time;

    let old_value = *value;
    *value = (*value + delta).clamp(min, max);
    ui.ctx().request_repaint();
    (*value - old_value).abs() > f32::EPSILON
}

fn tuning_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    label: &str,
    hint: &str,
) -> bool {
    let slider = ui
        .add(
            egui::Slider::new(&mut *value, range.clone())
                .text(label)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hint);
    if slider.hovered() {
        slider.request_focus();
    }
    let changed = slider.changed();
    changed | apply_slider_arrow_acceleration(ui, &slider, value, &range)
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// People whose name fuzzily matches `query`, best match first.
fn search_people<'a>(graph: &'a SocialGraph, query: &str, limit: usize) -> Vec<&'a Person> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = graph
        .persons
        .iter()
        .filter_map(|person| {
            fuzzy_match_score(&matcher, &person.name, query).map(|score| (score, person))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.name.cmp(&b.1.name)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, person)| person)
        .collect()
}

fn hex_color([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        let now = ui.input(|input| input.time);

        ui.heading("People");
        ui.separator();

        ui.label("Search")
            .on_hover_text("Fuzzy-match people by name, then click one to select it.");
        ui.text_edit_singleline(&mut self.search);

        let mut picked = None;
        for person in search_people(&self.graph, &self.search, SEARCH_RESULT_LIMIT) {
            let selected = self.selection.node.as_deref() == Some(person.id.as_str());
            if ui.selectable_label(selected, person.name.as_str()).clicked() {
                picked = Some(person.id.clone());
            }
        }
        if let Some(id) = picked {
            self.set_selected_person(Some(id));
            self.request_redraw(ui.ctx());
        }

        ui.add_space(6.0);
        egui::CollapsingHeader::new("Add person")
            .default_open(true)
            .show(ui, |ui| self.draw_add_person(ui, now));

        ui.separator();
        egui::CollapsingHeader::new("Cohorts")
            .default_open(true)
            .show(ui, |ui| self.draw_cohorts(ui, now));

        ui.separator();
        egui::CollapsingHeader::new("Display")
            .default_open(false)
            .show(ui, |ui| self.draw_visual_settings(ui));

        ui.collapsing("Physics tuning", |ui| self.draw_physics_settings(ui));

        ui.collapsing("FPS Display", |ui| {
            ui.checkbox(&mut self.show_fps_bar, "Show FPS in header");
            ui.add_enabled_ui(self.show_fps_bar, |ui| {
                ui.checkbox(&mut self.fps_show_current, "Current FPS");
                ui.checkbox(&mut self.fps_show_average, "Average FPS");
                ui.checkbox(&mut self.fps_show_frame_time, "Frame time");
            });
        });
    }

    fn draw_add_person(&mut self, ui: &mut Ui, now: f64) {
        ui.horizontal(|ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut self.new_person_name);
        });

        let cohort_label = self
            .new_person_cohort
            .as_deref()
            .and_then(|id| self.graph.cohort(id))
            .map_or("No cohort".to_owned(), |cohort| cohort.name.clone());
        egui::ComboBox::from_id_salt("new_person_cohort")
            .selected_text(cohort_label)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.new_person_cohort, None, "No cohort");
                for cohort in &self.graph.cohorts {
                    ui.selectable_value(
                        &mut self.new_person_cohort,
                        Some(cohort.id.clone()),
                        cohort.name.as_str(),
                    );
                }
            });

        let name = self.new_person_name.trim().to_owned();
        if ui
            .add_enabled(!name.is_empty(), egui::Button::new("Add person"))
            .clicked()
        {
            let cohorts = self.new_person_cohort.iter().cloned().collect::<Vec<_>>();
            if let Some(id) = self.apply_edit(now, |graph| Ok(graph.add_person(name, cohorts))) {
                self.new_person_name.clear();
                self.set_selected_person(Some(id));
            }
        }
    }

    fn draw_cohorts(&mut self, ui: &mut Ui, now: f64) {
        let active_label = self
            .graph
            .active_cohort_id
            .as_deref()
            .and_then(|id| self.graph.cohort(id))
            .map_or("None".to_owned(), |cohort| cohort.name.clone());
        let mut active = self.graph.active_cohort_id.clone();
        egui::ComboBox::from_label("Highlight cohort")
            .selected_text(active_label)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut active, None, "None");
                for cohort in &self.graph.cohorts {
                    ui.selectable_value(&mut active, Some(cohort.id.clone()), cohort.name.as_str());
                }
            });
        if active != self.graph.active_cohort_id {
            self.apply_edit(now, |graph| graph.set_active_cohort(active));
        }

        let mut removed = None;
        let mut updated = None;
        for cohort in &self.graph.cohorts {
            ui.horizontal(|ui| {
                let mut rgb = parse_hex_color(&cohort.color)
                    .map_or([128, 128, 128], |color| [color.r(), color.g(), color.b()]);
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    updated = Some((cohort.id.clone(), cohort.name.clone(), hex_color(rgb)));
                }

                let editing = matches!(&self.cohort_rename, Some((id, _)) if id == &cohort.id);
                if editing {
                    if let Some((_, name)) = &mut self.cohort_rename {
                        ui.text_edit_singleline(name);
                        let name = name.trim().to_owned();
                        if ui
                            .add_enabled(!name.is_empty(), egui::Button::new("Save"))
                            .clicked()
                        {
                            updated = Some((cohort.id.clone(), name, cohort.color.clone()));
                        }
                    }
                } else {
                    let members = self.graph.members_of(&cohort.id).count();
                    if ui
                        .selectable_label(false, format!("{} ({members})", cohort.name))
                        .on_hover_text("Click to rename")
                        .clicked()
                    {
                        self.cohort_rename = Some((cohort.id.clone(), cohort.name.clone()));
                    }
                }
                if ui.small_button("x").on_hover_text("Delete cohort").clicked() {
                    removed = Some(cohort.id.clone());
                }
            });
        }
        if let Some((id, name, color)) = updated
            && self
                .apply_edit(now, |graph| graph.update_cohort(&id, name, color))
                .is_some()
        {
            self.cohort_rename = None;
        }
        if let Some(id) = removed {
            self.apply_edit(now, |graph| graph.remove_cohort(&id));
        }

        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.new_cohort_name);
            let name = self.new_cohort_name.trim().to_owned();
            if ui
                .add_enabled(!name.is_empty(), egui::Button::new("Add cohort"))
                .clicked()
                && self
                    .apply_edit(now, |graph| Ok(graph.add_cohort(name)))
                    .is_some()
            {
                self.new_cohort_name.clear();
            }
        });
    }

    fn draw_visual_settings(&mut self, ui: &mut Ui) {
        let visual = &mut self.settings.visual;
        let mut changed = false;

        changed |= ui.checkbox(&mut visual.show_labels, "Labels").changed();
        changed |= ui.checkbox(&mut visual.label_outline, "Label outline").changed();
        changed |= ui
            .checkbox(&mut visual.hide_ego_edges, "Hide edges to me")
            .on_hover_text("Edges touching the ego only show while an endpoint is hovered.")
            .changed();
        changed |= ui
            .checkbox(&mut visual.show_cohort_boundaries, "Cohort boundaries")
            .changed();
        changed |= ui
            .checkbox(&mut visual.bond_to_thickness, "Bond strength sets edge width")
            .changed();

        changed |= tuning_slider(
            ui,
            &mut visual.label_min_zoom,
            0.1..=2.0,
            "Label zoom threshold",
            "Labels are hidden below this zoom unless highlighted.",
        );
        changed |= tuning_slider(
            ui,
            &mut visual.edge_width,
            0.25..=4.0,
            "Edge width",
            "Edge width when bond strength does not set it.",
        );
        changed |= tuning_slider(
            ui,
            &mut visual.dimmed_alpha,
            0.0..=0.5,
            "Dimmed edge opacity",
            "Opacity of edges unrelated to the hovered person.",
        );

        if ui.button("Reset display").clicked() {
            *visual = VisualSettings::default();
            changed = true;
        }

        if changed {
            self.interaction
                .set_edge_threshold(self.settings.visual.edge_hit_threshold);
            self.request_redraw(ui.ctx());
        }
    }

    fn draw_physics_settings(&mut self, ui: &mut Ui) {
        let physics = &mut self.settings.physics;
        let mut changed = false;

        changed |= tuning_slider(
            ui,
            &mut physics.center_strength,
            0.0..=0.2,
            "Center pull",
            "How strongly everyone is drawn toward the middle of the canvas.",
        );
        changed |= tuning_slider(
            ui,
            &mut physics.charge_distance_max,
            50.0..=800.0,
            "Repulsion range",
            "Distance beyond which people stop pushing each other apart.",
        );
        changed |= tuning_slider(
            ui,
            &mut physics.collide_strength,
            0.0..=1.0,
            "Collision",
            "How firmly overlapping people are separated.",
        );
        changed |= tuning_slider(
            ui,
            &mut physics.collision_padding,
            0.0..=30.0,
            "Collision padding",
            "Extra space kept around every person.",
        );
        changed |= tuning_slider(
            ui,
            &mut physics.cluster_strength,
            0.0..=0.5,
            "Cohort clustering",
            "Pull of cohort members toward their shared centroid.",
        );
        changed |= tuning_slider(
            ui,
            &mut physics.radial_strength_node,
            0.0..=1.0,
            "Ring strength",
            "Pull toward the ring set by the bond with me.",
        );
        changed |= tuning_slider(
            ui,
            &mut physics.velocity_decay,
            0.05..=0.9,
            "Velocity decay",
            "Friction applied to every move.",
        );
        changed |= tuning_slider(
            ui,
            &mut physics.alpha_decay,
            0.001..=0.1,
            "Cooling rate",
            "How quickly the layout settles after a change.",
        );

        if ui.button("Reset physics").clicked() {
            *physics = PhysicsSettings::default();
            changed = true;
        }
        if changed {
            self.apply_physics_settings();
            self.request_redraw(ui.ctx());
        }

        ui.horizontal(|ui| {
            if ui.button("Reheat").clicked() {
                self.simulation.reheat();
                self.request_redraw(ui.ctx());
            }
            if ui
                .add_enabled(self.simulation.is_active(), egui::Button::new("Freeze"))
                .on_hover_text("Stop the layout where it is until the next change.")
                .clicked()
            {
                self.simulation.stop();
                self.request_redraw(ui.ctx());
            }
            if ui
                .button("Re-layout")
                .on_hover_text("Reseed every person and settle again.")
                .clicked()
            {
                self.relayout();
                self.request_redraw(ui.ctx());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_ranks_fuzzy_name_matches() {
        let mut graph = SocialGraph::new("search");
        graph.add_person("Margaret", Vec::new());
        graph.add_person("Marco", Vec::new());
        graph.add_person("Tom", Vec::new());

        let names = |query: &str| {
            search_people(&graph, query, 10)
                .into_iter()
                .map(|person| person.name.clone())
                .collect::<Vec<_>>()
        };

        let mut mar = names("mar");
        mar.sort();
        assert_eq!(mar, vec!["Marco".to_owned(), "Margaret".to_owned()]);
        assert_eq!(names("marc"), vec!["Marco".to_owned()]);
        assert_eq!(names("tom"), vec!["Tom".to_owned()]);
        assert!(names("   ").is_empty());
        assert!(names("zzz").is_empty());
    }

    #[test]
    fn search_respects_the_limit() {
        let mut graph = SocialGraph::new("search");
        for index in 0..5 {
            graph.add_person(format!("Sam {index}"), Vec::new());
        }
        assert_eq!(search_people(&graph, "sam", 3).len(), 3);
    }

    #[test]
    fn picked_colors_round_trip_through_hex() {
        assert_eq!(hex_color([0x63, 0x66, 0xF1]), "#6366F1");
        let parsed = parse_hex_color(&hex_color([1, 2, 255])).expect("valid");
        assert_eq!([parsed.r(), parsed.g(), parsed.b()], [1, 2, 255]);
    }

    #[test]
    fn arrow_key_step_never_collapses_to_zero() {
        assert_eq!(default_slider_key_step(0.0, 1.0), 0.005);
        assert_eq!(default_slider_key_step(0.0, 0.0), 0.0005);
        assert!(slider_key_accel_multiplier(10.0) <= SLIDER_KEY_ACCEL_MAX);
    }
}
