use eframe::egui::Vec2;

use crate::social::{GraphError, SocialGraph};

use super::super::ViewModel;
use super::super::physics::Simulation;
use super::super::render_utils::{bounds_of, fit_to_nodes};

impl ViewModel {
    /// Runs a domain edit and, when it succeeds, resyncs the simulation with
    /// the full snapshot. Rejected edits leave graph and layout untouched.
    pub(in crate::app) fn apply_edit<T>(
        &mut self,
        now: f64,
        edit: impl FnOnce(&mut SocialGraph) -> Result<T, GraphError>,
    ) -> Option<T> {
        match edit(&mut self.graph) {
            Ok(value) => {
                self.resync_simulation(now);
                self.unsaved_changes = true;
                self.status = None;
                Some(value)
            }
            Err(error) => {
                tracing::warn!(%error, "edit rejected");
                self.status = Some(error.to_string());
                None
            }
        }
    }

    pub(in crate::app) fn resync_simulation(&mut self, now: f64) {
        self.interaction.cancel(&mut self.simulation);
        self.simulation.resync(&self.graph, now);
        self.hits.invalidate();
        self.prune_stale_ids();
    }

    /// Builds a fresh layout around the canvas center, warm-up included.
    pub(in crate::app) fn relayout(&mut self) {
        let center = self.canvas_size.map_or(Vec2::ZERO, |size| size * 0.5);
        self.simulation = Simulation::new(&self.graph, center, self.settings.physics.clone());
        self.hits.invalidate();
        self.interaction.reset();
    }

    pub(in crate::app) fn apply_physics_settings(&mut self) {
        self.simulation.set_settings(self.settings.physics.clone());
        self.hits.invalidate();
    }

    pub(in crate::app) fn fit_view(&mut self) {
        let Some(size) = self.canvas_size else {
            return;
        };
        let bounds = bounds_of(
            self.simulation
                .nodes()
                .iter()
                .map(|node| node.position.to_pos2()),
        );
        if let Some(transform) = bounds.and_then(|bounds| fit_to_nodes(bounds, size)) {
            self.transform = transform;
        }
    }

    /// Pans so that the person sits in the middle of the canvas.
    pub(in crate::app) fn center_view_on(&mut self, id: &str) {
        let (Some(size), Some(position)) = (self.canvas_size, self.simulation.position_of(id))
        else {
            return;
        };
        self.transform.x = size.x * 0.5 - position.x * self.transform.k;
        self.transform.y = size.y * 0.5 - position.y * self.transform.k;
    }

    fn prune_stale_ids(&mut self) {
        let graph = &self.graph;
        if let Some(id) = &self.selection.node
            && graph.person(id).is_none()
        {
            self.selection.node = None;
        }
        if let Some(id) = &self.selection.relationship
            && graph.relationship(id).is_none()
        {
            self.selection.relationship = None;
        }
        if let Some(id) = &self.link_target
            && graph.person(id).is_none()
        {
            self.link_target = None;
        }
        if let Some(id) = &self.new_person_cohort
            && graph.cohort(id).is_none()
        {
            self.new_person_cohort = None;
        }
        if let Some((id, _)) = &self.cohort_rename
            && graph.cohort(id).is_none()
        {
            self.cohort_rename = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::app::interaction::InteractionTargets;
    use crate::app::settings::Settings;
    use crate::social::{RelationshipType, demo_graph};

    fn model() -> ViewModel {
        ViewModel::new(SocialGraph::new("edits"), None, Settings::default())
    }

    #[test]
    fn successful_edit_resyncs_the_simulation() {
        let mut model = model();
        let ego = model.graph.ego_id().expect("ego").to_owned();

        let id = model
            .apply_edit(2.0, |graph| {
                let id = graph.add_person("Noor", Vec::new());
                graph.add_relationship(&ego, &id, RelationshipType::CloseFriend)?;
                Ok(id)
            })
            .expect("edit applied");

        let index = model.simulation.index_of(&id).expect("simulated");
        assert_eq!(model.simulation.nodes()[index].added_at, Some(2.0));
        assert_eq!(model.simulation.links().len(), 1);
        assert!(model.unsaved_changes);
    }

    #[test]
    fn rejected_edit_reports_and_changes_nothing() {
        let mut model = model();
        let before = model.graph.clone();

        let result = model.apply_edit(1.0, |graph| graph.remove_person("ego"));

        assert!(result.is_none());
        assert_eq!(model.graph, before);
        assert_eq!(
            model.status.as_deref(),
            Some(GraphError::EgoRemoval.to_string().as_str())
        );
        assert!(!model.unsaved_changes);
    }

    #[test]
    fn removing_the_selected_person_clears_selection() {
        let mut model = model();
        let id = model
            .apply_edit(0.0, |graph| Ok(graph.add_person("Temp", Vec::new())))
            .expect("added");
        model.selection.select_node(id.clone());
        model.link_target = Some(id.clone());

        model.apply_edit(1.0, |graph| graph.remove_person(&id));

        assert!(model.selection.is_empty());
        assert!(model.link_target.is_none());
        assert!(model.simulation.index_of(&id).is_none());
    }

    #[test]
    fn center_view_puts_person_mid_canvas() {
        let mut model = ViewModel::new(demo_graph(), None, Settings::default());
        model.canvas_size = Some(vec2(800.0, 600.0));
        model.relayout();
        model.transform.k = 2.0;
        let id = model.simulation.nodes()[1].id.clone();

        model.center_view_on(&id);

        let position = model.simulation.position_of(&id).expect("node");
        let screen =
            crate::app::render_utils::world_to_screen(model.transform, position.to_pos2());
        assert!((screen.x - 400.0).abs() < 1e-3);
        assert!((screen.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn layout_waits_for_the_first_canvas_frame() {
        let graph = demo_graph();
        let people = graph.persons.len();
        let mut model = ViewModel::new(graph, None, Settings::default());
        assert!(model.simulation.nodes().is_empty());
        assert_eq!(model.simulation.ticks(), 0);

        model.canvas_size = Some(vec2(800.0, 600.0));
        model.relayout();

        assert_eq!(model.simulation.nodes().len(), people);
        assert_eq!(model.simulation.center(), vec2(400.0, 300.0));
    }

    #[test]
    fn edit_during_a_drag_releases_the_pin() {
        let mut model = ViewModel::new(demo_graph(), None, Settings::default());
        model.canvas_size = Some(vec2(800.0, 600.0));
        model.relayout();
        let ego = model.simulation.ego_index().expect("ego");
        let (index, id) = model
            .simulation
            .nodes()
            .iter()
            .enumerate()
            .find(|(index, _)| *index != ego)
            .map(|(index, node)| (index, node.id.clone()))
            .expect("someone besides me");
        let at = model.simulation.nodes()[index].position.to_pos2();

        let mut targets = InteractionTargets {
            simulation: &mut model.simulation,
            hits: &mut model.hits,
            selection: &mut model.selection,
            transform: &mut model.transform,
        };
        model.interaction.pointer_down(&mut targets, at);
        model
            .interaction
            .pointer_move(&mut targets, at + vec2(40.0, 0.0));
        assert!(model.interaction.is_dragging());

        model.apply_edit(3.0, |graph| Ok(graph.add_person("Late", Vec::new())));

        let index = model.simulation.index_of(&id).expect("still simulated");
        assert!(model.simulation.nodes()[index].pin.is_none());
        assert!(!model.interaction.is_pressed());
    }

    #[test]
    fn fit_view_frames_every_node() {
        let mut model = ViewModel::new(demo_graph(), None, Settings::default());
        model.canvas_size = Some(vec2(800.0, 600.0));
        model.relayout();
        model.fit_view();

        let transform = model.transform;
        for node in model.simulation.nodes() {
            let screen = crate::app::render_utils::world_to_screen(transform, node.position.to_pos2());
            assert!((0.0..=800.0).contains(&screen.x), "{screen:?}");
            assert!((0.0..=600.0).contains(&screen.y), "{screen:?}");
        }
    }
}
